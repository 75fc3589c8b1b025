//! Integration tests for the lowering pass: CWL document → ToolIR.

mod helpers;

use cwl2galaxy::ir::*;
use cwl2galaxy::lower::format::NoFormats;
use cwl2galaxy::lower::resolve::{ResolveContext, primitive_kind, resolve_input_type};
use cwl2galaxy::parse::TypeExpr;

fn ctx() -> ResolveContext<'static> {
    ResolveContext {
        namespaces: &[],
        formats: &NoFormats,
        stdout: None,
        stderr: None,
    }
}

fn resolve(expr: serde_json::Value) -> cwl2galaxy::Result<InputNode> {
    let expr: TypeExpr = serde_json::from_value(expr).unwrap();
    resolve_input_type("x", &expr, &ctx())
}

fn scalar_kind(kind: ScalarKind) -> InputKind {
    InputKind::Scalar { scalar: kind }
}

// ---------------------------------------------------------------------------
// Primitive table
// ---------------------------------------------------------------------------

#[test]
fn primitive_string_is_text() {
    assert_eq!(primitive_kind("string"), Some(scalar_kind(ScalarKind::Text)));
}

#[test]
fn primitive_int_is_integer() {
    assert_eq!(primitive_kind("int"), Some(scalar_kind(ScalarKind::Integer)));
}

#[test]
fn primitive_long_is_integer() {
    assert_eq!(primitive_kind("long"), Some(scalar_kind(ScalarKind::Integer)));
}

#[test]
fn primitive_float_is_float() {
    assert_eq!(primitive_kind("float"), Some(scalar_kind(ScalarKind::Float)));
}

#[test]
fn primitive_double_is_float() {
    assert_eq!(primitive_kind("double"), Some(scalar_kind(ScalarKind::Float)));
}

#[test]
fn primitive_boolean_is_boolean() {
    assert_eq!(primitive_kind("boolean"), Some(scalar_kind(ScalarKind::Boolean)));
}

#[test]
fn primitive_file_is_file() {
    assert_eq!(primitive_kind("File"), Some(InputKind::File));
}

#[test]
fn primitive_stdout_is_file() {
    assert_eq!(primitive_kind("stdout"), Some(InputKind::File));
}

#[test]
fn primitive_directory_is_data_collection() {
    assert_eq!(primitive_kind("Directory"), Some(InputKind::DataCollection));
}

#[test]
fn primitive_any_is_text() {
    assert_eq!(primitive_kind("Any"), Some(scalar_kind(ScalarKind::Text)));
}

#[test]
fn unknown_name_is_not_primitive() {
    assert_eq!(primitive_kind("Blob"), None);
    assert_eq!(resolve(serde_json::json!("Blob")).unwrap_err().code(), "R001");
}

// ---------------------------------------------------------------------------
// Unions
// ---------------------------------------------------------------------------

#[test]
fn union_with_null_is_optional_with_same_kind() {
    for name in ["string", "int", "long", "float", "double", "boolean", "File", "Directory", "Any"] {
        let plain = resolve(serde_json::json!(name)).unwrap();
        let union = resolve(serde_json::json!([name, "null"])).unwrap();
        let null_first = resolve(serde_json::json!(["null", name])).unwrap();
        assert!(!plain.optional, "{name}");
        assert!(union.optional && null_first.optional, "{name}");
        assert_eq!(union.kind, plain.kind, "{name}");
        assert_eq!(null_first.kind, plain.kind, "{name}");
    }
}

#[test]
fn two_non_null_members_are_too_many_types() {
    let err = resolve(serde_json::json!(["string", "int", "null"])).unwrap_err();
    assert_eq!(
        err,
        cwl2galaxy::TranslateError::TooManyTypes {
            name: "x".into(),
            count: 2
        }
    );
}

#[test]
fn union_of_mapping_member_is_resolved() {
    let node = resolve(serde_json::json!(["null", {"type": "array", "items": "File"}])).unwrap();
    assert!(node.optional && node.multiple);
    assert_eq!(node.kind, InputKind::File);
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

#[test]
fn scenario_a_text_input() {
    let ir = helpers::lower_yaml(include_str!("fixtures/echo.cwl")).unwrap();
    let message = helpers::input(&ir, "message");
    assert_eq!(message.kind, scalar_kind(ScalarKind::Text));
    assert!(!message.optional);
    assert_eq!(ir.metadata.name, "Echo message");
    assert_eq!(ir.metadata.help.as_deref(), Some("Prints the message to a file."));

    let out = helpers::output(&ir, "output");
    assert_eq!(out.kind, OutputKind::File);
    assert_eq!(out.glob.as_deref(), Some("message.txt"));
}

#[test]
fn scenario_b_optional_file_with_format() {
    let ir = helpers::lower_yaml(include_str!("fixtures/optional_file.cwl")).unwrap();
    let infile = helpers::input(&ir, "infile");
    assert_eq!(infile.kind, InputKind::File);
    assert!(infile.optional);
    assert_eq!(infile.format.as_deref(), Some("edam:format_1234"));
    assert_eq!(infile.doc.as_deref(), Some("Reads to check"));

    let threads = helpers::input(&ir, "threads");
    assert!(threads.optional);
    assert_eq!(threads.default_value, Some(serde_json::json!(2)));

    assert_eq!(ir.metadata.source_file, "fastqc.cwl");
    assert_eq!(ir.metadata.namespaces[0].prefix, "edam");
}

#[test]
fn scenario_c_array_of_files_is_multiple() {
    let ir = helpers::lower_yaml(include_str!("fixtures/array_files.cwl")).unwrap();
    let files = helpers::input(&ir, "files");
    assert_eq!(files.kind, InputKind::File);
    assert!(files.multiple);

    let modes = helpers::input(&ir, "modes");
    assert!(modes.multiple);
    assert_eq!(
        modes.kind,
        InputKind::Select {
            options: vec!["fast".into(), "slow".into()]
        }
    );

    match &helpers::input(&ir, "tags").kind {
        InputKind::Repeat { element } => assert_eq!(element.name, "array_tags"),
        other => panic!("expected repeat, got {other:?}"),
    }

    // `count: int` produces no output node
    assert_eq!(ir.outputs.len(), 1);
    let parts = helpers::output(&ir, "parts");
    assert!(parts.array);
    assert_eq!(parts.glob.as_deref(), Some("split/part_"));
}

#[test]
fn scenario_d_array_of_records_is_repeat_of_section() {
    let ir = helpers::lower_yaml(include_str!("fixtures/array_records.cwl")).unwrap();
    let InputKind::Repeat { element } = &helpers::input(&ir, "samples").kind else {
        panic!("expected repeat");
    };
    assert_eq!(element.name, "Sample");
    let InputKind::Section { fields } = &element.kind else {
        panic!("expected section element");
    };
    let names: Vec<_> = fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["sample_id", "reads"]);
    assert_eq!(fields[1].kind, InputKind::File);
    assert!(fields.iter().all(|f| f.parent.as_deref() == Some("Sample")));
}

#[test]
fn nested_arrays_resolve_to_nested_repeats() {
    let ir = helpers::lower_yaml(include_str!("fixtures/nested_arrays.cwl")).unwrap();
    let InputKind::Repeat { element } = &helpers::input(&ir, "grid").kind else {
        panic!("expected repeat");
    };
    assert_eq!(element.name, "array_grid");
    let InputKind::Repeat { element: inner } = &element.kind else {
        panic!("expected nested repeat");
    };
    assert_eq!(inner.name, "array_array_grid");
    assert_eq!(inner.kind, scalar_kind(ScalarKind::Text));
}

#[test]
fn triple_nested_arrays_still_resolve() {
    // resolution has no depth limit; only command emission does
    let ir = helpers::lower_yaml(include_str!("fixtures/triple_nested.cwl")).unwrap();
    assert_eq!(helpers::input(&ir, "cube").kind_name(), "repeat");
}

#[test]
fn record_input_and_outputs() {
    let ir = helpers::lower_yaml(include_str!("fixtures/record_input.cwl")).unwrap();
    let options = helpers::input(&ir, "options");
    let InputKind::Section { fields } = &options.kind else {
        panic!("expected section");
    };
    assert_eq!(fields.len(), 3);
    assert_eq!(fields[0].kind, scalar_kind(ScalarKind::Integer));
    assert!(fields[1].optional);
    assert_eq!(fields[1].label, "Reference genome");
    assert_eq!(fields[2].kind, InputKind::DataCollection);

    assert_eq!(
        helpers::input(&ir, "mode").kind,
        InputKind::Select {
            options: vec!["local".into(), "global".into()]
        }
    );

    assert_eq!(helpers::output(&ir, "index_dir").kind, OutputKind::Directory);
    let OutputKind::Section { fields } = &helpers::output(&ir, "summary").kind else {
        panic!("expected section output");
    };
    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].name, "stats");
}

#[test]
fn scenario_e_workflow_output_follows_source() {
    let ir = helpers::lower_yaml(include_str!("fixtures/workflow.cwl")).unwrap();
    assert_eq!(ir.metadata.class, ProcessClass::Workflow);
    assert_eq!(ir.metadata.source_file, "count-words.cwl");
    assert_eq!(ir.metadata.name, "Count words");

    let counts = helpers::output(&ir, "counts");
    assert_eq!(counts.glob.as_deref(), Some("result.txt"));
    assert_eq!(counts.doc.as_deref(), Some("Word counts per line"));

    assert_eq!(helpers::output(&ir, "missing").glob, None);
    assert_eq!(helpers::output(&ir, "external").glob, None);
}

#[test]
fn defaults_never_change_classification() {
    let with_default = helpers::lower_yaml(
        "class: CommandLineTool\ninputs:\n  n:\n    type: string\n    default: 7\n",
    )
    .unwrap();
    let without = helpers::lower_yaml("class: CommandLineTool\ninputs:\n  n: string\n").unwrap();
    assert_eq!(with_default.inputs[0].kind, without.inputs[0].kind);
}
