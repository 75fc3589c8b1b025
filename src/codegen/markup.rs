//! Galaxy parameter and output declarations.
//!
//! Every node renders on its own, at column zero; the template indents the
//! rendered blocks into `<inputs>` / `<outputs>`.

use serde_json::Value;

use crate::config::TranslatorConfig;
use crate::ir::types::*;

use super::glob::{DESIGNATION, discovery};
use super::writer::CodeWriter;

/// Escape a value for use inside a double-quoted XML attribute.
pub fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\n' => out.push_str("&#10;"),
            other => out.push(other),
        }
    }
    out
}

// =============================================================================
// INPUTS
// =============================================================================

pub fn render_input(node: &InputNode) -> String {
    let mut w = CodeWriter::new();
    write_input(node, &mut w);
    w.finish()
}

fn write_input(node: &InputNode, w: &mut CodeWriter) {
    match &node.kind {
        InputKind::Section { fields } => {
            w.open(&format!(
                r#"<section name="{}" title="{}" expanded="true">"#,
                escape_attr(&node.name),
                escape_attr(&node.label)
            ));
            for field in fields {
                write_input(field, w);
            }
            w.close("</section>");
        }
        InputKind::Repeat { element } => {
            w.open(&format!(
                r#"<repeat name="{}" title="{}">"#,
                escape_attr(&node.name),
                escape_attr(&node.label)
            ));
            write_input(element, w);
            w.close("</repeat>");
        }
        InputKind::Select { options } => {
            w.open(&format!("<param {}>", param_attrs(node)));
            for option in options {
                let option = escape_attr(option);
                w.line(&format!(r#"<option value="{option}">{option}</option>"#));
            }
            w.close("</param>");
        }
        InputKind::Scalar { .. } | InputKind::File | InputKind::DataCollection => {
            w.line(&format!("<param {}/>", param_attrs(node)));
        }
    }
}

fn param_attrs(node: &InputNode) -> String {
    let mut attrs = vec![
        attr("name", &node.name),
        attr("type", node.kind.galaxy_type()),
    ];
    if matches!(node.kind, InputKind::DataCollection) {
        attrs.push(attr("collection_type", "list"));
    }
    attrs.push(attr("label", &node.label));
    attrs.push(attr("optional", if node.optional { "true" } else { "false" }));

    if let Some(default) = node.default_value.as_ref().and_then(scalar_default) {
        let key = match node.kind {
            InputKind::Scalar {
                scalar: ScalarKind::Boolean,
            } => "checked",
            _ => "value",
        };
        attrs.push(attr(key, &default));
    }
    if let Some(doc) = &node.doc {
        attrs.push(attr("help", doc));
    }
    if let Some(format) = &node.format {
        attrs.push(attr("format", format));
    }
    if node.multiple {
        attrs.push(attr("multiple", "true"));
    }
    attrs.join(" ")
}

/// Only plain values are rendered; File objects and lists have no attribute form.
fn scalar_default(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn attr(key: &str, value: &str) -> String {
    format!(r#"{key}="{}""#, escape_attr(value))
}

// =============================================================================
// OUTPUTS
// =============================================================================

/// The job document and captured runner stdout, declared before every tool output.
pub fn fixed_outputs(config: &TranslatorConfig) -> Vec<String> {
    vec![
        format!(
            r#"<data name="{}" format="yaml" label="parameters"/>"#,
            escape_attr(&config.job_file)
        ),
        format!(
            r#"<data name="{}" format="json" label="outputs list"/>"#,
            escape_attr(&config.stdout_file)
        ),
    ]
}

pub fn render_output(node: &OutputNode) -> String {
    let mut w = CodeWriter::new();
    write_output(node, &mut w);
    w.finish()
}

fn write_output(node: &OutputNode, w: &mut CodeWriter) {
    match &node.kind {
        OutputKind::File if !node.array => {
            let format = match &node.format {
                Some(format) => attr("format", format),
                None => attr("auto_format", "true"),
            };
            w.open(&format!(
                "<data {} {} {}>",
                attr("name", &node.name),
                attr("label", &node.label),
                format
            ));
            w.line(&discover_files(node.glob.as_deref(), false));
            w.close("</data>");
        }
        OutputKind::File => {
            w.open(&collection_open(node, "list"));
            w.line(&discover_files(node.glob.as_deref(), true));
            w.close("</collection>");
        }
        OutputKind::Directory => {
            let collection_type = if node.array { "list:list" } else { "list" };
            w.open(&collection_open(node, collection_type));
            w.line(&discover_directory(node.glob.as_deref()));
            w.close("</collection>");
        }
        OutputKind::Section { fields } => {
            w.open(&collection_open(node, "list"));
            for field in fields {
                write_output(field, w);
            }
            w.close("</collection>");
        }
        OutputKind::Repeat { element } => {
            w.open(&collection_open(node, "list:list"));
            let glob = element.glob.as_deref().or(node.glob.as_deref());
            match &element.kind {
                OutputKind::File => w.line(&discover_files(glob, true)),
                OutputKind::Directory => w.line(&discover_directory(glob)),
                OutputKind::Section { fields } => {
                    for field in fields {
                        write_output(field, w);
                    }
                }
                OutputKind::Repeat { .. } => write_output(element, w),
            }
            w.close("</collection>");
        }
    }
}

fn collection_open(node: &OutputNode, collection_type: &str) -> String {
    format!(
        "<collection {} {} {}>",
        attr("name", &node.name),
        attr("type", collection_type),
        attr("label", &node.label)
    )
}

fn discover_files(glob: Option<&str>, scatter: bool) -> String {
    let found = discovery(glob, scatter);
    let mut attrs = vec![attr("pattern", &found.pattern)];
    if let Some(directory) = &found.directory {
        attrs.push(attr("directory", directory));
    }
    attrs.push(attr("visible", "true"));
    format!("<discover_datasets {}/>", attrs.join(" "))
}

fn discover_directory(glob: Option<&str>) -> String {
    let directory = glob.unwrap_or_default().trim_end_matches('/');
    format!(
        "<discover_datasets {} {} {}/>",
        attr("pattern", DESIGNATION),
        attr("directory", directory),
        attr("visible", "false")
    )
}
