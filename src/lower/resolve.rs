//! Type resolution: raw CWL type expressions → classified IR nodes.
//!
//! A single recursive classifier handles unions, the primitive table,
//! CWL's `T?` / `T[]` shorthand, arrays, enums and records. Inputs and
//! outputs share the union/shorthand handling but classify into different
//! kind sets.

use std::borrow::Cow;

use crate::error::{Result, TranslateError};
use crate::ir::types::*;
use crate::parse::types::{Parameter, TypeExpr};

use super::format::{FormatLookup, resolve_format};

/// Read-only inputs shared by every node resolved from one document.
pub struct ResolveContext<'a> {
    pub namespaces: &'a [Namespace],
    pub formats: &'a dyn FormatLookup,
    /// Tool-level `stdout` file name, the glob of `stdout`-typed outputs.
    pub stdout: Option<&'a str>,
    /// Tool-level `stderr` file name, the glob of `stderr`-typed outputs.
    pub stderr: Option<&'a str>,
}

/// Last `#`-then-`/` fragment of a CWL identifier: `file.cwl#main/reads` → `reads`.
pub fn short_name(id: &str) -> &str {
    let fragment = id.rsplit('#').next().unwrap_or(id);
    fragment.rsplit('/').next().unwrap_or(fragment)
}

/// Input kind of a CWL primitive type name.
pub fn primitive_kind(name: &str) -> Option<InputKind> {
    let scalar = |scalar| Some(InputKind::Scalar { scalar });
    match name {
        "string" | "Any" => scalar(ScalarKind::Text),
        "int" | "long" => scalar(ScalarKind::Integer),
        "float" | "double" => scalar(ScalarKind::Float),
        "boolean" => scalar(ScalarKind::Boolean),
        "File" | "stdout" => Some(InputKind::File),
        "Directory" => Some(InputKind::DataCollection),
        _ => None,
    }
}

/// Expand `T?` into `[T, null]` and `T[]` into `{type: array, items: T}`.
fn expand_shorthand(name: &str) -> Option<TypeExpr> {
    if let Some(inner) = name.strip_suffix('?') {
        return Some(TypeExpr::Union(vec![
            expand_or_name(inner),
            TypeExpr::name("null"),
        ]));
    }
    let inner = name.strip_suffix("[]")?;
    Some(TypeExpr::Schema(Box::new(Parameter {
        type_: Some(TypeExpr::name("array")),
        items: Some(expand_or_name(inner)),
        ..Parameter::default()
    })))
}

fn expand_or_name(name: &str) -> TypeExpr {
    expand_shorthand(name).unwrap_or_else(|| TypeExpr::name(name))
}

/// The type expression a parameter declares.
///
/// `items`, `fields` or `symbols` written next to `type` make the parameter
/// itself the schema.
fn declared_type<'p>(param: &'p Parameter, name: &str) -> Result<Cow<'p, TypeExpr>> {
    let type_ = param
        .type_
        .as_ref()
        .ok_or_else(|| TranslateError::unsupported(name, "no type declared"))?;
    let inline_schema = param.items.is_some() || param.fields.is_some() || param.symbols.is_some();
    match type_ {
        TypeExpr::Name(t) if inline_schema && matches!(t.as_str(), "array" | "record" | "enum") => {
            Ok(Cow::Owned(TypeExpr::Schema(Box::new(param.clone()))))
        }
        other => Ok(Cow::Borrowed(other)),
    }
}

fn ident_name(param: &Parameter, context: &str) -> Result<String> {
    param
        .ident()
        .map(|id| short_name(id).to_string())
        .filter(|name| !name.is_empty())
        .ok_or_else(|| TranslateError::Document(format!("{context} without an identifier")))
}

/// Members left after dropping `null`, and whether `null` was present.
fn strip_null(members: &[TypeExpr]) -> (Vec<&TypeExpr>, bool) {
    let non_null: Vec<&TypeExpr> = members.iter().filter(|m| !m.is_null()).collect();
    let had_null = non_null.len() < members.len();
    (non_null, had_null)
}

fn single_member<'e>(members: Vec<&'e TypeExpr>, name: &str) -> Result<&'e TypeExpr> {
    match members.as_slice() {
        [single] => Ok(*single),
        [] => Err(TranslateError::unsupported(name, "union contains only null")),
        many => Err(TranslateError::TooManyTypes {
            name: name.to_string(),
            count: many.len(),
        }),
    }
}

// =============================================================================
// INPUTS
// =============================================================================

/// Classification result before node metadata is attached.
struct InputShape {
    kind: InputKind,
    multiple: bool,
    /// Format declared on an array's `items` mapping.
    item_format: Option<String>,
}

impl InputShape {
    fn single(kind: InputKind) -> Self {
        InputShape {
            kind,
            multiple: false,
            item_format: None,
        }
    }
}

/// Resolve one top-level CWL input parameter.
pub fn resolve_input(param: &Parameter, ctx: &ResolveContext) -> Result<InputNode> {
    let name = ident_name(param, "input")?;
    let expr = declared_type(param, &name)?;
    build_input(name, &expr, Some(param), None, ctx)
}

/// Classify a bare type expression into a node named `name`.
pub fn resolve_input_type(name: &str, expr: &TypeExpr, ctx: &ResolveContext) -> Result<InputNode> {
    build_input(name.to_string(), expr, None, None, ctx)
}

fn build_input(
    name: String,
    expr: &TypeExpr,
    meta: Option<&Parameter>,
    parent: Option<String>,
    ctx: &ResolveContext,
) -> Result<InputNode> {
    let mut optional = false;
    let shape = classify_input(expr, &name, &mut optional, ctx)?;

    let format = match shape.kind {
        InputKind::File => meta
            .and_then(Parameter::format_tag)
            .map(str::to_string)
            .or(shape.item_format)
            .and_then(|raw| resolve_format(&raw, ctx.namespaces, ctx.formats)),
        _ => None,
    };

    let node = InputNode {
        label: meta
            .and_then(|m| m.label.clone())
            .unwrap_or_else(|| name.clone()),
        doc: meta.and_then(Parameter::doc_text),
        default_value: meta.and_then(|m| m.default.clone()),
        format,
        optional,
        multiple: shape.multiple,
        parent,
        kind: shape.kind,
        name,
    };
    tracing::debug!(
        name = %node.name,
        kind = node.kind_name(),
        optional = node.optional,
        multiple = node.multiple,
        "resolved input"
    );
    Ok(node)
}

fn classify_input(
    expr: &TypeExpr,
    name: &str,
    optional: &mut bool,
    ctx: &ResolveContext,
) -> Result<InputShape> {
    match expr {
        TypeExpr::Union(members) => {
            let (non_null, had_null) = strip_null(members);
            *optional |= had_null;
            let member = single_member(non_null, name)?;
            classify_input(member, name, optional, ctx)
        }
        TypeExpr::Name(type_name) => {
            if let Some(expanded) = expand_shorthand(type_name) {
                return classify_input(&expanded, name, optional, ctx);
            }
            match primitive_kind(type_name) {
                Some(kind) => Ok(InputShape::single(kind)),
                None if matches!(type_name.as_str(), "array" | "record" | "enum") => Err(
                    TranslateError::unsupported(name, format!("'{type_name}' needs a schema mapping")),
                ),
                None => Err(TranslateError::unsupported(
                    name,
                    format!("unknown type '{type_name}'"),
                )),
            }
        }
        TypeExpr::Schema(schema) => {
            let Some(type_) = schema.type_.as_ref() else {
                return Err(TranslateError::unsupported(name, "type mapping without 'type'"));
            };
            match type_ {
                TypeExpr::Name(t) if t == "array" => classify_input_array(schema, name, ctx),
                TypeExpr::Name(t) if t == "record" => classify_record(schema, name, ctx),
                TypeExpr::Name(t) if t == "enum" => Ok(InputShape::single(InputKind::Select {
                    options: enum_options(schema, name)?,
                })),
                // `{type: File}`, `{type: {type: array, ...}}`
                nested => classify_input(nested, name, optional, ctx),
            }
        }
    }
}

fn classify_input_array(
    schema: &Parameter,
    name: &str,
    ctx: &ResolveContext,
) -> Result<InputShape> {
    let items = schema
        .items
        .as_ref()
        .ok_or_else(|| TranslateError::unsupported(name, "array without 'items'"))?;
    let default_element = || format!("array_{name}");

    match items {
        TypeExpr::Name(item) if item == "File" => Ok(InputShape {
            kind: InputKind::File,
            multiple: true,
            item_format: None,
        }),
        TypeExpr::Name(item) if item == "enum" => Ok(InputShape {
            kind: InputKind::Select { options: vec![] },
            multiple: true,
            item_format: None,
        }),
        TypeExpr::Schema(item_schema) => match &item_schema.type_ {
            Some(TypeExpr::Name(t)) if t == "File" => Ok(InputShape {
                kind: InputKind::File,
                multiple: true,
                item_format: item_schema.format_tag().map(str::to_string),
            }),
            Some(TypeExpr::Name(t)) if t == "enum" => Ok(InputShape {
                kind: InputKind::Select {
                    options: enum_options(item_schema, name)?,
                },
                multiple: true,
                item_format: None,
            }),
            _ => {
                let element_name = item_schema
                    .name
                    .as_deref()
                    .map(short_name)
                    .filter(|n| !n.is_empty())
                    .map(str::to_string)
                    .unwrap_or_else(default_element);
                let element = build_input(element_name, items, Some(&**item_schema), None, ctx)?;
                Ok(InputShape::single(InputKind::Repeat {
                    element: Box::new(element),
                }))
            }
        },
        // any other string item, or a union of items: resolve the items alone
        _ => {
            let element = build_input(default_element(), items, None, None, ctx)?;
            Ok(InputShape::single(InputKind::Repeat {
                element: Box::new(element),
            }))
        }
    }
}

fn classify_record(schema: &Parameter, name: &str, ctx: &ResolveContext) -> Result<InputShape> {
    let mut fields = Vec::new();
    for field in schema.fields.iter().flat_map(|f| f.iter()) {
        let field_name = ident_name(field, "record field")?;
        let expr = declared_type(field, &field_name)?;
        fields.push(build_input(
            field_name,
            &expr,
            Some(field),
            Some(name.to_string()),
            ctx,
        )?);
    }
    Ok(InputShape::single(InputKind::Section { fields }))
}

fn enum_options(schema: &Parameter, name: &str) -> Result<Vec<String>> {
    let symbols = schema
        .symbols
        .as_ref()
        .ok_or_else(|| TranslateError::unsupported(name, "enum without 'symbols'"))?;
    Ok(symbols.iter().map(|s| short_name(s).to_string()).collect())
}

// =============================================================================
// OUTPUTS
// =============================================================================

struct OutputShape {
    kind: OutputKind,
    array: bool,
    item_format: Option<String>,
}

impl OutputShape {
    fn single(kind: OutputKind) -> Self {
        OutputShape {
            kind,
            array: false,
            item_format: None,
        }
    }

    fn array(kind: OutputKind, item_format: Option<String>) -> Self {
        OutputShape {
            kind,
            array: true,
            item_format,
        }
    }
}

/// Resolve one CWL output parameter. `None` for outputs that produce no files.
pub fn resolve_output(param: &Parameter, ctx: &ResolveContext) -> Result<Option<OutputNode>> {
    let name = ident_name(param, "output")?;
    let expr = declared_type(param, &name)?;
    build_output(name, &expr, Some(param), ctx)
}

fn build_output(
    name: String,
    expr: &TypeExpr,
    meta: Option<&Parameter>,
    ctx: &ResolveContext,
) -> Result<Option<OutputNode>> {
    let Some(shape) = classify_output(expr, &name, ctx)? else {
        tracing::debug!(name = %name, "output carries no files, left to captured stdout");
        return Ok(None);
    };

    let glob = meta
        .and_then(Parameter::glob)
        .or_else(|| captured_stream(expr, ctx))
        .map(str::to_string);

    let format = match shape.kind {
        OutputKind::File => meta
            .and_then(Parameter::format_tag)
            .map(str::to_string)
            .or(shape.item_format)
            .and_then(|raw| resolve_format(&raw, ctx.namespaces, ctx.formats)),
        _ => None,
    };

    Ok(Some(OutputNode {
        label: meta
            .and_then(|m| m.label.clone())
            .unwrap_or_else(|| name.clone()),
        doc: meta.and_then(Parameter::doc_text),
        format,
        glob,
        array: shape.array,
        kind: shape.kind,
        name,
    }))
}

/// File name the tool's `stdout` or `stderr` is captured into, for outputs of those types.
fn captured_stream<'a>(expr: &TypeExpr, ctx: &ResolveContext<'a>) -> Option<&'a str> {
    match expr {
        TypeExpr::Name(n) if n == "stdout" => ctx.stdout,
        TypeExpr::Name(n) if n == "stderr" => ctx.stderr,
        TypeExpr::Name(_) | TypeExpr::Schema(_) => None,
        TypeExpr::Union(members) => members.iter().find_map(|m| captured_stream(m, ctx)),
    }
}

fn classify_output(expr: &TypeExpr, name: &str, ctx: &ResolveContext) -> Result<Option<OutputShape>> {
    match expr {
        TypeExpr::Union(members) => {
            let (non_null, _) = strip_null(members);
            let member = single_member(non_null, name)?;
            classify_output(member, name, ctx)
        }
        TypeExpr::Name(type_name) => {
            if let Some(expanded) = expand_shorthand(type_name) {
                return classify_output(&expanded, name, ctx);
            }
            match type_name.as_str() {
                "File" | "stdout" | "stderr" => Ok(Some(OutputShape::single(OutputKind::File))),
                "Directory" => Ok(Some(OutputShape::single(OutputKind::Directory))),
                "string" | "int" | "long" | "float" | "double" | "boolean" | "Any" => Ok(None),
                other => Err(TranslateError::unsupported(
                    name,
                    format!("unknown output type '{other}'"),
                )),
            }
        }
        TypeExpr::Schema(schema) => {
            let Some(type_) = schema.type_.as_ref() else {
                return Err(TranslateError::unsupported(name, "type mapping without 'type'"));
            };
            match type_ {
                TypeExpr::Name(t) if t == "array" => classify_output_array(schema, name, ctx),
                TypeExpr::Name(t) if t == "record" => {
                    let mut fields = Vec::new();
                    for field in schema.fields.iter().flat_map(|f| f.iter()) {
                        let field_name = ident_name(field, "record field")?;
                        let expr = declared_type(field, &field_name)?;
                        if let Some(node) = build_output(field_name, &expr, Some(field), ctx)? {
                            fields.push(node);
                        }
                    }
                    if fields.is_empty() {
                        return Ok(None);
                    }
                    Ok(Some(OutputShape::single(OutputKind::Section { fields })))
                }
                TypeExpr::Name(t) if t == "enum" => Ok(None),
                nested => classify_output(nested, name, ctx),
            }
        }
    }
}

fn classify_output_array(
    schema: &Parameter,
    name: &str,
    ctx: &ResolveContext,
) -> Result<Option<OutputShape>> {
    let items = schema
        .items
        .as_ref()
        .ok_or_else(|| TranslateError::unsupported(name, "array without 'items'"))?;

    let flat = |type_name: &str, item_format: Option<String>| match type_name {
        "File" => Some(OutputShape::array(OutputKind::File, item_format)),
        "Directory" => Some(OutputShape::array(OutputKind::Directory, None)),
        _ => None,
    };

    let (element_name, meta) = match items {
        TypeExpr::Name(item) => {
            if let Some(shape) = flat(item, None) {
                return Ok(Some(shape));
            }
            (format!("array_{name}"), None)
        }
        TypeExpr::Schema(item_schema) => {
            if let Some(TypeExpr::Name(t)) = &item_schema.type_ {
                if let Some(shape) = flat(t, item_schema.format_tag().map(str::to_string)) {
                    return Ok(Some(shape));
                }
            }
            let element_name = item_schema
                .name
                .as_deref()
                .map(short_name)
                .filter(|n| !n.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| format!("array_{name}"));
            (element_name, Some(&**item_schema))
        }
        TypeExpr::Union(_) => (format!("array_{name}"), None),
    };

    let element = build_output(element_name, items, meta, ctx)?;
    Ok(element.map(|element| {
        OutputShape::single(OutputKind::Repeat {
            element: Box::new(element),
        })
    }))
}
