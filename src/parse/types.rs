//! Rust types mirroring the CWL object model.
//!
//! These types are the serde target for a parsed CWL document tree. Only the
//! keys the translator reads are modelled; everything else is ignored.
//! CWL lets `inputs`, `outputs`, record `fields` and `steps` be written either
//! as a list of entries carrying an identifier or as a map keyed by it, so
//! those collections deserialize through an intermediate `Value`.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// =============================================================================
// TOP-LEVEL DOCUMENT
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CwlDocument {
    #[serde(default)]
    pub class: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    pub label: Option<String>,
    pub doc: Option<Doc>,
    /// Free-form; documents write it as a string or a bare number.
    pub version: Option<Value>,
    pub stdout: Option<String>,
    pub stderr: Option<String>,
    #[serde(default)]
    pub inputs: Parameters,
    #[serde(default)]
    pub outputs: Parameters,
    #[serde(rename = "$namespaces", default)]
    pub namespaces: serde_json::Map<String, Value>,
    #[serde(rename = "$schemas", default)]
    pub schemas: Vec<String>,
    #[serde(default)]
    pub steps: Steps,
    pub requirements: Option<Value>,
}

/// `doc` is either one string or a list of lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Doc {
    Text(String),
    Lines(Vec<String>),
}

impl Doc {
    pub fn text(&self) -> String {
        match self {
            Doc::Text(t) => t.clone(),
            Doc::Lines(lines) => lines.join("\n"),
        }
    }
}

// =============================================================================
// TYPE EXPRESSIONS
// =============================================================================

/// A raw CWL type expression, before classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeExpr {
    /// `string`, `File`, `File[]`, `int?`, a named schema reference, ...
    Name(String),
    /// `[null, File]`
    Union(Vec<TypeExpr>),
    /// `{type: array, items: ...}`, `{type: record, fields: ...}`, `{type: enum, symbols: ...}`
    Schema(Box<Parameter>),
}

impl TypeExpr {
    pub fn name(name: &str) -> Self {
        TypeExpr::Name(name.to_string())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, TypeExpr::Name(n) if n == "null")
    }
}

// =============================================================================
// PARAMETERS
// =============================================================================

/// An input/output parameter, a record field, or a nested type schema.
///
/// Nested schemas share this shape: `{type: array, items: File}` may appear
/// as a parameter's `type`, or with `items` directly on the parameter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub type_: Option<TypeExpr>,
    pub items: Option<TypeExpr>,
    pub fields: Option<Parameters>,
    pub symbols: Option<Vec<String>>,
    pub label: Option<String>,
    pub doc: Option<Doc>,
    pub default: Option<Value>,
    /// A string, a list of strings, or an expression.
    pub format: Option<Value>,
    #[serde(rename = "outputBinding")]
    pub output_binding: Option<OutputBinding>,
    #[serde(rename = "outputSource")]
    pub output_source: Option<Value>,
}

impl Parameter {
    /// The raw identifier: `id` for parameters, `name` for record fields and schemas.
    pub fn ident(&self) -> Option<&str> {
        self.id.as_deref().or(self.name.as_deref())
    }

    pub fn doc_text(&self) -> Option<String> {
        self.doc.as_ref().map(Doc::text)
    }

    /// First format tag; format lists are collapsed to their first entry.
    pub fn format_tag(&self) -> Option<&str> {
        first_str(self.format.as_ref()?)
    }

    pub fn glob(&self) -> Option<&str> {
        first_str(self.output_binding.as_ref()?.glob.as_ref()?)
    }

    /// First `outputSource` entry (workflow outputs only).
    pub fn output_source(&self) -> Option<&str> {
        first_str(self.output_source.as_ref()?)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputBinding {
    pub glob: Option<Value>,
}

/// CWL parameter reference or JavaScript expression, only known at run time.
pub fn is_expression(value: &str) -> bool {
    value.contains("$(") || value.contains("${")
}

fn first_str(value: &Value) -> Option<&str> {
    match value {
        Value::String(s) => Some(s),
        Value::Array(items) => items.iter().find_map(Value::as_str),
        _ => None,
    }
}

/// Ordered parameter collection accepting both list and map form.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Parameters(pub Vec<Parameter>);

impl Parameters {
    pub fn iter(&self) -> std::slice::Iter<'_, Parameter> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn from_value(value: Value) -> Result<Self, String> {
        match value {
            Value::Null => Ok(Parameters::default()),
            Value::Array(entries) => entries
                .into_iter()
                .map(|entry| serde_json::from_value::<Parameter>(entry).map_err(|e| e.to_string()))
                .collect::<Result<Vec<_>, _>>()
                .map(Parameters),
            Value::Object(map) => {
                let mut params = Vec::with_capacity(map.len());
                for (key, entry) in map {
                    let mut param = match entry {
                        Value::Object(_) => {
                            serde_json::from_value::<Parameter>(entry).map_err(|e| e.to_string())?
                        }
                        // `name: File?` shorthand: the value is the type itself
                        other => Parameter {
                            type_: Some(
                                serde_json::from_value::<TypeExpr>(other)
                                    .map_err(|e| format!("parameter '{key}': {e}"))?,
                            ),
                            ..Parameter::default()
                        },
                    };
                    if param.ident().is_none() {
                        param.id = Some(key);
                    }
                    params.push(param);
                }
                Ok(Parameters(params))
            }
            other => Err(format!("expected a list or map of parameters, found {other}")),
        }
    }
}

impl<'de> Deserialize<'de> for Parameters {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Parameters::from_value(value).map_err(D::Error::custom)
    }
}

// =============================================================================
// WORKFLOW STEPS
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub id: Option<String>,
    /// Inline process document, or a path to one.
    pub run: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Steps(pub Vec<Step>);

impl Steps {
    pub fn iter(&self) -> std::slice::Iter<'_, Step> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn from_value(value: Value) -> Result<Self, String> {
        match value {
            Value::Null => Ok(Steps::default()),
            Value::Array(entries) => entries
                .into_iter()
                .map(|entry| serde_json::from_value::<Step>(entry).map_err(|e| e.to_string()))
                .collect::<Result<Vec<_>, _>>()
                .map(Steps),
            Value::Object(map) => {
                let mut steps = Vec::with_capacity(map.len());
                for (key, entry) in map {
                    let mut step =
                        serde_json::from_value::<Step>(entry).map_err(|e| format!("step '{key}': {e}"))?;
                    if step.id.is_none() {
                        step.id = Some(key);
                    }
                    steps.push(step);
                }
                Ok(Steps(steps))
            }
            other => Err(format!("expected a list or map of steps, found {other}")),
        }
    }
}

impl<'de> Deserialize<'de> for Steps {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Steps::from_value(value).map_err(D::Error::custom)
    }
}
