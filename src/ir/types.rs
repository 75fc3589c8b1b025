//! IR type definitions for the CWL → Galaxy translator.
//!
//! The IR bridges the CWL document (input) and the Galaxy tool XML + Cheetah
//! command (output). CWL's recursive type grammar is classified into a closed
//! set of kinds; every node owns its children, and a record field names its
//! enclosing record instead of pointing at it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// =============================================================================
// TOP-LEVEL IR
// =============================================================================

/// Complete intermediate representation of one translated CWL process.
/// Produced by the lowering pass, consumed by codegen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolIR {
    pub metadata: ToolMetadata,
    /// Inputs in declaration order; the command replays them in this order.
    pub inputs: Vec<InputNode>,
    /// Only outputs that produce files; scalar outputs live in the captured stdout.
    pub outputs: Vec<OutputNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolMetadata {
    pub class: ProcessClass,
    /// Galaxy tool id.
    pub id: String,
    /// File name of the CWL document the generated command runs.
    pub source_file: String,
    /// Galaxy tool display name.
    pub name: String,
    pub version: String,
    pub help: Option<String>,
    pub stdout: Option<String>,
    pub stderr: Option<String>,
    /// `$namespaces` in declaration order.
    pub namespaces: Vec<Namespace>,
    pub schemas: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcessClass {
    CommandLineTool,
    Workflow,
    ExpressionTool,
    Other(String),
}

impl ProcessClass {
    pub fn from_class(class: Option<&str>) -> Self {
        match class {
            Some("CommandLineTool") | None => ProcessClass::CommandLineTool,
            Some("Workflow") => ProcessClass::Workflow,
            Some("ExpressionTool") => ProcessClass::ExpressionTool,
            Some(other) => ProcessClass::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Namespace {
    pub prefix: String,
    pub iri: String,
}

// =============================================================================
// INPUT MODEL
// =============================================================================

/// One Galaxy parameter (or parameter group) derived from a CWL input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputNode {
    pub name: String,
    pub label: String,
    pub doc: Option<String>,
    pub default_value: Option<Value>,
    /// Display label of the format, or the raw tag when lookup failed.
    pub format: Option<String>,
    /// The CWL type was a union with `null`.
    pub optional: bool,
    /// Array of File or array of enum, flattened into one multi-valued parameter.
    pub multiple: bool,
    /// Name of the enclosing record, for record fields. A lookup key only;
    /// command access is built from the nesting path.
    pub parent: Option<String>,
    pub kind: InputKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputKind {
    Scalar { scalar: ScalarKind },
    File,
    Select { options: Vec<String> },
    /// CWL `Directory`, carried as a Galaxy list collection.
    DataCollection,
    /// CWL array of structured items.
    Repeat { element: Box<InputNode> },
    /// CWL record.
    Section { fields: Vec<InputNode> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarKind {
    Text,
    Integer,
    Float,
    Boolean,
}

impl ScalarKind {
    pub fn galaxy_type(self) -> &'static str {
        match self {
            ScalarKind::Text => "text",
            ScalarKind::Integer => "integer",
            ScalarKind::Float => "float",
            ScalarKind::Boolean => "boolean",
        }
    }
}

impl InputKind {
    /// Galaxy `type` attribute for parameter kinds, the block element name otherwise.
    pub fn galaxy_type(&self) -> &'static str {
        match self {
            InputKind::Scalar { scalar } => scalar.galaxy_type(),
            InputKind::File => "data",
            InputKind::Select { .. } => "select",
            InputKind::DataCollection => "data_collection",
            InputKind::Repeat { .. } => "repeat",
            InputKind::Section { .. } => "section",
        }
    }
}

impl InputNode {
    /// A node with label defaulted to its name and no optional attributes.
    pub fn new(name: impl Into<String>, kind: InputKind) -> Self {
        let name = name.into();
        InputNode {
            label: name.clone(),
            name,
            doc: None,
            default_value: None,
            format: None,
            optional: false,
            multiple: false,
            parent: None,
            kind,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        self.kind.galaxy_type()
    }
}

// =============================================================================
// OUTPUT MODEL
// =============================================================================

/// One Galaxy output (dataset or collection) derived from a CWL output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputNode {
    pub name: String,
    pub label: String,
    pub doc: Option<String>,
    pub format: Option<String>,
    /// Discovery expression; for workflow outputs, taken from the producing step.
    pub glob: Option<String>,
    /// Array of File/Directory, flattened into one collection.
    pub array: bool,
    pub kind: OutputKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OutputKind {
    File,
    Directory,
    Section { fields: Vec<OutputNode> },
    Repeat { element: Box<OutputNode> },
}

impl OutputNode {
    pub fn new(name: impl Into<String>, kind: OutputKind) -> Self {
        let name = name.into();
        OutputNode {
            label: name.clone(),
            name,
            doc: None,
            format: None,
            glob: None,
            array: false,
            kind,
        }
    }
}
