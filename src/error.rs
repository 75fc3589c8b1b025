//! Unified translator error type used across all phases.

use serde::Serialize;

pub type Result<T> = std::result::Result<T, TranslateError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    Parse,
    Resolve,
    Emit,
    Render,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Parse => write!(f, "Parse"),
            Phase::Resolve => write!(f, "Resolve"),
            Phase::Emit => write!(f, "Emit"),
            Phase::Render => write!(f, "Render"),
        }
    }
}

/// Every fatal condition that aborts a translation.
///
/// Soft failures (missing labels, unknown format tags, unresolved output
/// sources) never surface here; they are logged and replaced by defaults.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TranslateError {
    /// The YAML/JSON text could not be parsed at all.
    #[error("failed to parse CWL document: {0}")]
    Parse(String),

    /// The document tree does not follow the CWL object model.
    #[error("malformed CWL document: {0}")]
    Document(String),

    /// A type expression outside the recognized CWL type grammar.
    #[error("unsupported type for '{name}': {detail}")]
    UnsupportedType { name: String, detail: String },

    /// A union with more than one non-null member.
    #[error("too many types for '{name}': union has {count} non-null members")]
    TooManyTypes { name: String, count: usize },

    /// A classified node that no command-emission rule accepts.
    #[error("cannot emit command for '{name}' ({kind}): {reason}")]
    Emission {
        name: String,
        kind: String,
        reason: String,
    },

    /// The help-text command could not be run to completion.
    #[error("help command '{command}' failed: {reason}")]
    HelpCommand { command: String, reason: String },

    /// Invalid translator configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl TranslateError {
    pub fn unsupported(name: &str, detail: impl Into<String>) -> Self {
        TranslateError::UnsupportedType {
            name: name.into(),
            detail: detail.into(),
        }
    }

    pub fn emission(name: &str, kind: &str, reason: impl Into<String>) -> Self {
        TranslateError::Emission {
            name: name.into(),
            kind: kind.into(),
            reason: reason.into(),
        }
    }

    /// Stable machine-readable code, e.g. `R002`.
    pub fn code(&self) -> &'static str {
        match self {
            TranslateError::Parse(_) => "P001",
            TranslateError::Document(_) => "P002",
            TranslateError::UnsupportedType { .. } => "R001",
            TranslateError::TooManyTypes { .. } => "R002",
            TranslateError::Emission { .. } => "E001",
            TranslateError::HelpCommand { .. } => "H001",
            TranslateError::Config(_) => "C001",
        }
    }

    pub fn phase(&self) -> Phase {
        match self {
            TranslateError::Parse(_) | TranslateError::Document(_) | TranslateError::Config(_) => {
                Phase::Parse
            }
            TranslateError::UnsupportedType { .. } | TranslateError::TooManyTypes { .. } => {
                Phase::Resolve
            }
            TranslateError::Emission { .. } => Phase::Emit,
            TranslateError::HelpCommand { .. } => Phase::Render,
        }
    }

    /// Name of the offending input/output, when the error is tied to one.
    pub fn node(&self) -> Option<&str> {
        match self {
            TranslateError::UnsupportedType { name, .. }
            | TranslateError::TooManyTypes { name, .. }
            | TranslateError::Emission { name, .. } => Some(name),
            _ => None,
        }
    }
}

impl From<serde_yaml::Error> for TranslateError {
    fn from(e: serde_yaml::Error) -> Self {
        TranslateError::Parse(e.to_string())
    }
}
