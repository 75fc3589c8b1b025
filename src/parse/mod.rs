//! Parse phase: CWL YAML → document tree → typed CWL model.

pub mod types;

pub use types::*;

use serde_json::Value;

use crate::error::{Result, TranslateError};

/// Parse CWL YAML (or JSON, which is a YAML subset) into a document tree.
///
/// Map order is preserved so parameters keep their declaration order.
pub fn parse_tree(text: &str) -> Result<Value> {
    Ok(serde_yaml::from_str::<Value>(text)?)
}

/// Read the typed CWL model out of an already-parsed document tree.
pub fn load_document(tree: &Value) -> Result<CwlDocument> {
    if !tree.is_object() {
        return Err(TranslateError::Document(
            "top-level CWL document must be a mapping".into(),
        ));
    }
    serde_json::from_value::<CwlDocument>(tree.clone())
        .map_err(|e| TranslateError::Document(e.to_string()))
}

/// Parse the YAML text and load the model in one step.
pub fn parse(text: &str) -> Result<CwlDocument> {
    let tree = parse_tree(text)?;
    load_document(&tree)
}
