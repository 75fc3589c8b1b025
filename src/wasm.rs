//! WASM entry point for browser use.

use wasm_bindgen::prelude::*;

use crate::config::TranslatorConfig;
use crate::error::TranslateError;

/// Full pipeline: parse → lower → codegen, with the default configuration.
/// Returns a JSON object with either `contents`/`files` (success) or `errors` (failure).
#[wasm_bindgen]
pub fn translate_cwl(yaml: &str) -> JsValue {
    let result = translate_cwl_inner(yaml);
    serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
}

fn translate_cwl_inner(yaml: &str) -> TranslateResult {
    match crate::translate::translate_str(yaml, &TranslatorConfig::default()) {
        Ok(description) => TranslateResult::Success {
            contents: description.contents,
            files: description
                .tool_files
                .into_iter()
                .map(|f| FileDto {
                    path: f.path,
                    content: f.contents,
                })
                .collect(),
        },
        Err(e) => TranslateResult::Errors {
            errors: vec![ErrorDto::from(e)],
        },
    }
}

// ---------------------------------------------------------------------------
// DTOs for serialization to JS
// ---------------------------------------------------------------------------

#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct ErrorDto {
    code: String,
    phase: String,
    message: String,
    node: Option<String>,
}

impl From<TranslateError> for ErrorDto {
    fn from(e: TranslateError) -> Self {
        ErrorDto {
            code: e.code().to_string(),
            phase: e.phase().to_string(),
            node: e.node().map(str::to_string),
            message: e.to_string(),
        }
    }
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct FileDto {
    path: String,
    content: String,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
#[serde(tag = "status")]
enum TranslateResult {
    #[serde(rename = "success")]
    Success {
        contents: String,
        files: Vec<FileDto>,
    },
    #[serde(rename = "errors")]
    Errors { errors: Vec<ErrorDto> },
}
