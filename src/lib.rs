pub mod codegen;
pub mod config;
pub mod error;
pub mod help;
pub mod ir;
pub mod lower;
pub mod parse;
pub mod translate;
pub mod wasm;

pub use codegen::ToolDescription;
pub use config::TranslatorConfig;
pub use error::{Result, TranslateError};
pub use translate::{Translator, translate, translate_str};
