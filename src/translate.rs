//! Full pipeline: document tree → lower → codegen.

use serde_json::Value;

use crate::codegen::template::{GalaxyToolTemplate, ToolTemplate};
use crate::codegen::{self, ToolDescription};
use crate::config::TranslatorConfig;
use crate::error::Result;
use crate::lower::format::{FormatLookup, FormatTable};
use crate::lower::{self, LowerContext};
use crate::parse;

/// Translator with explicit collaborators.
///
/// Without `with_formats`, format labels come from the config's `[formats]` table.
pub struct Translator<'a> {
    config: &'a TranslatorConfig,
    formats: Option<&'a dyn FormatLookup>,
    template: &'a dyn ToolTemplate,
}

impl<'a> Translator<'a> {
    pub fn new(config: &'a TranslatorConfig) -> Self {
        Self {
            config,
            formats: None,
            template: &GalaxyToolTemplate,
        }
    }

    pub fn with_formats(mut self, formats: &'a dyn FormatLookup) -> Self {
        self.formats = Some(formats);
        self
    }

    pub fn with_template(mut self, template: &'a dyn ToolTemplate) -> Self {
        self.template = template;
        self
    }

    /// Translate an already-parsed document tree.
    pub fn translate(&self, doc: &Value) -> Result<ToolDescription> {
        let document = parse::load_document(doc)?;

        let table;
        let formats: &dyn FormatLookup = match self.formats {
            Some(formats) => formats,
            None => {
                table = FormatTable::new(self.config.formats.clone());
                &table
            }
        };

        let ctx = LowerContext {
            config: self.config,
            formats,
        };
        let ir = lower::lower(&document, &ctx)?;
        let description = codegen::codegen(ir, self.config, self.template)?;

        tracing::info!(
            tool = %description.ir.metadata.id,
            inputs = description.ir.inputs.len(),
            outputs = description.ir.outputs.len(),
            "translated CWL document"
        );
        Ok(description)
    }

    /// Parse CWL YAML text, then translate it.
    pub fn translate_str(&self, text: &str) -> Result<ToolDescription> {
        let tree = parse::parse_tree(text)?;
        self.translate(&tree)
    }
}

/// Translate a document tree with the default collaborators.
pub fn translate(doc: &Value, config: &TranslatorConfig) -> Result<ToolDescription> {
    Translator::new(config).translate(doc)
}

/// Translate CWL YAML text with the default collaborators.
pub fn translate_str(text: &str, config: &TranslatorConfig) -> Result<ToolDescription> {
    Translator::new(config).translate_str(text)
}
