//! Codegen pass: ToolIR → Galaxy tool description.
//!
//! Public API: `codegen(ir, config, template) -> ToolDescription`

pub mod command;
pub mod glob;
pub mod markup;
pub mod template;
mod writer;

use serde::Serialize;

use crate::config::TranslatorConfig;
use crate::error::Result;
use crate::ir::types::ToolIR;
use template::{ToolBindings, ToolTemplate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ToolFileKind {
    Macros,
    Test,
    Job,
}

/// A side file written next to the tool XML.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolFile {
    pub path: String,
    pub contents: String,
    pub kind: ToolFileKind,
}

/// The complete output of a translation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDescription {
    /// Rendered tool XML.
    pub contents: String,
    pub tool_files: Vec<ToolFile>,
    /// Test data to copy next to the tool.
    pub test_files: Vec<String>,
    pub ir: ToolIR,
}

/// Render a ToolIR into a tool description.
pub fn codegen(
    ir: ToolIR,
    config: &TranslatorConfig,
    template: &dyn ToolTemplate,
) -> Result<ToolDescription> {
    // 1. COMMAND
    let command = command::emit_command(&ir.inputs, &ir.metadata, config)?;

    // 2. DECLARATIONS
    let inputs = ir.inputs.iter().map(markup::render_input).collect();
    let mut outputs = markup::fixed_outputs(config);
    outputs.extend(ir.outputs.iter().map(markup::render_output));

    // 3. TEMPLATE
    let bindings = ToolBindings {
        id: ir.metadata.id.clone(),
        name: ir.metadata.name.clone(),
        version: ir.metadata.version.clone(),
        python_template_version: config.python_template_version.clone(),
        description: None,
        command,
        inputs,
        outputs,
        help: ir.metadata.help.clone(),
        macros: config.macros,
    };
    let contents = template.render(&bindings);

    // 4. SIDE FILES
    let mut tool_files = Vec::new();
    if config.macros {
        tool_files.push(ToolFile {
            path: "macros.xml".into(),
            contents: template::macros_xml(),
            kind: ToolFileKind::Macros,
        });
    }

    Ok(ToolDescription {
        contents,
        tool_files,
        test_files: Vec::new(),
        ir,
    })
}
