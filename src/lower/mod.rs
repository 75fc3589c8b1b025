//! Lowering phase: CwlDocument → ToolIR.
//!
//! Extracts tool metadata, resolves every input and output type expression
//! into the closed IR kinds, and follows workflow `outputSource` references
//! into the producing steps.

pub mod format;
pub mod metadata;
pub mod resolve;
pub mod steps;

use crate::config::TranslatorConfig;
use crate::error::Result;
use crate::ir::types::*;
use crate::parse::types::CwlDocument;

use format::FormatLookup;
use resolve::ResolveContext;
use steps::StepIndex;

/// Collaborators used while lowering one document.
pub struct LowerContext<'a> {
    pub config: &'a TranslatorConfig,
    pub formats: &'a dyn FormatLookup,
}

/// Lower a loaded CWL document into a ToolIR.
pub fn lower(doc: &CwlDocument, ctx: &LowerContext) -> Result<ToolIR> {
    // 1. Metadata (may run the help command)
    let metadata = metadata::extract_metadata(doc, ctx.config)?;

    let resolve_ctx = ResolveContext {
        namespaces: &metadata.namespaces,
        formats: ctx.formats,
        stdout: metadata.stdout.as_deref(),
        stderr: metadata.stderr.as_deref(),
    };

    // 2. Inputs, in declaration order
    let inputs = doc
        .inputs
        .iter()
        .map(|param| resolve::resolve_input(param, &resolve_ctx))
        .collect::<Result<Vec<_>>>()?;

    // 3. Outputs; workflow outputs take their glob from the producing step
    let step_index = match metadata.class {
        ProcessClass::Workflow => StepIndex::from_document(doc)?,
        _ => StepIndex::default(),
    };
    let mut outputs = Vec::new();
    for param in doc.outputs.iter() {
        let Some(mut node) = resolve::resolve_output(param, &resolve_ctx)? else {
            continue;
        };
        if let Some(source) = param.output_source() {
            steps::follow_output_source(&mut node, source, &step_index, &resolve_ctx);
        }
        outputs.push(node);
    }

    Ok(ToolIR {
        metadata,
        inputs,
        outputs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse;
    use format::NoFormats;

    fn lower_yaml(yaml: &str) -> Result<ToolIR> {
        let config = TranslatorConfig::default();
        let ctx = LowerContext {
            config: &config,
            formats: &NoFormats,
        };
        lower(&parse(yaml).unwrap(), &ctx)
    }

    #[test]
    fn inputs_keep_order_and_scalar_outputs_drop() {
        let ir = lower_yaml(
            r#"
class: CommandLineTool
id: count.cwl
inputs:
  zeta: string
  alpha: int?
outputs:
  total: int
  report:
    type: File
    outputBinding:
      glob: report.txt
"#,
        )
        .unwrap();
        let names: Vec<_> = ir.inputs.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
        assert_eq!(ir.outputs.len(), 1);
        assert_eq!(ir.outputs[0].name, "report");
    }

    #[test]
    fn too_many_types_aborts_lowering() {
        let err = lower_yaml("class: CommandLineTool\ninputs:\n  x: [string, int]\n").unwrap_err();
        assert_eq!(err.code(), "R002");
        assert_eq!(err.node(), Some("x"));
    }
}
