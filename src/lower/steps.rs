//! Workflow step index and `outputSource` resolution.
//!
//! A workflow output carries no glob of its own. It names the step output
//! that produces it, so the glob (and a fallback doc/format) is read from
//! that step's inline `run` document.

use crate::error::Result;
use crate::ir::types::{OutputNode, ProcessClass};
use crate::parse::types::{CwlDocument, Parameter, TypeExpr};
use crate::parse::load_document;

use super::format::resolve_format;
use super::resolve::{ResolveContext, short_name};

#[derive(Debug, Clone, PartialEq)]
pub struct StepDescriptor {
    pub id: String,
    pub outputs: Vec<StepOutput>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StepOutput {
    pub id: String,
    pub glob: Option<String>,
    pub doc: Option<String>,
    pub format: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepIndex {
    steps: Vec<StepDescriptor>,
}

impl StepIndex {
    /// Index the steps of a workflow document. Other classes have no steps.
    pub fn from_document(doc: &CwlDocument) -> Result<Self> {
        let mut steps = Vec::new();
        for step in doc.steps.iter() {
            let id = step.id.as_deref().map(short_name).unwrap_or_default().to_string();
            let outputs = match &step.run {
                Some(run @ serde_json::Value::Object(_)) => {
                    let nested = load_document(run)?;
                    step_outputs(&nested)?
                }
                Some(serde_json::Value::String(path)) => {
                    tracing::warn!(step = %id, run = %path, "step runs an external file, its outputs cannot be followed");
                    Vec::new()
                }
                _ => Vec::new(),
            };
            steps.push(StepDescriptor { id, outputs });
        }
        Ok(Self { steps })
    }

    pub fn steps(&self) -> &[StepDescriptor] {
        &self.steps
    }

    /// Step output named by an `outputSource` reference.
    pub fn find(&self, source: &str) -> Option<&StepOutput> {
        let (step_id, output_id) = split_source(source)?;
        self.steps
            .iter()
            .find(|s| s.id == step_id)?
            .outputs
            .iter()
            .find(|o| o.id == output_id)
    }
}

/// Outputs of a step's `run` document; a nested workflow follows its own sources.
fn step_outputs(doc: &CwlDocument) -> Result<Vec<StepOutput>> {
    let nested_steps = match ProcessClass::from_class(doc.class.as_deref()) {
        ProcessClass::Workflow => StepIndex::from_document(doc)?,
        _ => StepIndex::default(),
    };

    let outputs = doc
        .outputs
        .iter()
        .map(|param| {
            let id = param.ident().map(short_name).unwrap_or_default().to_string();
            let mut output = StepOutput {
                id,
                glob: own_glob(param, doc),
                doc: param.doc_text(),
                format: param.format_tag().map(str::to_string),
            };
            if let Some(upstream) = param.output_source().and_then(|src| nested_steps.find(src)) {
                output.glob = output.glob.or_else(|| upstream.glob.clone());
                output.doc = output.doc.or_else(|| upstream.doc.clone());
                output.format = output.format.or_else(|| upstream.format.clone());
            }
            output
        })
        .collect();
    Ok(outputs)
}

/// The output's glob, or the captured stream file for `stdout`/`stderr` types.
fn own_glob(param: &Parameter, doc: &CwlDocument) -> Option<String> {
    let captured = match &param.type_ {
        Some(TypeExpr::Name(t)) if t == "stdout" => doc.stdout.as_deref(),
        Some(TypeExpr::Name(t)) if t == "stderr" => doc.stderr.as_deref(),
        _ => None,
    };
    param.glob().or(captured).map(str::to_string)
}

/// `#main/align/bam` → `("align", "bam")`: the last two `/` segments after the `#`.
pub fn split_source(source: &str) -> Option<(&str, &str)> {
    let path = source.rsplit('#').next().unwrap_or(source);
    let mut segments = path.rsplit('/');
    let output = segments.next()?;
    let step = segments.next()?;
    Some((step, output))
}

/// Fill a workflow output's glob, doc and format from the step that produces it.
pub fn follow_output_source(
    node: &mut OutputNode,
    source: &str,
    index: &StepIndex,
    ctx: &ResolveContext,
) {
    let Some(step_output) = index.find(source) else {
        tracing::warn!(output = %node.name, source = %source, "outputSource not found among workflow steps");
        return;
    };
    if node.glob.is_none() {
        node.glob = step_output.glob.clone();
    }
    if node.glob.is_none() {
        tracing::warn!(output = %node.name, source = %source, "producing step output declares no glob");
    }
    if node.doc.is_none() {
        node.doc = step_output.doc.clone();
    }
    if node.format.is_none() {
        node.format = step_output
            .format
            .as_deref()
            .and_then(|raw| resolve_format(raw, ctx.namespaces, ctx.formats));
    }
}
