//! Cheetah command that rebuilds the CWL job document from Galaxy parameters.
//!
//! Each input is replayed as one or more `echo '<yaml>' >> $job_gal ;` lines,
//! wrapped in Cheetah `#if` guards for optional inputs and `#for` loops for
//! arrays. The last line hands the job document to the CWL runner.

use crate::config::TranslatorConfig;
use crate::error::{Result, TranslateError};
use crate::ir::types::*;

use super::writer::CodeWriter;

/// Cheetah `#for` loops nest at most this deep.
pub const MAX_LOOP_DEPTH: usize = 2;

/// Emit the full command text for `inputs`, ending with the runner invocation.
pub fn emit_command(
    inputs: &[InputNode],
    metadata: &ToolMetadata,
    config: &TranslatorConfig,
) -> Result<String> {
    let mut emitter = Emitter {
        w: CodeWriter::new(),
        job: &config.job_file,
        root: "",
    };
    for input in inputs {
        emitter.root = input.name.as_str();
        let access = format!("${}", input.name);
        emitter.keyed(input, &access, 0, 0, &input.name)?;
        tracing::debug!(input = %input.name, kind = input.kind_name(), "emitted job document lines");
    }
    emitter.w.blank();
    emitter.w.line(&format!(
        "{} '{}/{}' ${} >> ${}",
        config.runner, config.tool_directory, metadata.source_file, config.job_file, config.stdout_file
    ));
    Ok(emitter.w.finish())
}

struct Emitter<'a> {
    w: CodeWriter,
    job: &'a str,
    /// Top-level input being emitted, named in nesting errors.
    root: &'a str,
}

impl Emitter<'_> {
    /// One job-document fragment at `indent` (two spaces per level).
    fn echo(&mut self, indent: usize, text: &str) {
        let fragment = format!("{}{}", "  ".repeat(indent), text).replace('\'', r"'\''");
        self.w.line(&format!("echo '{fragment}' >> ${} ;", self.job));
    }

    fn guard_open(&mut self, node: &InputNode, access: &str) {
        let collection_like = node.multiple
            || matches!(
                node.kind,
                InputKind::Repeat { .. } | InputKind::Section { .. } | InputKind::DataCollection
            );
        if collection_like {
            self.w.line(&format!("#if {access}:"));
        } else {
            self.w.line(&format!("#if str({access}) not in ('', 'None'):"));
        }
    }

    fn loop_open(&mut self, node: &InputNode, iterable: &str, depth: usize) -> Result<usize> {
        let depth = depth + 1;
        if depth > MAX_LOOP_DEPTH {
            return Err(TranslateError::emission(
                self.root,
                node.kind_name(),
                format!(
                    "arrays nest deeper than {MAX_LOOP_DEPTH} levels at '{}'",
                    node.name
                ),
            ));
        }
        self.w
            .line(&format!("#for $i{depth}, $item{depth} in enumerate({iterable}):"));
        Ok(depth)
    }

    fn loop_close(&mut self) {
        self.w.line("#end for");
    }

    /// `key: value` entry of the top-level mapping or of a record.
    fn keyed(
        &mut self,
        node: &InputNode,
        access: &str,
        indent: usize,
        depth: usize,
        dir: &str,
    ) -> Result<()> {
        if node.optional {
            self.guard_open(node, access);
        }

        let key = &node.name;
        match &node.kind {
            InputKind::Scalar { .. } | InputKind::Select { .. } if !node.multiple => {
                self.echo(indent, &format!("{key}: {access}"));
            }
            InputKind::File if !node.multiple => {
                self.echo(indent, &format!("{key}: {}", file_object(access, node)));
            }
            InputKind::File | InputKind::Select { .. } | InputKind::Scalar { .. } => {
                self.echo(indent, &format!("{key}:"));
                self.multiple_items(node, access, indent + 1, depth)?;
            }
            InputKind::DataCollection => {
                self.link_directory(access, dir);
                self.w.line(&format!(
                    "echo \"{}{key}: {{class: Directory, path: \\$PWD/{dir}}}\" >> ${} ;",
                    "  ".repeat(indent),
                    self.job
                ));
            }
            InputKind::Section { fields } => {
                self.echo(indent, &format!("{key}:"));
                for field in fields {
                    let field_access = format!("{access}.{}", field.name);
                    let field_dir = format!("{dir}_{}", field.name);
                    self.keyed(field, &field_access, indent + 1, depth, &field_dir)?;
                }
            }
            InputKind::Repeat { element } => {
                self.echo(indent, &format!("{key}:"));
                self.repeat_items(node, element, access, indent + 1, depth, dir)?;
            }
        }

        if node.optional {
            self.w.line("#end if");
        }
        Ok(())
    }

    /// One `- value` list entry per value of a multiple File/Select.
    fn multiple_items(
        &mut self,
        node: &InputNode,
        access: &str,
        indent: usize,
        depth: usize,
    ) -> Result<()> {
        let iterable = match node.kind {
            InputKind::Select { .. } => format!("str({access}).split(',')"),
            _ => access.to_string(),
        };
        let d = self.loop_open(node, &iterable, depth)?;
        let item = format!("$item{d}");
        let value = match node.kind {
            InputKind::File => file_object(&item, node),
            _ => item,
        };
        self.echo(indent, &format!("- {value}"));
        self.loop_close();
        Ok(())
    }

    /// One list entry per repeat iteration, each built from the element.
    fn repeat_items(
        &mut self,
        repeat: &InputNode,
        element: &InputNode,
        access: &str,
        indent: usize,
        depth: usize,
        dir: &str,
    ) -> Result<()> {
        let d = self.loop_open(repeat, access, depth)?;
        let element_access = format!("$item{d}.{}", element.name);
        let element_dir = format!("{dir}_${{i{d}}}");
        self.list_item(element, &element_access, indent, d, &element_dir)?;
        self.loop_close();
        Ok(())
    }

    /// A `- …` entry inside a list.
    fn list_item(
        &mut self,
        node: &InputNode,
        access: &str,
        indent: usize,
        depth: usize,
        dir: &str,
    ) -> Result<()> {
        if node.optional {
            self.guard_open(node, access);
        }

        match &node.kind {
            InputKind::Scalar { .. } | InputKind::Select { .. } if !node.multiple => {
                self.echo(indent, &format!("- {access}"));
            }
            InputKind::File if !node.multiple => {
                self.echo(indent, &format!("- {}", file_object(access, node)));
            }
            InputKind::File | InputKind::Select { .. } | InputKind::Scalar { .. } => {
                self.echo(indent, "-");
                self.multiple_items(node, access, indent + 1, depth)?;
            }
            InputKind::DataCollection => {
                self.link_directory(access, dir);
                self.w.line(&format!(
                    "echo \"{}- {{class: Directory, path: \\$PWD/{dir}}}\" >> ${} ;",
                    "  ".repeat(indent),
                    self.job
                ));
            }
            InputKind::Section { fields } => {
                self.echo(indent, "-");
                for field in fields {
                    let field_access = format!("{access}.{}", field.name);
                    let field_dir = format!("{dir}_{}", field.name);
                    self.keyed(field, &field_access, indent + 1, depth, &field_dir)?;
                }
            }
            InputKind::Repeat { element } => {
                self.echo(indent, "-");
                self.repeat_items(node, element, access, indent + 1, depth, dir)?;
            }
        }

        if node.optional {
            self.w.line("#end if");
        }
        Ok(())
    }

    /// Materialize a Galaxy list collection as a directory of symlinks.
    fn link_directory(&mut self, access: &str, dir: &str) {
        self.w.line(&format!("mkdir -p {dir} ;"));
        self.w.line(&format!("#for $el in {access}:"));
        self.w
            .line(&format!("ln -s '$el' './{dir}/$el.element_identifier' ;"));
        self.w.line("#end for");
    }
}

fn file_object(path: &str, node: &InputNode) -> String {
    match &node.format {
        Some(format) => format!("{{class: File, path: {path}, format: {format}}}"),
        None => format!("{{class: File, path: {path}}}"),
    }
}
