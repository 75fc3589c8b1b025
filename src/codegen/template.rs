//! Galaxy tool XML template.
//!
//! Rendering is a seam: codegen fills `ToolBindings` and any `ToolTemplate`
//! turns them into the final document.

use serde::Serialize;

use super::markup::escape_attr;
use super::writer::CodeWriter;

pub const DEFAULT_HELP: &str = "TODO: Fill in help.";

/// Everything a template can substitute into a tool description.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolBindings {
    pub id: String,
    pub name: String,
    pub version: String,
    pub python_template_version: String,
    pub description: Option<String>,
    /// Command text, one Cheetah/shell line per line.
    pub command: String,
    /// Rendered `<param>`/`<section>`/`<repeat>` blocks.
    pub inputs: Vec<String>,
    /// Rendered `<data>`/`<collection>` blocks.
    pub outputs: Vec<String>,
    pub help: Option<String>,
    /// Requirements and citations come from `macros.xml`.
    pub macros: bool,
}

pub trait ToolTemplate {
    fn render(&self, bindings: &ToolBindings) -> String;
}

/// The standard Galaxy tool layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct GalaxyToolTemplate;

impl ToolTemplate for GalaxyToolTemplate {
    fn render(&self, b: &ToolBindings) -> String {
        let mut w = CodeWriter::new();
        w.open(&format!(
            r#"<tool id="{}" name="{}" version="{}" python_template_version="{}">"#,
            escape_attr(&b.id),
            escape_attr(&b.name),
            escape_attr(&b.version),
            escape_attr(&b.python_template_version)
        ));

        if let Some(description) = &b.description {
            w.line(&format!("<description>{}</description>", escape_attr(description)));
        }
        if b.macros {
            w.open("<macros>");
            w.line("<import>macros.xml</import>");
            w.close("</macros>");
            w.line(r#"<expand macro="requirements" />"#);
        } else {
            w.line("<requirements>");
            w.line("</requirements>");
        }

        w.line(r#"<command detect_errors="exit_code"><![CDATA["#);
        w.indent();
        w.lines(&cdata(&b.command));
        w.close("]]></command>");

        w.open("<inputs>");
        for input in &b.inputs {
            w.lines(input);
        }
        w.close("</inputs>");

        w.open("<outputs>");
        for output in &b.outputs {
            w.lines(output);
        }
        w.close("</outputs>");

        w.line("<help><![CDATA[");
        w.lines(&cdata(b.help.as_deref().unwrap_or(DEFAULT_HELP)));
        w.line("]]></help>");

        if b.macros {
            w.line(r#"<expand macro="citations" />"#);
        }
        w.close("</tool>");
        w.finish()
    }
}

/// Side file imported by tools rendered with `macros = true`.
pub fn macros_xml() -> String {
    let mut w = CodeWriter::new();
    w.open("<macros>");
    w.open(r#"<xml name="requirements">"#);
    w.open("<requirements>");
    w.line("<yield/>");
    w.close("</requirements>");
    w.close("</xml>");
    w.open(r#"<xml name="citations">"#);
    w.open("<citations>");
    w.line("<yield />");
    w.close("</citations>");
    w.close("</xml>");
    w.close("</macros>");
    w.finish()
}

/// Split any `]]>` so the text cannot terminate its CDATA section.
fn cdata(text: &str) -> String {
    text.replace("]]>", "]]]]><![CDATA[>")
}
