#![allow(dead_code)]

use std::collections::HashMap;

use cwl2galaxy::ir::*;
use cwl2galaxy::lower::format::NoFormats;
use cwl2galaxy::lower::{self, LowerContext};
use cwl2galaxy::{ToolDescription, TranslatorConfig, parse, translate_str};
use regex::Regex;

// =============================================================================
// Pipeline shortcuts
// =============================================================================

/// Lower a CWL YAML fixture with the default config and no format lookup.
pub fn lower_yaml(yaml: &str) -> cwl2galaxy::Result<ToolIR> {
    let config = TranslatorConfig::default();
    let ctx = LowerContext {
        config: &config,
        formats: &NoFormats,
    };
    lower::lower(&parse::parse(yaml)?, &ctx)
}

pub fn translate_yaml(yaml: &str) -> ToolDescription {
    translate_str(yaml, &TranslatorConfig::default()).expect("fixture should translate")
}

/// The command text between the CDATA markers, without the template indent.
pub fn command_of(description: &ToolDescription) -> String {
    let contents = &description.contents;
    let start = contents.find("<![CDATA[\n").expect("command start") + "<![CDATA[\n".len();
    let end = contents.find("    ]]></command>").expect("command end");
    contents[start..end]
        .lines()
        .map(|l| l.strip_prefix("        ").unwrap_or(l))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn input<'a>(ir: &'a ToolIR, name: &str) -> &'a InputNode {
    ir.inputs
        .iter()
        .find(|i| i.name == name)
        .unwrap_or_else(|| panic!("no input named {name}"))
}

pub fn output<'a>(ir: &'a ToolIR, name: &str) -> &'a OutputNode {
    ir.outputs
        .iter()
        .find(|o| o.name == name)
        .unwrap_or_else(|| panic!("no output named {name}"))
}

// =============================================================================
// IR builders
// =============================================================================

pub fn text(name: &str) -> InputNode {
    InputNode::new(name, InputKind::Scalar { scalar: ScalarKind::Text })
}

pub fn scalar(name: &str, scalar: ScalarKind) -> InputNode {
    InputNode::new(name, InputKind::Scalar { scalar })
}

// =============================================================================
// Markup inspection
// =============================================================================

/// Attributes of the first `<param .../>` or `<param ...>` tag in `xml`.
pub fn param_attrs(xml: &str) -> HashMap<String, String> {
    let tag = Regex::new(r"<param ([^>]*?)/?>").unwrap();
    let attr = Regex::new(r#"([a-z_]+)="([^"]*)""#).unwrap();
    let body = tag
        .captures(xml)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .unwrap_or_else(|| panic!("no <param> tag in {xml}"));
    attr.captures_iter(body)
        .map(|c| (c[1].to_string(), c[2].to_string()))
        .collect()
}

/// `pattern` attribute values of every `discover_datasets` tag, unescaped.
pub fn discovery_patterns(xml: &str) -> Vec<String> {
    let re = Regex::new(r#"<discover_datasets pattern="([^"]*)""#).unwrap();
    re.captures_iter(xml)
        .map(|c| c[1].replace("&lt;", "<").replace("&gt;", ">").replace("&amp;", "&"))
        .collect()
}
