//! Tool-level metadata: identity, help text and namespaces.

use serde_json::Value;

use crate::config::TranslatorConfig;
use crate::error::Result;
use crate::help;
use crate::ir::types::{Namespace, ProcessClass, ToolMetadata};
use crate::parse::types::{CwlDocument, Doc};

const DEFAULT_SOURCE_FILE: &str = "tool.cwl";

/// Extract `ToolMetadata` from a loaded document.
///
/// The help command only runs when the document carries no `doc`.
pub fn extract_metadata(doc: &CwlDocument, config: &TranslatorConfig) -> Result<ToolMetadata> {
    let source_file = source_file(doc.id.as_deref());
    let id = tool_id(&source_file);

    let name = doc
        .label
        .clone()
        .filter(|l| !l.is_empty())
        .or_else(|| id_fragment(doc.id.as_deref()))
        .unwrap_or_else(|| id.clone());

    let help = match (&doc.doc, &config.help_from_command) {
        (Some(doc), _) => Some(Doc::text(doc)),
        (None, Some(command)) => Some(help::help_from_command(command, config.help_timeout())?),
        (None, None) => None,
    };

    let version = match &doc.version {
        Some(Value::String(v)) if !v.is_empty() => v.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => config.default_version.clone(),
    };

    let namespaces = doc
        .namespaces
        .iter()
        .filter_map(|(prefix, iri)| {
            iri.as_str().map(|iri| Namespace {
                prefix: prefix.clone(),
                iri: iri.to_string(),
            })
        })
        .collect();

    Ok(ToolMetadata {
        class: ProcessClass::from_class(doc.class.as_deref()),
        id,
        source_file,
        name,
        version,
        help,
        stdout: doc.stdout.clone(),
        stderr: doc.stderr.clone(),
        namespaces,
        schemas: doc.schemas.clone(),
    })
}

/// `file:///tools/bwa-mem.cwl#main` → `bwa-mem.cwl`
fn source_file(id: Option<&str>) -> String {
    id.and_then(|id| id.split('#').next())
        .and_then(|path| path.rsplit('/').next())
        .filter(|file| !file.is_empty())
        .unwrap_or(DEFAULT_SOURCE_FILE)
        .to_string()
}

fn tool_id(source_file: &str) -> String {
    match source_file.strip_suffix(".cwl").unwrap_or(source_file) {
        "" => "tool".to_string(),
        id => id.to_string(),
    }
}

/// Last `#` fragment of the document id, when the id has one.
fn id_fragment(id: Option<&str>) -> Option<String> {
    let (_, fragment) = id?.rsplit_once('#')?;
    let fragment = fragment.rsplit('/').next().unwrap_or(fragment);
    (!fragment.is_empty()).then(|| fragment.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse;

    fn metadata(yaml: &str) -> ToolMetadata {
        extract_metadata(&parse(yaml).unwrap(), &TranslatorConfig::default()).unwrap()
    }

    #[test]
    fn defaults_for_bare_document() {
        let meta = metadata("class: CommandLineTool\ninputs: []\noutputs: []\n");
        assert_eq!(meta.class, ProcessClass::CommandLineTool);
        assert_eq!(meta.source_file, "tool.cwl");
        assert_eq!(meta.id, "tool");
        assert_eq!(meta.name, "tool");
        assert_eq!(meta.version, "0.1.0");
        assert_eq!(meta.help, None);
    }

    #[test]
    fn identity_from_id_and_label() {
        let meta = metadata(
            "class: CommandLineTool\nid: file:///tools/bwa-mem.cwl#main\nlabel: BWA MEM\nversion: 2\n",
        );
        assert_eq!(meta.source_file, "bwa-mem.cwl");
        assert_eq!(meta.id, "bwa-mem");
        assert_eq!(meta.name, "BWA MEM");
        assert_eq!(meta.version, "2");

        let meta = metadata("class: Workflow\nid: file:///tools/pipe.cwl#main\n");
        assert_eq!(meta.class, ProcessClass::Workflow);
        assert_eq!(meta.name, "main");
    }

    #[test]
    fn doc_lines_become_help() {
        let meta = metadata("class: CommandLineTool\ndoc:\n  - line one\n  - line two\n");
        assert_eq!(meta.help.as_deref(), Some("line one\nline two"));
    }

    #[test]
    fn namespaces_keep_declaration_order() {
        let meta = metadata(
            "class: CommandLineTool\n$namespaces:\n  edam: http://edamontology.org/\n  s: https://schema.org/\n$schemas:\n  - https://schema.org/version/latest/schemaorg-current-https.rdf\n",
        );
        let prefixes: Vec<_> = meta.namespaces.iter().map(|n| n.prefix.as_str()).collect();
        assert_eq!(prefixes, vec!["edam", "s"]);
        assert_eq!(meta.schemas.len(), 1);
    }
}
