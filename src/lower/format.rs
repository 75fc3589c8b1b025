//! Format tag → display label resolution.
//!
//! Ontology loading is not done here: a `FormatLookup` answers
//! `(prefix, tag)` queries, and any miss falls back to the raw tag.

use std::collections::BTreeMap;

use crate::ir::types::Namespace;
use crate::parse::types::is_expression;

pub trait FormatLookup {
    /// Human label for `tag` in the namespace declared as `prefix`, if known.
    fn lookup(&self, prefix: &str, tag: &str) -> Option<String>;
}

/// Lookup that never resolves anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFormats;

impl FormatLookup for NoFormats {
    fn lookup(&self, _prefix: &str, _tag: &str) -> Option<String> {
        None
    }
}

/// Static table keyed by `prefix:tag`.
#[derive(Debug, Clone, Default)]
pub struct FormatTable {
    labels: BTreeMap<String, String>,
}

impl FormatTable {
    pub fn new(labels: BTreeMap<String, String>) -> Self {
        Self { labels }
    }

    pub fn insert(&mut self, prefix: &str, tag: &str, label: impl Into<String>) {
        self.labels.insert(format!("{prefix}:{tag}"), label.into());
    }
}

impl FormatLookup for FormatTable {
    fn lookup(&self, prefix: &str, tag: &str) -> Option<String> {
        self.labels.get(&format!("{prefix}:{tag}")).cloned()
    }
}

/// Resolve a raw format value against the document's namespaces.
///
/// Accepts `prefix:tag` for a declared prefix and full IRIs under a declared
/// namespace; undeclared prefixes and lookup misses keep the raw tag.
/// Expressions are only known at run time and resolve to no format.
pub fn resolve_format(
    raw: &str,
    namespaces: &[Namespace],
    lookup: &dyn FormatLookup,
) -> Option<String> {
    if is_expression(raw) {
        tracing::debug!(format = %raw, "format is an expression, dropping it");
        return None;
    }

    let query = raw
        .split_once(':')
        .and_then(|(prefix, tag)| {
            namespaces
                .iter()
                .find(|ns| ns.prefix == prefix)
                .map(|ns| (ns.prefix.as_str(), tag))
        })
        .or_else(|| {
            namespaces
                .iter()
                .find(|ns| !ns.iri.is_empty() && raw.starts_with(&ns.iri))
                .map(|ns| (ns.prefix.as_str(), raw.rsplit('/').next().unwrap_or(raw)))
        });

    match query.and_then(|(prefix, tag)| lookup.lookup(prefix, tag)) {
        Some(label) => Some(label),
        None => {
            tracing::debug!(format = %raw, "format label not found, keeping raw tag");
            Some(raw.to_string())
        }
    }
}
