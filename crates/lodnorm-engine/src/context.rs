//! Context expansion: resolves reference-valued context fields into nested
//! summaries of the referenced entities.
//!
//! Expansion depth is an explicit argument. Search uses [`CONTEXT_DEPTH`],
//! so a nested summary never carries context of its own and cyclic graphs
//! cannot recurse.

use std::collections::{BTreeMap, HashSet};

use lodnorm_core::{Graph, Node, Value};
use tracing::{debug, warn};

use crate::consolidator::{consolidate, ConsolidatedRecord, Selection};
use crate::extractor::{extract, CompiledFieldMap, Scope};
use crate::label::full_label;
use crate::language::LanguageSet;
use crate::result::{ContextEntry, ContextValue, NestedSummary};

/// Levels of reference expansion applied to search results.
pub const CONTEXT_DEPTH: usize = 1;

/// Expands the context fields of consolidated records against one graph.
pub struct ContextExpander<'a> {
    graph: &'a Graph,
    summary_map: &'a CompiledFieldMap,
    context_map: &'a CompiledFieldMap,
    languages: &'a LanguageSet,
}

impl<'a> ContextExpander<'a> {
    /// `summary_map` decides whether a referenced entity resolves and what
    /// its summary holds: label, altlabel and id only. `context_map` names
    /// the context fields and supplies their values for nested expansion.
    #[must_use]
    pub fn new(
        graph: &'a Graph,
        summary_map: &'a CompiledFieldMap,
        context_map: &'a CompiledFieldMap,
        languages: &'a LanguageSet,
    ) -> Self {
        Self {
            graph,
            summary_map,
            context_map,
            languages,
        }
    }

    /// Expand every context field of `record`, `depth` levels deep.
    ///
    /// At depth 0 reference lists are returned as bare identifiers.
    #[must_use]
    pub fn expand(&self, record: &ConsolidatedRecord, depth: usize) -> BTreeMap<String, ContextValue> {
        self.context_map
            .context_names()
            .iter()
            .map(|name| (name.clone(), self.expand_field(record.context(name), depth)))
            .collect()
    }

    fn expand_field(&self, values: &[Value], depth: usize) -> ContextValue {
        let all_references = !values.is_empty() && values.iter().all(Value::is_reference);
        if !all_references {
            return ContextValue::Values(self.languages.lexical(values));
        }

        let mut seen = HashSet::new();
        let references: Vec<&Node> = values
            .iter()
            .filter_map(|v| match v {
                Value::Reference(node) => Some(node),
                _ => None,
            })
            .filter(|node| seen.insert(*node))
            .collect();
        let uris = || references.iter().map(ToString::to_string).collect::<Vec<_>>();

        if depth == 0 {
            return ContextValue::Values(uris());
        }

        let entries: Vec<ContextEntry> = references
            .iter()
            .map(|node| self.summarize(node, depth - 1))
            .collect();
        if entries.iter().any(ContextEntry::is_resolved) {
            ContextValue::Entries(entries)
        } else {
            warn!(references = entries.len(), "no context reference resolved in graph");
            ContextValue::Values(uris())
        }
    }

    fn summarize(&self, node: &Node, remaining: usize) -> ContextEntry {
        let uri = node.to_string();
        let bindings = extract(self.graph, self.summary_map, Scope::Subject(node));
        let Some(record) = consolidate(bindings, self.summary_map, Selection::All)
            .into_iter()
            .next()
        else {
            debug!(%uri, "context reference has no statements");
            return ContextEntry::Unresolved { uri };
        };

        let label = full_label(
            &self.languages.lexical(record.label()),
            &self.languages.lexical(record.altlabel()),
        );
        let context = (remaining > 0).then(|| {
            let nested = consolidate(
                extract(self.graph, self.context_map, Scope::Subject(node)),
                self.context_map,
                Selection::All,
            )
            .into_iter()
            .next()
            .unwrap_or_else(|| ConsolidatedRecord::new(node.clone(), self.context_map));
            self.expand(&nested, remaining)
        });
        ContextEntry::Resolved(NestedSummary {
            id: record.id().unwrap_or_else(|| uri.clone()),
            uri,
            label,
            context,
        })
    }
}
