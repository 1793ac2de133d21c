//! Output shapes for search results and term records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A one-level summary of a referenced entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NestedSummary {
    pub uri: String,
    pub id: String,
    pub label: String,
    /// Only present when expansion runs deeper than one level.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<BTreeMap<String, ContextValue>>,
}

/// One entry of an expanded reference-valued context field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContextEntry {
    Resolved(NestedSummary),
    /// The graph holds nothing for this reference.
    Unresolved { uri: String },
}

impl ContextEntry {
    #[must_use]
    pub fn uri(&self) -> &str {
        match self {
            ContextEntry::Resolved(summary) => &summary.uri,
            ContextEntry::Unresolved { uri } => uri,
        }
    }

    #[must_use]
    pub fn is_resolved(&self) -> bool {
        matches!(self, ContextEntry::Resolved(_))
    }
}

/// The value of one context field in a search result.
///
/// `Values` holds language-resolved literals, or bare identifiers when no
/// reference in the field could be summarized. `Entries` holds nested
/// summaries, with placeholders for references the graph knows nothing about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContextValue {
    Entries(Vec<ContextEntry>),
    Values(Vec<String>),
}

/// One ranked search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub uri: String,
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<BTreeMap<String, ContextValue>>,
}

/// The detailed record returned by a term lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermRecord {
    pub uri: String,
    pub id: String,
    pub label: Vec<String>,
    pub altlabel: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sameas: Option<Vec<String>>,
    /// Every predicate of the subject with all of its values, unfiltered.
    pub predicates: BTreeMap<String, Vec<String>>,
}
