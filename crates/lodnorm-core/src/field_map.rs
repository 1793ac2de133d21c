//! FieldMap: binds logical result fields to graph predicates.
//!
//! Each predicate is a path expression (see `lodnorm-parser`); it is kept
//! here as the raw configured string and compiled per call, so a malformed
//! path only degrades its own field.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// A logical field of a result record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Label,
    AltLabel,
    Id,
    Sort,
    Selector,
    SameAs,
    Context(String),
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Label => f.write_str("label"),
            Field::AltLabel => f.write_str("altlabel"),
            Field::Id => f.write_str("id"),
            Field::Sort => f.write_str("sort"),
            Field::Selector => f.write_str("selector"),
            Field::SameAs => f.write_str("sameas"),
            Field::Context(name) => write!(f, "context.{name}"),
        }
    }
}

/// Fields that must be configured for a query to be valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Fields that may be configured.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionalFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub altlabel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    /// When present, only subjects carrying this predicate are results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
    /// Term lookups only: equivalent-resource predicate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sameas: Option<String>,
}

/// Configuration mapping logical field names to predicate paths.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMap {
    #[serde(default)]
    pub required: RequiredFields,
    #[serde(default)]
    pub optional: OptionalFields,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub context: BTreeMap<String, String>,
}

impl FieldMap {
    /// A map with only the label predicate set.
    pub fn with_label(label: impl Into<String>) -> Self {
        Self {
            required: RequiredFields {
                label: Some(label.into()),
            },
            ..Self::default()
        }
    }

    /// Check the map is usable before any graph data is touched.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingLabelPredicate`] if no label predicate is configured.
    pub fn validate(&self, section: &str) -> Result<(), ConfigError> {
        match self.required.label.as_deref() {
            Some(label) if !label.trim().is_empty() => Ok(()),
            _ => Err(ConfigError::MissingLabelPredicate {
                section: section.to_string(),
            }),
        }
    }

    #[must_use]
    pub fn has_sort(&self) -> bool {
        self.optional.sort.is_some()
    }

    #[must_use]
    pub fn has_selector(&self) -> bool {
        self.optional.selector.is_some()
    }

    #[must_use]
    pub fn has_context(&self) -> bool {
        !self.context.is_empty()
    }

    /// Every configured field with its predicate, in extraction order:
    /// label, altlabel, id, sort, selector, sameas, then context by name.
    #[must_use]
    pub fn fields(&self) -> Vec<(Field, &str)> {
        let fixed = [
            (Field::Label, &self.required.label),
            (Field::AltLabel, &self.optional.altlabel),
            (Field::Id, &self.optional.id),
            (Field::Sort, &self.optional.sort),
            (Field::Selector, &self.optional.selector),
            (Field::SameAs, &self.optional.sameas),
        ];
        let mut fields: Vec<(Field, &str)> = fixed
            .into_iter()
            .filter_map(|(field, pred)| pred.as_deref().map(|p| (field, p)))
            .collect();
        fields.extend(
            self.context
                .iter()
                .map(|(name, pred)| (Field::Context(name.clone()), pred.as_str())),
        );
        fields
    }

    /// The reduced map used to summarize a referenced entity: label,
    /// altlabel, and id only. No sort, selector, or context.
    #[must_use]
    pub fn summary(&self) -> Self {
        Self {
            required: self.required.clone(),
            optional: OptionalFields {
                altlabel: self.optional.altlabel.clone(),
                id: self.optional.id.clone(),
                ..OptionalFields::default()
            },
            context: BTreeMap::new(),
        }
    }
}
