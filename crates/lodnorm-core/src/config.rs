//! Authority configuration (YAML) and engine settings (TOML).
//!
//! An authority file describes how to reach one vocabulary source and how
//! to map its graphs onto results:
//!
//! ```yaml
//! name: OCLC_FAST
//! language: en
//! prefixes:
//!   skos: "http://www.w3.org/2004/02/skos/core#"
//! search:
//!   url:
//!     template: "http://example.org/search?q={?query}"
//!     mapping:
//!       - { variable: query, required: true }
//!   results:
//!     required: { label: "skos:prefLabel" }
//! term:
//!   url:
//!     template: "http://example.org/term/{?term_id}"
//!     mapping:
//!       - { variable: term_id, required: true }
//!   subject_prefix: "http://example.org/term/"
//!   results:
//!     required: { label: "skos:prefLabel" }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{ConfigError, LodError};
use crate::field_map::FieldMap;
use crate::template::UrlTemplate;

/// Template variable filled with the search query.
pub const QUERY_VARIABLE: &str = "query";
/// Template variable filled with the mapped sub-authority value.
pub const SUBAUTH_VARIABLE: &str = "subauth";
/// Template variable filled with the requested language.
pub const LANG_VARIABLE: &str = "lang";
/// Template variable filled with the term identifier.
pub const TERM_ID_VARIABLE: &str = "term_id";

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

/// Accepts `language: en` as well as `language: [en, fr]`.
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<OneOrMany> = Option::deserialize(deserializer)?;
    let langs = match value {
        None => Vec::new(),
        Some(OneOrMany::One(lang)) => vec![lang],
        Some(OneOrMany::Many(langs)) => langs,
    };
    Ok(langs
        .into_iter()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect())
}

/// The search section of an authority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchSection {
    pub url: UrlTemplate,
    #[serde(default, deserialize_with = "one_or_many", skip_serializing_if = "Vec::is_empty")]
    pub language: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub subauthorities: BTreeMap<String, String>,
    pub results: FieldMap,
}

impl SearchSection {
    /// Build the outbound search URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownSubauthority`] for an unconfigured
    /// sub-authority, or a template error for a missing required variable.
    pub fn url_for(
        &self,
        authority: &str,
        query: &str,
        subauthority: Option<&str>,
        language: Option<&str>,
        replacements: &BTreeMap<String, String>,
    ) -> Result<String, ConfigError> {
        let mut subs = replacements.clone();
        subs.insert(QUERY_VARIABLE.to_string(), query.to_string());
        fill_common(&mut subs, &self.subauthorities, authority, subauthority, language)?;
        self.url.build_url(&subs)
    }
}

/// The term (single record lookup) section of an authority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermSection {
    pub url: UrlTemplate,
    #[serde(default, deserialize_with = "one_or_many", skip_serializing_if = "Vec::is_empty")]
    pub language: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub subauthorities: BTreeMap<String, String>,
    /// Prepended to a bare identifier to form the subject IRI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_prefix: Option<String>,
    pub results: FieldMap,
}

impl TermSection {
    /// Build the outbound term URL.
    ///
    /// # Errors
    ///
    /// Same conditions as [`SearchSection::url_for`].
    pub fn url_for(
        &self,
        authority: &str,
        id: &str,
        subauthority: Option<&str>,
        language: Option<&str>,
        replacements: &BTreeMap<String, String>,
    ) -> Result<String, ConfigError> {
        let mut subs = replacements.clone();
        subs.insert(TERM_ID_VARIABLE.to_string(), id.to_string());
        fill_common(&mut subs, &self.subauthorities, authority, subauthority, language)?;
        self.url.build_url(&subs)
    }

    /// The subject IRI a term id refers to in the returned graph.
    #[must_use]
    pub fn subject_for(&self, id: &str) -> String {
        if is_absolute_iri(id) {
            return id.to_string();
        }
        match &self.subject_prefix {
            Some(prefix) => format!("{prefix}{id}"),
            None => id.to_string(),
        }
    }
}

fn fill_common(
    subs: &mut BTreeMap<String, String>,
    subauthorities: &BTreeMap<String, String>,
    authority: &str,
    subauthority: Option<&str>,
    language: Option<&str>,
) -> Result<(), ConfigError> {
    if let Some(name) = subauthority {
        let value = subauthorities
            .get(name)
            .ok_or_else(|| ConfigError::UnknownSubauthority {
                authority: authority.to_string(),
                subauthority: name.to_string(),
            })?;
        subs.insert(SUBAUTH_VARIABLE.to_string(), value.clone());
    }
    if let Some(lang) = language {
        subs.insert(LANG_VARIABLE.to_string(), lang.to_string());
    }
    Ok(())
}

fn is_absolute_iri(s: &str) -> bool {
    s.contains("://") || s.starts_with("urn:") || s.starts_with("info:")
}

/// Configuration for one linked data authority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorityConfig {
    pub name: String,
    #[serde(default, deserialize_with = "one_or_many", skip_serializing_if = "Vec::is_empty")]
    pub language: Vec<String>,
    /// Prefixes usable in predicate paths, e.g. `skos:prefLabel`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub prefixes: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<SearchSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term: Option<TermSection>,
}

impl AuthorityConfig {
    /// Parse an authority from YAML.
    ///
    /// # Errors
    ///
    /// Returns [`LodError::Serialization`] if the YAML is malformed.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, LodError> {
        serde_yaml::from_str(yaml).map_err(|e| LodError::Serialization(e.to_string()))
    }

    /// Load an authority from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`LodError::Io`] if the file cannot be read, or
    /// [`LodError::Serialization`] if it is malformed.
    pub fn from_file(path: &Path) -> Result<Self, LodError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::MissingSection`] if the authority has no search section.
    pub fn search_section(&self) -> Result<&SearchSection, ConfigError> {
        self.search.as_ref().ok_or_else(|| ConfigError::MissingSection {
            authority: self.name.clone(),
            section: "search".to_string(),
        })
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::MissingSection`] if the authority has no term section.
    pub fn term_section(&self) -> Result<&TermSection, ConfigError> {
        self.term.as_ref().ok_or_else(|| ConfigError::MissingSection {
            authority: self.name.clone(),
            section: "term".to_string(),
        })
    }

    /// Languages configured for searches: the section's own, else the authority's.
    #[must_use]
    pub fn search_languages(&self) -> &[String] {
        match &self.search {
            Some(s) if !s.language.is_empty() => &s.language,
            _ => &self.language,
        }
    }

    /// Languages configured for term lookups: the section's own, else the authority's.
    #[must_use]
    pub fn term_languages(&self) -> &[String] {
        match &self.term {
            Some(t) if !t.language.is_empty() => &t.language,
            _ => &self.language,
        }
    }
}

/// Engine-wide settings. Passed into each engine explicitly; there is no
/// global copy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Lowest-precedence language tier, used when neither the call nor the
    /// authority names a language.
    #[serde(default, deserialize_with = "one_or_many")]
    pub default_language: Vec<String>,
}

impl EngineSettings {
    /// Parse settings from TOML.
    ///
    /// # Errors
    ///
    /// Returns [`LodError::Serialization`] if the TOML is malformed.
    pub fn from_toml_str(content: &str) -> Result<Self, LodError> {
        toml::from_str(content).map_err(|e| LodError::Serialization(e.to_string()))
    }

    /// Load settings from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`LodError::Io`] or [`LodError::Serialization`].
    pub fn from_file(path: &Path) -> Result<Self, LodError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Settings with the given default languages.
    pub fn with_default_language<I, S>(langs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            default_language: langs.into_iter().map(Into::into).collect(),
        }
    }
}
