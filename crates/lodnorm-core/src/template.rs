//! IRI templates for outbound authority requests.
//!
//! Substitution is direct string replacement: each mapped variable `v`
//! replaces every `{?v}` in the template with its percent-encoded value.
//! `{v}` placeholders are not recognised, and placeholders with no mapping
//! stay in the output untouched.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// One variable a template accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateVariable {
    pub variable: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl TemplateVariable {
    /// The encoded value to substitute: the supplied value, else the
    /// default, else empty.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingTemplateValue`] for a required variable
    /// with neither a supplied value nor a default.
    pub fn simple_value(&self, supplied: Option<&str>) -> Result<String, ConfigError> {
        let value = supplied
            .filter(|v| !v.is_empty())
            .or(self.default.as_deref());
        match value {
            Some(v) => Ok(urlencoding::encode(v).into_owned()),
            None if self.required => Err(ConfigError::MissingTemplateValue {
                variable: self.variable.clone(),
            }),
            None => Ok(String::new()),
        }
    }
}

/// A URL template plus its variable mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlTemplate {
    pub template: String,
    #[serde(default)]
    pub mapping: Vec<TemplateVariable>,
}

impl UrlTemplate {
    /// Build a URL by substituting each mapped variable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingTemplateValue`] if a required variable
    /// has no value.
    pub fn build_url(&self, substitutions: &BTreeMap<String, String>) -> Result<String, ConfigError> {
        let mut url = self.template.clone();
        for var in &self.mapping {
            let value = var.simple_value(substitutions.get(&var.variable).map(String::as_str))?;
            url = url.replace(&format!("{{?{}}}", var.variable), &value);
        }
        Ok(url)
    }

    /// Whether the template declares `variable` in its mapping.
    #[must_use]
    pub fn declares(&self, variable: &str) -> bool {
        self.mapping.iter().any(|m| m.variable == variable)
    }
}
