//! Registry of configured authorities, keyed by name.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::{debug, warn};

use crate::config::AuthorityConfig;
use crate::error::{ConfigError, LodError};

/// Authorities available for dispatch. Names are matched case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct AuthorityRegistry {
    authorities: BTreeMap<String, AuthorityConfig>,
}

impl AuthorityRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every `*.yml` / `*.yaml` file in `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`LodError::Io`] if the directory cannot be read, or the first
    /// parse error among the files.
    pub fn load_dir(dir: &Path) -> Result<Self, LodError> {
        let mut registry = Self::new();
        let mut paths: Vec<_> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| {
                matches!(
                    p.extension().and_then(|e| e.to_str()),
                    Some("yml") | Some("yaml")
                )
            })
            .collect();
        paths.sort();

        for path in paths {
            let config = AuthorityConfig::from_file(&path).map_err(|e| match e {
                LodError::Serialization(msg) => {
                    LodError::Serialization(format!("{}: {msg}", path.display()))
                }
                other => other,
            })?;
            debug!(authority = %config.name, path = %path.display(), "registered authority");
            registry.register(config);
        }
        Ok(registry)
    }

    /// Add or replace an authority.
    pub fn register(&mut self, config: AuthorityConfig) {
        let key = config.name.to_lowercase();
        if self.authorities.contains_key(&key) {
            warn!(authority = %config.name, "replacing previously registered authority");
        }
        self.authorities.insert(key, config);
    }

    /// Look up an authority by name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownAuthority`] if no authority has that name.
    pub fn get(&self, name: &str) -> Result<&AuthorityConfig, ConfigError> {
        self.authorities
            .get(&name.to_lowercase())
            .ok_or_else(|| ConfigError::UnknownAuthority(name.to_string()))
    }

    pub fn authorities(&self) -> impl Iterator<Item = &AuthorityConfig> {
        self.authorities.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.authorities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.authorities.is_empty()
    }
}
