//! The source registry: which newsrooms exist and how to read each one.
//!
//! Loaded once at startup from YAML and read-only afterwards. The default
//! registry ships inside the binary; `--registry` points at another file.
//!
//! ```yaml
//! sources:
//!   - id: lawson
//!     name: "ローソン"
//!     category: Convenience stores
//!     url: https://www.lawson.co.jp/company/news/
//!     strategy: generic
//!     badge_color: "#0068B7"
//!     date_format: "%Y.%m.%d"
//! ```

use crate::error::RegistryError;
use crate::models::SourceConfig;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use tracing::{info, instrument};
use url::Url;

const EMBEDDED_REGISTRY: &str = include_str!("../sources.yaml");

#[derive(Debug, Deserialize)]
struct RegistryFile {
    sources: Vec<SourceConfig>,
}

/// Ordered, validated list of sources.
#[derive(Debug, Clone)]
pub struct Registry {
    sources: Vec<SourceConfig>,
}

impl Registry {
    pub fn new(sources: Vec<SourceConfig>) -> Result<Self, RegistryError> {
        let mut seen = HashSet::new();
        for (i, s) in sources.iter().enumerate() {
            if s.id.trim().is_empty() {
                return Err(RegistryError::EmptyId(i));
            }
            if !seen.insert(s.id.as_str()) {
                return Err(RegistryError::DuplicateId(s.id.clone()));
            }
            // fallback records point at this url verbatim, so it must
            // already be in canonical form
            let valid = Url::parse(&s.url)
                .map(|u| {
                    matches!(u.scheme(), "http" | "https")
                        && u.has_host()
                        && u.query().is_none()
                        && u.fragment().is_none()
                })
                .unwrap_or(false);
            if !valid {
                return Err(RegistryError::InvalidUrl {
                    id: s.id.clone(),
                    url: s.url.clone(),
                });
            }
        }
        Ok(Self { sources })
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, RegistryError> {
        let file: RegistryFile = serde_yaml::from_str(yaml)?;
        Self::new(file.sources)
    }

    /// The registry compiled into the binary.
    pub fn embedded() -> Result<Self, RegistryError> {
        Self::from_yaml_str(EMBEDDED_REGISTRY)
    }

    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        let yaml = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| RegistryError::Io {
                path: path.display().to_string(),
                source,
            })?;
        let registry = Self::from_yaml_str(&yaml)?;
        info!(count = registry.len(), "Loaded source registry");
        Ok(registry)
    }

    pub fn get(&self, id: &str) -> Option<&SourceConfig> {
        self.sources.iter().find(|s| s.id == id)
    }

    pub fn ids(&self) -> Vec<String> {
        self.sources.iter().map(|s| s.id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Categories in order of first appearance, each with its sources in
    /// registry order.
    pub fn categories(&self) -> Vec<(&str, Vec<&SourceConfig>)> {
        let mut out: Vec<(&str, Vec<&SourceConfig>)> = Vec::new();
        for s in &self.sources {
            match out.iter_mut().find(|(name, _)| *name == s.category) {
                Some((_, members)) => members.push(s),
                None => out.push((s.category.as_str(), vec![s])),
            }
        }
        out
    }

    pub fn ids_in_category(&self, category: &str) -> Vec<String> {
        self.sources
            .iter()
            .filter(|s| s.category.eq_ignore_ascii_case(category))
            .map(|s| s.id.clone())
            .collect()
    }
}
