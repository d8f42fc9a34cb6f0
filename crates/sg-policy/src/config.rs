// config.rs — Policy files.
//
// A policy file is an ordered list of filters. File order becomes
// registration order, so the first entry has the highest precedence.
//
//   [[filters]]
//   name = "block-acme-cars"
//   action = "deny"
//   match = "exact"
//   types = ["com.acme.Car"]
//   otherwise = "allow"     # optional: decision for non-matching types
//
// The same shape is accepted as YAML. A missing file means "no policy",
// which the access gate treats as filtering disabled.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sg_types::HierarchyResolver;

use crate::builtin::{PatternFilter, SubtypeFilter, TypeListFilter};
use crate::error::PolicyError;
use crate::filter::{FilterAction, FilterDecision, FilterRef};
use crate::registry::FilterRegistry;

/// How a filter entry matches type names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// Exact type name identity.
    #[default]
    Exact,
    /// Glob patterns over the type name.
    Glob,
    /// The listed types and all of their descendants.
    Subtypes,
}

/// One filter entry in a policy file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub name: String,
    pub action: FilterAction,
    #[serde(rename = "match", default)]
    pub match_kind: MatchKind,
    pub types: Vec<String>,
    /// What the filter says about types it doesn't match.
    #[serde(default)]
    pub otherwise: FilterDecision,
}

impl FilterSpec {
    /// Build the filter this entry describes.
    pub fn build(&self, resolver: &Arc<dyn HierarchyResolver>) -> Result<FilterRef, PolicyError> {
        if self.types.is_empty() {
            return Err(PolicyError::EmptyFilter {
                name: self.name.clone(),
            });
        }
        let filter: FilterRef = match self.match_kind {
            MatchKind::Exact => Arc::new(
                TypeListFilter::new(
                    self.name.as_str(),
                    self.action,
                    self.types.iter().map(String::as_str),
                )
                .otherwise(self.otherwise),
            ),
            MatchKind::Glob => Arc::new(
                PatternFilter::new(self.name.as_str(), self.action, &self.types)?
                    .otherwise(self.otherwise),
            ),
            MatchKind::Subtypes => Arc::new(
                SubtypeFilter::new(
                    self.name.as_str(),
                    self.action,
                    self.types.iter().map(String::as_str),
                    Arc::clone(resolver),
                )
                .otherwise(self.otherwise),
            ),
        };
        Ok(filter)
    }
}

/// An ordered set of filter entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyConfig {
    #[serde(default)]
    pub filters: Vec<FilterSpec>,
}

impl PolicyConfig {
    /// Parse a TOML policy document.
    pub fn parse_toml(content: &str) -> Result<Self, PolicyError> {
        toml::from_str(content).map_err(|e| PolicyError::Parse {
            path: "<inline>".to_string(),
            reason: e.to_string(),
        })
    }

    /// Parse a YAML policy document.
    pub fn parse_yaml(content: &str) -> Result<Self, PolicyError> {
        serde_yaml::from_str(content).map_err(|e| PolicyError::Parse {
            path: "<inline>".to_string(),
            reason: e.to_string(),
        })
    }

    /// Load a policy from a `.toml`, `.yaml` or `.yml` file.
    pub fn from_file(path: &Path) -> Result<Self, PolicyError> {
        let display = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|source| PolicyError::Io {
            path: display.clone(),
            source,
        })?;
        let parsed = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::parse_toml(&content),
            Some("yaml") | Some("yml") => Self::parse_yaml(&content),
            _ => return Err(PolicyError::UnsupportedFormat { path: display }),
        };
        // Re-attach the real path to parse errors.
        parsed.map_err(|e| match e {
            PolicyError::Parse { reason, .. } => PolicyError::Parse {
                path: display,
                reason,
            },
            other => other,
        })
    }

    /// Load from file if it exists, otherwise an empty policy.
    ///
    /// A file that exists but is malformed is still an error.
    pub fn load_or_default(path: &Path) -> Result<Self, PolicyError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            tracing::debug!(path = %path.display(), "no policy file, filtering disabled");
            Ok(Self::default())
        }
    }

    /// Build every filter, in file order.
    pub fn build_filters(
        &self,
        resolver: Arc<dyn HierarchyResolver>,
    ) -> Result<Vec<FilterRef>, PolicyError> {
        self.filters
            .iter()
            .map(|spec| spec.build(&resolver))
            .collect()
    }

    /// Build a registry holding every filter, in file order.
    pub fn build_registry(
        &self,
        resolver: Arc<dyn HierarchyResolver>,
    ) -> Result<FilterRegistry, PolicyError> {
        let filters = self.build_filters(resolver)?;
        tracing::info!(filters = filters.len(), "built filter registry from policy");
        Ok(FilterRegistry::with_filters(filters))
    }
}
