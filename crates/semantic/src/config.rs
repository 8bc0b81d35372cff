// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Semantic Analysis Configuration
//!
//! Settings that decide how a context chain is rooted and how ambiguous
//! names are treated.
//!
//! ## Configuration Structure
//!
//! Client settings carry the semantic section under the LSP namespace:
//!
//! ```json
//! {
//!   "unifiedSqlLsp": {
//!     "semantic": {
//!       "dialect": "postgresql",
//!       "resolutionPolicy": "strict",
//!       "useRealMetadata": true,
//!       "placeholderCatalog": "dummyCatalog",
//!       "placeholderSchema": "dummySchema"
//!     }
//!   }
//! }
//! ```
//!
//! Every field is optional.
//!
//! ## Example
//!
//! ```rust
//! use unified_sql_lsp_semantic::{ResolutionPolicy, SemanticConfig};
//!
//! let settings = serde_json::json!({
//!     "unifiedSqlLsp": { "semantic": { "resolutionPolicy": "strict" } }
//! });
//! let config = SemanticConfig::from_lsp_settings(&settings).unwrap();
//! assert_eq!(config.resolution_policy, ResolutionPolicy::Strict);
//! assert!(config.use_real_metadata);
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use unified_sql_lsp_catalog::MetadataProvider;
use unified_sql_lsp_catalog::synthetic::{DEFAULT_CATALOG_NAME, DEFAULT_SCHEMA_NAME};
use unified_sql_lsp_ir::Dialect;

use crate::context::DataContext;
use crate::datasource::DataSourceContext;
use crate::dummy::DummyDataSourceContext;

/// How a lookup that matches more than one candidate is answered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResolutionPolicy {
    /// Take the first candidate: leftmost side of a join, earliest column
    #[default]
    FirstMatch,
    /// Report the ambiguity as an error
    Strict,
}

/// Semantic analysis configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SemanticConfig {
    /// Dialect used for identifier rules when no provider supplies one
    pub dialect: Dialect,

    pub resolution_policy: ResolutionPolicy,

    /// Root chains at the metadata provider when one is available
    pub use_real_metadata: bool,

    /// Catalog name given to synthetic tables when the text never names one
    pub placeholder_catalog: String,

    /// Schema name given to synthetic tables when the text never names one
    pub placeholder_schema: String,
}

impl Default for SemanticConfig {
    fn default() -> Self {
        Self {
            dialect: Dialect::default(),
            resolution_policy: ResolutionPolicy::default(),
            use_real_metadata: true,
            placeholder_catalog: DEFAULT_CATALOG_NAME.to_string(),
            placeholder_schema: DEFAULT_SCHEMA_NAME.to_string(),
        }
    }
}

impl SemanticConfig {
    /// Parse the semantic section of an LSP client settings payload
    ///
    /// A payload without the section yields the defaults.
    pub fn from_lsp_settings(settings: &Value) -> Result<Self, ConfigError> {
        let Some(section) = settings
            .get("unifiedSqlLsp")
            .and_then(|lsp| lsp.get("semantic"))
        else {
            debug!("no semantic settings, using defaults");
            return Ok(Self::default());
        };

        let config: Self = serde_json::from_value(section.clone())
            .map_err(|e| ConfigError::InvalidSettings(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    ///
    /// Placeholder names must be non-empty and must not contain dots, since
    /// synthetic qualified names are dot-joined.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("placeholderCatalog", &self.placeholder_catalog),
            ("placeholderSchema", &self.placeholder_schema),
        ] {
            if value.is_empty() {
                return Err(ConfigError::InvalidPlaceholder {
                    field,
                    reason: "must not be empty".to_string(),
                });
            }
            if value.contains('.') {
                return Err(ConfigError::InvalidPlaceholder {
                    field,
                    reason: "must not contain '.'".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Root context for one analysis pass
    ///
    /// Uses the provider when one is given and real metadata is enabled,
    /// otherwise a synthetic root seeded with the referenced names.
    pub fn prepare_root<C, T, P>(
        &self,
        provider: Option<Arc<dyn MetadataProvider>>,
        referenced_columns: C,
        referenced_tables: T,
    ) -> DataContext
    where
        C: IntoIterator<Item = String>,
        T: IntoIterator<Item = P>,
        P: AsRef<[String]>,
    {
        match provider {
            Some(provider) if self.use_real_metadata => DataSourceContext::new(provider)
                .with_policy(self.resolution_policy)
                .into_context(),
            _ => DummyDataSourceContext::with_placeholders(
                self.dialect,
                referenced_columns,
                referenced_tables,
                &self.placeholder_catalog,
                &self.placeholder_schema,
            )
            .with_policy(self.resolution_policy)
            .into_context(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Settings payload does not match the expected shape
    #[error("Invalid semantic settings: {0}")]
    InvalidSettings(String),

    /// Placeholder name cannot be used
    #[error("Invalid {field}: {reason}")]
    InvalidPlaceholder { field: &'static str, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_section_uses_defaults() {
        let config = SemanticConfig::from_lsp_settings(&json!({ "unifiedSqlLsp": {} })).unwrap();
        assert_eq!(config, SemanticConfig::default());
        assert_eq!(config.resolution_policy, ResolutionPolicy::FirstMatch);
    }

    #[test]
    fn test_parse_full_section() {
        let settings = json!({
            "unifiedSqlLsp": {
                "semantic": {
                    "dialect": "mysql",
                    "resolutionPolicy": "strict",
                    "useRealMetadata": false,
                    "placeholderCatalog": "cat",
                    "placeholderSchema": "sch"
                }
            }
        });
        let config = SemanticConfig::from_lsp_settings(&settings).unwrap();
        assert_eq!(config.dialect, Dialect::MySQL);
        assert_eq!(config.resolution_policy, ResolutionPolicy::Strict);
        assert!(!config.use_real_metadata);
        assert_eq!(config.placeholder_catalog, "cat");
    }

    #[test]
    fn test_unknown_policy_rejected() {
        let settings = json!({ "unifiedSqlLsp": { "semantic": { "resolutionPolicy": "random" } } });
        let err = SemanticConfig::from_lsp_settings(&settings).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSettings(_)));
    }

    #[test]
    fn test_dotted_placeholder_rejected() {
        let settings = json!({ "unifiedSqlLsp": { "semantic": { "placeholderSchema": "a.b" } } });
        let err = SemanticConfig::from_lsp_settings(&settings).unwrap_err();
        assert!(err.to_string().contains("placeholderSchema"));
    }

    #[test]
    fn test_prepare_root_without_provider_is_synthetic() {
        let config = SemanticConfig {
            placeholder_schema: "scratch".to_string(),
            ..Default::default()
        };
        let root = config.prepare_root(None, vec!["id".to_string()], vec![vec!["t".to_string()]]);
        assert!(root.is_synthetic());
        assert_eq!(root.as_dummy().unwrap().default_schema_name(), "scratch");
    }

    #[test]
    fn test_policy_serializes_camel_case() {
        assert_eq!(serde_json::to_string(&ResolutionPolicy::FirstMatch).unwrap(), "\"firstMatch\"");
    }
}
