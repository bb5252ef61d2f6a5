//! Configuration loading from storage.
//!
//! # States
//! ```text
//! read "config.yml" ──absent──────────→ NotFound ─┐
//!        │ ──storage failure──────────→ Storage  ─┤
//!        ▼                                        │
//! parse YAML ──error──────────────────→ Parse    ─┤
//!        ▼                                        ├→ report, return defaults + error
//! validate ──error────────────────────→ Schema   ─┤
//!        ▼                                        │
//! normalize → merge ──error───────────→ Merge    ─┘
//!        ▼
//! CompleteConfig (no error)
//! ```
//!
//! The loader never fails: every outcome is a usable [`CompleteConfig`].

use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;

use crate::config::merge::merge_with_defaults;
use crate::config::normalize::normalize_document;
use crate::config::schema::CompleteConfig;
use crate::config::validation::{validate_config_schema, SchemaError};
use crate::observability::metrics;
use crate::observability::reporter::{ErrorReporter, TracingReporter};
use crate::storage::{Storage, StorageError};

/// Key of the raw document in the config namespace.
pub const CONFIG_FILE_NAME: &str = "config.yml";

/// Key of the persisted configuration in the snapshot namespace.
pub const SNAPSHOT_KEY: &str = "config";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Config file \"{0}\" not found")]
    NotFound(String),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("{0}")]
    Parse(#[from] serde_yaml::Error),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("Failed to apply defaults: {0}")]
    Merge(#[source] serde_json::Error),
}

impl LoadError {
    /// Short label used in logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            LoadError::NotFound(_) => "not_found",
            LoadError::Storage(_) => "storage",
            LoadError::Parse(_) => "parse",
            LoadError::Schema(_) => "schema",
            LoadError::Merge(_) => "merge",
        }
    }

    /// Message placed in the degraded result's `error` field.
    pub fn describe(&self) -> String {
        match self {
            LoadError::Schema(e) => e.report(),
            other => other.to_string(),
        }
    }
}

/// Parse raw YAML into a generic value.
pub fn parse_document(text: &str) -> Result<Value, serde_yaml::Error> {
    serde_yaml::from_str(text)
}

/// Run validation, normalization and the defaults merge over a parsed document.
pub fn build_config(raw: &Value, defaults: &CompleteConfig) -> Result<CompleteConfig, LoadError> {
    let document = validate_config_schema(raw)?;
    let normalized = normalize_document(document);
    merge_with_defaults(&normalized, defaults).map_err(LoadError::Merge)
}

/// Loads the dashboard configuration from storage.
pub struct ConfigLoader {
    files: Arc<dyn Storage>,
    snapshots: Arc<dyn Storage>,
    reporter: Arc<dyn ErrorReporter>,
    defaults: CompleteConfig,
}

impl ConfigLoader {
    /// Create a loader reading the document from `files` and persisted
    /// snapshots from `snapshots`. Failures are reported through `tracing`.
    pub fn new(files: Arc<dyn Storage>, snapshots: Arc<dyn Storage>) -> Self {
        Self {
            files,
            snapshots,
            reporter: Arc::new(TracingReporter),
            defaults: CompleteConfig::default(),
        }
    }

    /// Replace the error reporter.
    pub fn with_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// The defaults every load is merged over.
    pub fn defaults(&self) -> &CompleteConfig {
        &self.defaults
    }

    /// Load, validate and normalize the configuration.
    ///
    /// On any failure the error is reported and the default configuration is
    /// returned with `error` set.
    pub async fn load_local_config(&self) -> CompleteConfig {
        let start = Instant::now();
        match self.try_load().await {
            Ok(config) => {
                let services = config.service_count();
                tracing::info!(
                    groups = config.services.len(),
                    services,
                    "Configuration loaded"
                );
                metrics::record_load("ok", start);
                metrics::record_service_count(services);
                config
            }
            Err(e) => {
                metrics::record_load(e.kind(), start);
                self.reporter.report(&e);
                CompleteConfig::with_error(e.describe())
            }
        }
    }

    /// Load without the degraded-result fallback.
    pub async fn try_load(&self) -> Result<CompleteConfig, LoadError> {
        let text = self.read_document().await?;
        let raw = parse_document(&text)?;
        build_config(&raw, &self.defaults)
    }

    /// Validate the document and summarize it, for `homedash check`.
    ///
    /// Unlike [`load_local_config`](Self::load_local_config), failures are
    /// returned rather than reported.
    pub async fn check(&self) -> Result<String, LoadError> {
        let config = self.try_load().await?;
        Ok(format!(
            "Configuration is valid: {} group(s), {} service(s)",
            config.services.len(),
            config.service_count()
        ))
    }

    async fn read_document(&self) -> Result<String, LoadError> {
        if !self.files.has_item(CONFIG_FILE_NAME).await? {
            return Err(LoadError::NotFound(CONFIG_FILE_NAME.to_string()));
        }
        // The item can vanish between the two calls.
        self.files
            .get_item(CONFIG_FILE_NAME)
            .await?
            .ok_or_else(|| LoadError::NotFound(CONFIG_FILE_NAME.to_string()))
    }

    /// Fetch the previously persisted configuration, without validation.
    pub async fn get_local_config(&self) -> Option<CompleteConfig> {
        let keys = match self.snapshots.get_keys().await {
            Ok(keys) => keys,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to list configuration snapshots");
                return None;
            }
        };
        if !keys.iter().any(|key| key == SNAPSHOT_KEY) {
            return None;
        }

        let text = match self.snapshots.get_item(SNAPSHOT_KEY).await {
            Ok(Some(text)) => text,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read configuration snapshot");
                return None;
            }
        };

        match serde_json::from_str(&text) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring undecodable configuration snapshot");
                None
            }
        }
    }
}
