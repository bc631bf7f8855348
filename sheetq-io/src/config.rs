//! Service configuration

use crate::fetch::FetchOptions;
use serde::Deserialize;
use sheetq_format::{MetadataMode, Result, SheetError};
use std::time::Duration;

/// Default container holding sheet documents
pub const DEFAULT_BUCKET: &str = "helix-content-bus";

/// Default content bus partition
pub const DEFAULT_PARTITION: &str = "live";

/// Pipeline configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceConfig {
    /// Container passed to the fetcher
    pub bucket: String,
    /// Partition used when a request names none
    pub default_partition: String,
    /// Fetch timeout in milliseconds; absent waits indefinitely
    pub fetch_timeout_ms: Option<u64>,
    /// Where response metadata is reported
    pub metadata: MetadataMode,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bucket: DEFAULT_BUCKET.to_string(),
            default_partition: DEFAULT_PARTITION.to_string(),
            fetch_timeout_ms: None,
            metadata: MetadataMode::default(),
        }
    }
}

impl ServiceConfig {
    /// Check the configuration for values the pipeline cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.bucket.trim().is_empty() {
            return Err(SheetError::Config("bucket must not be empty".to_string()));
        }
        if self.default_partition.trim().is_empty() {
            return Err(SheetError::Config(
                "default_partition must not be empty".to_string(),
            ));
        }
        if self.fetch_timeout_ms == Some(0) {
            return Err(SheetError::Config(
                "fetch_timeout_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Fetch options derived from this configuration
    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            timeout: self.fetch_timeout_ms.map(Duration::from_millis),
        }
    }
}
