//! Configuration validation
//!
//! Checks the configuration before any metric is built, so a bad bucket list
//! fails at startup instead of at the first scrape.

use anyhow::{Result, bail};

use super::types::MetricsConfig;
use crate::export::validate_prefix;
use crate::metrics::BucketBounds;

impl MetricsConfig {
    /// Validate configuration for correctness
    ///
    /// - Both bucket lists are non-empty, finite and strictly increasing
    /// - The name prefix is empty or a valid metric-name fragment
    /// - The endpoint path starts with `/`
    pub fn validate(&self) -> Result<()> {
        BucketBounds::new(self.latency_buckets.clone())
            .map_err(|e| anyhow::anyhow!("latency_buckets: {}", e))?;
        BucketBounds::new(self.size_buckets.clone())
            .map_err(|e| anyhow::anyhow!("size_buckets: {}", e))?;

        validate_prefix(&self.name_prefix)?;

        if !self.server.path.starts_with('/') {
            bail!(
                "server.path must start with '/', got '{}'",
                self.server.path
            );
        }

        if self.server.port == 0 {
            tracing::warn!("server.port is 0; the endpoint will bind an ephemeral port");
        }

        Ok(())
    }
}
