//! Configuration type definitions

use crate::error::Result;
use crate::export::Exporter;
use crate::metrics::{BucketBounds, BucketScheme, KcpMetrics};
use serde::{Deserialize, Serialize};

/// Exporter configuration
///
/// Every field has a default, so an empty TOML document is a valid config.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MetricsConfig {
    /// Joined to every metric name with `_`; empty means no prefix
    pub name_prefix: String,
    /// Upper bounds for the latency scheme (`kcp_update_time`)
    pub latency_buckets: Vec<f64>,
    /// Upper bounds for the size scheme (queue and buffer lengths)
    pub size_buckets: Vec<f64>,
    /// Pull endpoint settings
    pub server: ServerConfig,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            name_prefix: String::new(),
            latency_buckets: super::defaults::latency_buckets(),
            size_buckets: super::defaults::size_buckets(),
            server: ServerConfig::default(),
        }
    }
}

impl MetricsConfig {
    /// Validated bounds for one bucket scheme
    ///
    /// # Errors
    /// Returns an error if the configured list is empty, unsorted or non-finite.
    pub fn bounds(&self, scheme: BucketScheme) -> Result<BucketBounds> {
        let bounds = match scheme {
            BucketScheme::Latency => &self.latency_buckets,
            BucketScheme::Size => &self.size_buckets,
        };
        BucketBounds::new(bounds.clone())
    }

    /// Build the producer handle with the configured buckets
    ///
    /// # Errors
    /// Propagates bucket validation errors.
    pub fn build_metrics(&self) -> Result<KcpMetrics> {
        Ok(KcpMetrics::with_buckets(
            self.bounds(BucketScheme::Latency)?,
            self.bounds(BucketScheme::Size)?,
        ))
    }

    /// Build an exporter over `metrics` with the configured prefix
    ///
    /// # Errors
    /// Returns an error if the prefix is not a valid metric-name fragment.
    pub fn build_exporter(&self, metrics: KcpMetrics) -> Result<Exporter> {
        Exporter::new(metrics, &self.name_prefix)
    }
}

/// Pull endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// Host/IP to bind to (default: 0.0.0.0)
    pub host: String,
    /// Port to listen on (default: 9100)
    pub port: u16,
    /// HTTP path serving the exposition (default: /metrics)
    pub path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: super::defaults::server_host(),
            port: super::defaults::server_port(),
            path: super::defaults::server_path(),
        }
    }
}

impl ServerConfig {
    /// Formatted listen address (e.g., "0.0.0.0:9100")
    #[must_use]
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
