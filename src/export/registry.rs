//! Process-wide collection point for registered exporters
//!
//! Passed around explicitly rather than living in a global, so tests can build a
//! fresh registry each time. Exporters are registered once at startup and never
//! removed.

use super::Exporter;
use crate::error::{MetricsError, Result};
use prometheus::proto::MetricFamily;
use prometheus::{Encoder, Registry, TextEncoder};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::info;

/// Registry backing the pull endpoint
///
/// Clones share the same underlying table.
#[derive(Clone)]
pub struct MetricsRegistry {
    registry: Registry,
    registered: Arc<AtomicUsize>,
}

impl MetricsRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
            registered: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Register an exporter for every future scrape
    ///
    /// Call exactly once per exporter. There is no way to unregister.
    ///
    /// # Errors
    /// Fails when any of the exporter's metric names is already registered.
    pub fn register(&self, exporter: &Exporter) -> Result<()> {
        self.registry
            .register(Box::new(exporter.clone()))
            .map_err(MetricsError::Registration)?;
        let total = self.registered.fetch_add(1, Ordering::Relaxed) + 1;
        info!(
            metrics = exporter.describe().len(),
            exporters = total,
            "registered kcp metrics exporter"
        );
        Ok(())
    }

    /// Number of exporters registered so far
    #[must_use]
    pub fn len(&self) -> usize {
        self.registered.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Collect from every registered exporter, families sorted by name
    #[must_use]
    pub fn gather(&self) -> Vec<MetricFamily> {
        self.registry.gather()
    }

    /// Render one scrape in the Prometheus text exposition format
    ///
    /// # Errors
    /// Only fails if the encoder rejects a family, which the exporter never
    /// produces.
    pub fn encode_text(&self) -> Result<String> {
        let families = self.gather();
        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&families, &mut buffer)
            .map_err(MetricsError::Encode)?;
        Ok(String::from_utf8(buffer)?)
    }

    /// Content type of [`Self::encode_text`] output
    #[must_use]
    pub fn content_type(&self) -> String {
        TextEncoder::new().format_type().to_string()
    }
}

impl fmt::Debug for MetricsRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetricsRegistry")
            .field("exporters", &self.len())
            .finish()
    }
}

impl Default for MetricsRegistry {
    fn default() -> Self {
        Self::new()
    }
}
