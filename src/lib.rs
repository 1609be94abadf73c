//! Metrics aggregation and exposition for KCP sessions
//!
//! Protocol sessions update a shared [`KcpMetrics`] handle on their hot path:
//! SNMP-style counters, the active-session gauge, and bucketed samples for
//! update-loop latency and queue/buffer depths. A monitoring backend pulls from
//! a [`MetricsRegistry`], which asks each registered [`Exporter`] for a fresh
//! snapshot and renders it in the Prometheus text format.
//!
//! ```no_run
//! use kcp_metrics::{MetricsConfig, MetricsRegistry, SnmpField};
//!
//! # fn main() -> kcp_metrics::Result<()> {
//! let registry = MetricsRegistry::new();
//! let metrics = kcp_metrics::install(&registry, &MetricsConfig::default())?;
//!
//! metrics.incr(SnmpField::InPkts);
//! metrics.set_active_sessions(1);
//!
//! let body = registry.encode_text()?;
//! # let _ = body;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod export;
pub mod logging;
pub mod metrics;
pub mod runtime;
pub mod server;

pub use config::{MetricsConfig, ServerConfig, load_config};
pub use error::{MetricsError, Result};
pub use export::{Exporter, MetricDescriptor, MetricKind, MetricSample, MetricsRegistry, SampleValue};
pub use metrics::{
    BucketBounds, BucketScheme, GaugeField, HistogramField, HistogramSnapshot, KcpMetrics,
    MetricsSnapshot, SnmpField, SnmpSnapshot,
};

/// Build the metrics handle described by `config` and register its exporter
///
/// Startup code calls this once per registry and hands the returned handle to the
/// protocol engine.
///
/// # Errors
/// Fails on invalid buckets or prefix, or if the metric names are already
/// registered in `registry`.
pub fn install(registry: &MetricsRegistry, config: &MetricsConfig) -> Result<KcpMetrics> {
    let metrics = config.build_metrics()?;
    let exporter = config.build_exporter(metrics.clone())?;
    registry.register(&exporter)?;
    Ok(metrics)
}
