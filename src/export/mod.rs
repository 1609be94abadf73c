//! Translation of KCP metric state into the consumer's pull model
//!
//! [`Exporter`] owns the fixed schema. [`Exporter::describe`] returns it without
//! touching any values, [`Exporter::collect`] reads a fresh snapshot and turns it
//! into one [`MetricSample`] per described metric, in the same order.

mod exposition;
mod registry;

pub use registry::MetricsRegistry;

use crate::error::{MetricsError, Result};
use crate::metrics::{
    BucketBounds, GaugeField, HistogramField, HistogramSnapshot, KcpMetrics, SnmpField,
};
use ::prometheus::core::Desc;
use std::fmt;
use std::sync::Arc;

/// Kind of an exported metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    Counter,
    Gauge,
    Histogram,
}

impl MetricKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Counter => "counter",
            Self::Gauge => "gauge",
            Self::Histogram => "histogram",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which internal field a descriptor is backed by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Source {
    Counter(SnmpField),
    Gauge(GaugeField),
    Histogram(HistogramField),
}

impl Source {
    fn all() -> impl Iterator<Item = Source> {
        SnmpField::ALL
            .into_iter()
            .map(Source::Counter)
            .chain(GaugeField::ALL.into_iter().map(Source::Gauge))
            .chain(HistogramField::ALL.into_iter().map(Source::Histogram))
    }

    fn kind(self) -> MetricKind {
        match self {
            Self::Counter(_) => MetricKind::Counter,
            Self::Gauge(_) => MetricKind::Gauge,
            Self::Histogram(_) => MetricKind::Histogram,
        }
    }

    fn base_name(self) -> &'static str {
        match self {
            Self::Counter(f) => f.metric_name(),
            Self::Gauge(f) => f.metric_name(),
            Self::Histogram(f) => f.metric_name(),
        }
    }

    fn help(self) -> &'static str {
        match self {
            Self::Counter(f) => f.help(),
            Self::Gauge(f) => f.help(),
            Self::Histogram(f) => f.help(),
        }
    }
}

/// Schema entry handed to the consumer once
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricDescriptor {
    /// Fully qualified name, prefix included
    pub name: String,
    pub help: &'static str,
    pub kind: MetricKind,
}

/// Value half of a collected sample
#[derive(Debug, Clone, PartialEq)]
pub enum SampleValue {
    Counter(u64),
    Gauge(i64),
    Histogram(HistogramSnapshot),
}

impl SampleValue {
    #[must_use]
    pub const fn kind(&self) -> MetricKind {
        match self {
            Self::Counter(_) => MetricKind::Counter,
            Self::Gauge(_) => MetricKind::Gauge,
            Self::Histogram(_) => MetricKind::Histogram,
        }
    }
}

/// One metric as read during a collection cycle
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSample {
    pub name: String,
    pub help: &'static str,
    pub value: SampleValue,
}

impl MetricSample {
    #[must_use]
    pub const fn kind(&self) -> MetricKind {
        self.value.kind()
    }
}

/// Reads [`KcpMetrics`] on demand for a pull-based consumer
///
/// Cheap to clone. `collect` only performs atomic loads, so any number of
/// concurrent scrapes can run against the same exporter without coordination and
/// without ever blocking a producer.
#[derive(Clone)]
pub struct Exporter {
    inner: Arc<ExporterInner>,
}

struct ExporterInner {
    metrics: KcpMetrics,
    sources: Vec<Source>,
    descriptors: Vec<MetricDescriptor>,
    /// Consumer-side descriptors, aligned with `descriptors`
    descs: Vec<Desc>,
}

impl Exporter {
    /// Build an exporter over `metrics`
    ///
    /// A non-empty `name_prefix` is joined to every metric name with `_`.
    ///
    /// # Errors
    /// Returns [`MetricsError::InvalidPrefix`] when the prefix cannot start a
    /// metric name.
    pub fn new(metrics: KcpMetrics, name_prefix: &str) -> Result<Self> {
        validate_prefix(name_prefix)?;

        let sources: Vec<Source> = Source::all().collect();
        let descriptors: Vec<MetricDescriptor> = sources
            .iter()
            .map(|source| MetricDescriptor {
                name: qualify(name_prefix, source.base_name()),
                help: source.help(),
                kind: source.kind(),
            })
            .collect();
        let descs = descriptors
            .iter()
            .map(consumer_desc)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            inner: Arc::new(ExporterInner {
                metrics,
                sources,
                descriptors,
                descs,
            }),
        })
    }

    /// The fixed metric schema, available before anything is recorded
    #[must_use]
    pub fn describe(&self) -> Vec<MetricDescriptor> {
        self.inner.descriptors.clone()
    }

    /// Read every metric once
    ///
    /// Never fails and never mutates producer state. Output is complete and in
    /// [`Self::describe`] order; a histogram missing from the snapshot is reported
    /// as empty rather than omitted.
    #[must_use]
    pub fn collect(&self) -> Vec<MetricSample> {
        let snapshot = self.inner.metrics.snapshot();

        self.inner
            .sources
            .iter()
            .zip(&self.inner.descriptors)
            .map(|(source, descriptor)| {
                let value = match *source {
                    Source::Counter(field) => SampleValue::Counter(snapshot.snmp.get(field)),
                    Source::Gauge(GaugeField::ActiveCount) => {
                        SampleValue::Gauge(snapshot.active_sessions)
                    }
                    Source::Histogram(field) => SampleValue::Histogram(
                        snapshot.histogram(field).cloned().unwrap_or_else(|| {
                            HistogramSnapshot::empty(self.bounds_for(field))
                        }),
                    ),
                };
                MetricSample {
                    name: descriptor.name.clone(),
                    help: descriptor.help,
                    value,
                }
            })
            .collect()
    }

    #[must_use]
    pub fn metrics(&self) -> &KcpMetrics {
        &self.inner.metrics
    }

    fn bounds_for(&self, field: HistogramField) -> BucketBounds {
        self.inner
            .metrics
            .samples()
            .histogram(field)
            .bounds()
            .clone()
    }

    pub(crate) fn descs(&self) -> &[Desc] {
        &self.inner.descs
    }
}

impl fmt::Debug for Exporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Exporter")
            .field("metrics", &self.inner.descriptors.len())
            .finish()
    }
}

fn consumer_desc(descriptor: &MetricDescriptor) -> Result<Desc> {
    Desc::new(
        descriptor.name.clone(),
        descriptor.help.to_string(),
        Vec::new(),
        Default::default(),
    )
    .map_err(|source| MetricsError::Descriptor {
        name: descriptor.name.clone(),
        source,
    })
}

fn qualify(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}_{}", prefix, name)
    }
}

/// Check that `prefix` can start a metric name (`[a-zA-Z_][a-zA-Z0-9_]*`)
///
/// The empty prefix is valid and means "no prefix".
pub fn validate_prefix(prefix: &str) -> Result<()> {
    let mut chars = prefix.chars();
    let valid = match chars.next() {
        None => true,
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
    };
    if valid {
        Ok(())
    } else {
        Err(MetricsError::InvalidPrefix(prefix.to_string()))
    }
}
