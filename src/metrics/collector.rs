//! Producer handle shared by every KCP session

use super::gauge::{GaugeField, GaugeSet};
use super::histogram::{BucketBounds, BucketScheme, UpdateTimer};
use super::recorder::{HistogramField, SampleRecorder};
use super::snapshot::{MetricsSnapshot, SnmpSnapshot};
use super::snmp::{SnmpCounters, SnmpField};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::warn;

/// Thread-safe metrics handle for the protocol engine
///
/// Cloning is cheap and every clone updates the same storage. All producer
/// methods are lock-free and never block on the exporter.
#[derive(Debug, Clone)]
pub struct KcpMetrics {
    inner: Arc<MetricsInner>,
}

#[derive(Debug)]
struct MetricsInner {
    snmp: SnmpCounters,
    gauges: GaugeSet,
    samples: SampleRecorder,
    // One-shot warning latches for dropped producer input
    warned_counter: AtomicBool,
    warned_gauge: AtomicBool,
    warned_histogram: AtomicBool,
    warned_nan: AtomicBool,
}

impl KcpMetrics {
    /// Create a handle using the built-in latency and size buckets
    #[must_use]
    pub fn new() -> Self {
        Self::with_buckets(
            BucketScheme::Latency.default_bounds(),
            BucketScheme::Size.default_bounds(),
        )
    }

    /// Create a handle with caller-supplied bucket bounds
    #[must_use]
    pub fn with_buckets(latency: BucketBounds, size: BucketBounds) -> Self {
        Self {
            inner: Arc::new(MetricsInner {
                snmp: SnmpCounters::new(),
                gauges: GaugeSet::new(),
                samples: SampleRecorder::new(latency, size),
                warned_counter: AtomicBool::new(false),
                warned_gauge: AtomicBool::new(false),
                warned_histogram: AtomicBool::new(false),
                warned_nan: AtomicBool::new(false),
            }),
        }
    }

    // Typed producer API

    #[inline]
    pub fn add(&self, field: SnmpField, delta: u64) {
        self.inner.snmp.add(field, delta);
    }

    #[inline]
    pub fn incr(&self, field: SnmpField) {
        self.inner.snmp.incr(field);
    }

    #[inline]
    pub fn set_active_sessions(&self, count: i64) {
        self.inner.gauges.set(GaugeField::ActiveCount, count);
    }

    #[inline]
    pub fn set(&self, field: GaugeField, value: i64) {
        self.inner.gauges.set(field, value);
    }

    #[inline]
    pub fn observe(&self, field: HistogramField, value: f64) {
        if value.is_nan() {
            self.reject_nan(field);
            return;
        }
        self.inner.samples.observe(field, value);
    }

    /// Record a duration into a histogram in milliseconds
    #[inline]
    pub fn observe_duration(&self, field: HistogramField, elapsed: Duration) {
        self.inner.samples.observe_duration(field, elapsed);
    }

    /// Time one update loop; records into `kcp_update_time` when dropped
    #[must_use = "the timer records when dropped; binding it to `_` records immediately"]
    pub fn start_update_timer(&self) -> UpdateTimer<'_> {
        self.inner.samples.start_update_timer()
    }

    // String-keyed producer API
    //
    // Unknown names are programming errors: they trip a debug assertion in debug
    // builds and are dropped in release builds, with one warning per kind.

    /// Add `delta` to the counter named `name`
    ///
    /// Accepts `InPkts`, `in_pkts` or `kcp_snmp_in_pkts`.
    pub fn increment_counter(&self, name: &str, delta: u64) {
        match name.parse::<SnmpField>() {
            Ok(field) => self.add(field, delta),
            Err(_) => reject_unknown("counter", name, &self.inner.warned_counter),
        }
    }

    pub fn set_gauge(&self, name: &str, value: i64) {
        match name.parse::<GaugeField>() {
            Ok(field) => self.set(field, value),
            Err(_) => reject_unknown("gauge", name, &self.inner.warned_gauge),
        }
    }

    pub fn observe_histogram(&self, name: &str, value: f64) {
        match name.parse::<HistogramField>() {
            Ok(field) => self.observe(field, value),
            Err(_) => reject_unknown("histogram", name, &self.inner.warned_histogram),
        }
    }

    // Reader side

    #[inline]
    #[must_use]
    pub fn counter(&self, field: SnmpField) -> u64 {
        self.inner.snmp.get(field)
    }

    #[inline]
    #[must_use]
    pub fn gauge(&self, field: GaugeField) -> i64 {
        self.inner.gauges.get(field)
    }

    #[must_use]
    pub fn snmp_snapshot(&self) -> SnmpSnapshot {
        self.inner.snmp.snapshot()
    }

    #[must_use]
    pub fn samples(&self) -> &SampleRecorder {
        &self.inner.samples
    }

    /// Read counters, gauges and histograms for one collection cycle
    ///
    /// Each field is read atomically on its own; no ordering holds across fields.
    /// Nothing is reset.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            snmp: self.inner.snmp.snapshot(),
            active_sessions: self.inner.gauges.get(GaugeField::ActiveCount),
            histograms: self.inner.samples.snapshots(),
        }
    }

    #[cold]
    fn reject_nan(&self, field: HistogramField) {
        if !self.inner.warned_nan.swap(true, Ordering::Relaxed) {
            warn!(
                histogram = field.metric_name(),
                "dropping NaN observation; further NaN values are dropped silently"
            );
        }
    }
}

impl Default for KcpMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cold]
#[inline(never)]
fn reject_unknown(kind: &'static str, name: &str, warned: &AtomicBool) {
    if cfg!(debug_assertions) {
        panic!("unknown {} metric name '{}'", kind, name);
    }
    if !warned.swap(true, Ordering::Relaxed) {
        warn!(
            kind,
            name,
            "dropping update for unknown metric name; further unknown names are dropped silently"
        );
    }
}
