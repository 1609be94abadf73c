//! Fixed-bucket histograms with lock-free observation
//!
//! Every bucket slot is an independent `AtomicU64` holding the number of
//! observations that fell into that slot only (non-cumulative). The exposition form
//! is cumulative and is computed on read. One extra slot past the last bound
//! collects values above every bound, the implicit `+Inf` bucket.

use crate::constants::buckets;
use crate::error::{MetricsError, Result};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Shared, immutable list of inclusive bucket upper bounds
///
/// Cloning is a reference-count bump, so several histograms built from the same
/// scheme share one allocation.
#[derive(Clone, PartialEq)]
pub struct BucketBounds(Arc<[f64]>);

impl BucketBounds {
    /// Validate and wrap a list of upper bounds
    ///
    /// # Errors
    /// Rejects an empty list, non-finite bounds and lists that are not strictly
    /// increasing.
    pub fn new(bounds: Vec<f64>) -> Result<Self> {
        if bounds.is_empty() {
            return Err(MetricsError::InvalidBuckets(
                "at least one bucket bound is required".to_string(),
            ));
        }
        if let Some(bad) = bounds.iter().find(|b| !b.is_finite()) {
            return Err(MetricsError::InvalidBuckets(format!(
                "bound {} is not finite (+Inf is implicit)",
                bad
            )));
        }
        if let Some(pair) = bounds.windows(2).find(|w| w[0] >= w[1]) {
            return Err(MetricsError::InvalidBuckets(format!(
                "bounds must be strictly increasing, found {} before {}",
                pair[0], pair[1]
            )));
        }
        Ok(Self(bounds.into()))
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Slot for `value`: the smallest bound `>= value`, or `len()` for overflow
    #[inline]
    fn slot_for(&self, value: f64) -> usize {
        self.0.partition_point(|bound| *bound < value)
    }
}

impl fmt::Debug for BucketBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

/// The two bucket layouts used by KCP histograms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BucketScheme {
    /// Fine-grained 1..40 ms buckets for update-loop timing
    Latency,
    /// 5..500 segment buckets for queue and buffer depths
    Size,
}

impl BucketScheme {
    /// Built-in bounds for this scheme
    #[must_use]
    pub fn default_bounds(self) -> BucketBounds {
        let bounds: &[f64] = match self {
            Self::Latency => &buckets::LATENCY,
            Self::Size => &buckets::SIZE,
        };
        BucketBounds(Arc::from(bounds))
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Latency => "latency",
            Self::Size => "size",
        }
    }
}

impl fmt::Display for BucketScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Histogram whose observations never take a lock
pub struct AtomicHistogram {
    bounds: BucketBounds,
    /// `bounds.len() + 1` slots, the last one is the overflow bucket
    slots: Box<[AtomicU64]>,
    /// Running sum stored as `f64` bits
    sum_bits: AtomicU64,
}

impl AtomicHistogram {
    #[must_use]
    pub fn new(bounds: BucketBounds) -> Self {
        let slots = (0..=bounds.len()).map(|_| AtomicU64::new(0)).collect();
        Self {
            bounds,
            slots,
            sum_bits: AtomicU64::new(0f64.to_bits()),
        }
    }

    #[must_use]
    pub fn bounds(&self) -> &BucketBounds {
        &self.bounds
    }

    /// Record one observation
    ///
    /// Values equal to a bound land in that bucket. Values above the last bound are
    /// kept in the overflow slot and still count toward sum and count. `NaN` has no
    /// bucket and is dropped; callers that care check first.
    #[inline]
    pub fn observe(&self, value: f64) {
        if value.is_nan() {
            return;
        }
        let slot = self.bounds.slot_for(value);
        self.slots[slot].fetch_add(1, Ordering::Relaxed);
        // fetch_update only fails when the closure returns None
        let _ = self
            .sum_bits
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |bits| {
                Some((f64::from_bits(bits) + value).to_bits())
            });
    }

    /// Record a duration in milliseconds
    #[inline]
    pub fn observe_duration(&self, elapsed: Duration) {
        self.observe(elapsed.as_secs_f64() * 1000.0);
    }

    /// Start a timer that records its elapsed milliseconds when dropped
    #[must_use = "the timer records when dropped; binding it to `_` records immediately"]
    pub fn start_timer(&self) -> UpdateTimer<'_> {
        UpdateTimer {
            histogram: self,
            start: Instant::now(),
            armed: true,
        }
    }

    /// Read the histogram for export
    ///
    /// Slot loads are individually atomic but not mutually consistent with observes
    /// racing the read. `count` is derived from the loaded slots, so the cumulative
    /// count of the last finite bucket never exceeds it. `sum` is loaded separately
    /// and may include or miss an in-flight observation.
    #[must_use]
    pub fn snapshot(&self) -> HistogramSnapshot {
        let raw: Vec<u64> = self
            .slots
            .iter()
            .map(|slot| slot.load(Ordering::Relaxed))
            .collect();
        let sum = f64::from_bits(self.sum_bits.load(Ordering::Relaxed));

        let mut running = 0u64;
        let cumulative: Vec<u64> = raw[..self.bounds.len()]
            .iter()
            .map(|n| {
                running = running.wrapping_add(*n);
                running
            })
            .collect();
        let count = running.wrapping_add(raw[self.bounds.len()]);

        HistogramSnapshot {
            bounds: self.bounds.clone(),
            cumulative,
            count,
            sum,
        }
    }
}

impl fmt::Debug for AtomicHistogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AtomicHistogram")
            .field("bounds", &self.bounds)
            .field("snapshot", &self.snapshot())
            .finish()
    }
}

/// Cumulative view of a histogram at read time
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramSnapshot {
    bounds: BucketBounds,
    cumulative: Vec<u64>,
    count: u64,
    sum: f64,
}

impl HistogramSnapshot {
    /// Empty snapshot over the given bounds
    #[must_use]
    pub fn empty(bounds: BucketBounds) -> Self {
        let cumulative = vec![0; bounds.len()];
        Self {
            bounds,
            cumulative,
            count: 0,
            sum: 0.0,
        }
    }

    #[must_use]
    pub fn bounds(&self) -> &[f64] {
        self.bounds.as_slice()
    }

    /// Observations `<=` each bound, aligned with [`Self::bounds`]
    #[must_use]
    pub fn cumulative_counts(&self) -> &[u64] {
        &self.cumulative
    }

    /// `(upper_bound, cumulative_count)` pairs, `+Inf` excluded
    pub fn buckets(&self) -> impl Iterator<Item = (f64, u64)> + '_ {
        self.bounds
            .as_slice()
            .iter()
            .copied()
            .zip(self.cumulative.iter().copied())
    }

    /// Total observations, including those above the last bound
    #[must_use]
    pub const fn count(&self) -> u64 {
        self.count
    }

    #[must_use]
    pub const fn sum(&self) -> f64 {
        self.sum
    }

    /// Observations above the last finite bound
    #[must_use]
    pub fn overflow(&self) -> u64 {
        let finite = self.cumulative.last().copied().unwrap_or(0);
        self.count.saturating_sub(finite)
    }
}

/// Scope guard recording elapsed milliseconds into a histogram
///
/// Obtained from [`AtomicHistogram::start_timer`]. Records once, either on
/// [`UpdateTimer::observe`] or on drop.
#[derive(Debug)]
pub struct UpdateTimer<'a> {
    histogram: &'a AtomicHistogram,
    start: Instant,
    armed: bool,
}

impl UpdateTimer<'_> {
    /// Record now and return the elapsed time in milliseconds
    pub fn observe(mut self) -> f64 {
        self.record()
    }

    /// Drop the timer without recording anything
    pub fn discard(mut self) {
        self.armed = false;
    }

    fn record(&mut self) -> f64 {
        let millis = self.start.elapsed().as_secs_f64() * 1000.0;
        if self.armed {
            self.armed = false;
            self.histogram.observe(millis);
        }
        millis
    }
}

impl Drop for UpdateTimer<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.record();
        }
    }
}
