//! Sample recorder: the fixed set of KCP histograms

use super::histogram::{AtomicHistogram, BucketBounds, BucketScheme, HistogramSnapshot, UpdateTimer};
use super::snmp::UnknownField;
use crate::constants::{help, names};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Histograms in the fixed schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum HistogramField {
    /// Duration of one update loop, milliseconds
    UpdateTime,
    SendQueueLength,
    ReceiveQueueLength,
    SendBufferLength,
    ReceiveBufferLength,
}

impl HistogramField {
    pub const ALL: [HistogramField; 5] = [
        Self::UpdateTime,
        Self::SendQueueLength,
        Self::ReceiveQueueLength,
        Self::SendBufferLength,
        Self::ReceiveBufferLength,
    ];

    pub const COUNT: usize = Self::ALL.len();

    #[must_use]
    pub const fn metric_name(self) -> &'static str {
        match self {
            Self::UpdateTime => names::UPDATE_TIME,
            Self::SendQueueLength => names::SEND_QUEUE_LENGTH,
            Self::ReceiveQueueLength => names::RECEIVE_QUEUE_LENGTH,
            Self::SendBufferLength => names::SEND_BUFFER_LENGTH,
            Self::ReceiveBufferLength => names::RECEIVE_BUFFER_LENGTH,
        }
    }

    #[must_use]
    pub const fn help(self) -> &'static str {
        match self {
            Self::UpdateTime => help::UPDATE_TIME,
            Self::SendQueueLength => help::SEND_QUEUE_LENGTH,
            Self::ReceiveQueueLength => help::RECEIVE_QUEUE_LENGTH,
            Self::SendBufferLength => help::SEND_BUFFER_LENGTH,
            Self::ReceiveBufferLength => help::RECEIVE_BUFFER_LENGTH,
        }
    }

    /// Which bucket layout this histogram uses
    #[must_use]
    pub const fn scheme(self) -> BucketScheme {
        match self {
            Self::UpdateTime => BucketScheme::Latency,
            _ => BucketScheme::Size,
        }
    }

    #[inline]
    const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for HistogramField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.metric_name())
    }
}

impl FromStr for HistogramField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HistogramField::ALL
            .into_iter()
            .find(|h| h.metric_name() == s)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

/// Owns one [`AtomicHistogram`] per [`HistogramField`]
///
/// Bounds are injected per scheme, so the four size histograms share a single
/// bounds allocation.
pub struct SampleRecorder {
    histograms: [AtomicHistogram; HistogramField::COUNT],
}

impl SampleRecorder {
    /// Build every histogram from the given latency and size bounds
    #[must_use]
    pub fn new(latency: BucketBounds, size: BucketBounds) -> Self {
        let histograms = HistogramField::ALL.map(|field| {
            let bounds = match field.scheme() {
                BucketScheme::Latency => latency.clone(),
                BucketScheme::Size => size.clone(),
            };
            AtomicHistogram::new(bounds)
        });
        Self { histograms }
    }

    #[inline]
    #[must_use]
    pub fn histogram(&self, field: HistogramField) -> &AtomicHistogram {
        &self.histograms[field.index()]
    }

    #[inline]
    pub fn observe(&self, field: HistogramField, value: f64) {
        self.histogram(field).observe(value);
    }

    #[inline]
    pub fn observe_duration(&self, field: HistogramField, elapsed: Duration) {
        self.histogram(field).observe_duration(elapsed);
    }

    /// Timer feeding `kcp_update_time`
    #[must_use = "the timer records when dropped; binding it to `_` records immediately"]
    pub fn start_update_timer(&self) -> UpdateTimer<'_> {
        self.histogram(HistogramField::UpdateTime).start_timer()
    }

    #[must_use]
    pub fn snapshot(&self, field: HistogramField) -> HistogramSnapshot {
        self.histogram(field).snapshot()
    }

    /// Read every histogram in schema order
    #[must_use]
    pub fn snapshots(&self) -> Vec<(HistogramField, HistogramSnapshot)> {
        HistogramField::ALL
            .into_iter()
            .map(|field| (field, self.snapshot(field)))
            .collect()
    }
}

impl Default for SampleRecorder {
    fn default() -> Self {
        Self::new(
            BucketScheme::Latency.default_bounds(),
            BucketScheme::Size.default_bounds(),
        )
    }
}

impl fmt::Debug for SampleRecorder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for field in HistogramField::ALL {
            map.entry(&field.metric_name(), self.histogram(field));
        }
        map.finish()
    }
}
