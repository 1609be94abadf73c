//! Lock-free metric storage for KCP sessions
//!
//! The protocol engine writes through [`KcpMetrics`] on its per-packet hot path.
//! Every counter, gauge and histogram slot is its own atomic, updated with
//! `Ordering::Relaxed`; there is no lock anywhere on the producer side.
//!
//! # Consistency model
//!
//! Snapshots are relaxed, not transactional. Each field read during a snapshot
//! holds a value it really had at some instant during the read, and no update is
//! ever lost or torn. Two fields read in the same snapshot carry no ordering
//! relationship with each other. This is enough for dashboards, which is the only
//! consumer.

mod collector;
mod gauge;
mod histogram;
mod recorder;
mod snapshot;
mod snmp;

pub use collector::KcpMetrics;
pub use gauge::{GaugeField, GaugeSet};
pub use histogram::{AtomicHistogram, BucketBounds, BucketScheme, HistogramSnapshot, UpdateTimer};
pub use recorder::{HistogramField, SampleRecorder};
pub use snapshot::{MetricsSnapshot, SnmpSnapshot};
pub use snmp::{SnmpCounters, SnmpField, UnknownField};
