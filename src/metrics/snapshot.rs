//! Point-in-time copy of the SNMP counter block

use super::histogram::HistogramSnapshot;
use super::recorder::HistogramField;
use super::snmp::SnmpField;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::ops::Index;

/// Everything one collection cycle reads (cloneable snapshot)
#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    pub snmp: SnmpSnapshot,
    pub active_sessions: i64,
    /// One entry per histogram, in schema order
    pub histograms: Vec<(HistogramField, HistogramSnapshot)>,
}

impl MetricsSnapshot {
    #[must_use]
    pub fn histogram(&self, field: HistogramField) -> Option<&HistogramSnapshot> {
        self.histograms
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, snap)| snap)
    }
}

/// Detached copy of every SNMP counter (cloneable snapshot)
///
/// Produced by [`SnmpCounters::snapshot`](super::SnmpCounters::snapshot). Values are
/// per-field consistent only; see the module docs for the relaxed model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnmpSnapshot {
    values: [u64; SnmpField::COUNT],
}

impl SnmpSnapshot {
    #[inline]
    pub(crate) const fn from_values(values: [u64; SnmpField::COUNT]) -> Self {
        Self { values }
    }

    /// Snapshot with every counter at zero
    #[must_use]
    pub const fn zeroed() -> Self {
        Self {
            values: [0; SnmpField::COUNT],
        }
    }

    #[inline]
    #[must_use]
    pub const fn get(&self, field: SnmpField) -> u64 {
        self.values[field.index()]
    }

    /// `(field, value)` pairs in schema order
    pub fn iter(&self) -> impl Iterator<Item = (SnmpField, u64)> + '_ {
        SnmpField::ALL.into_iter().zip(self.values.iter().copied())
    }

    /// CamelCase column headers, aligned with [`Self::to_vec`]
    #[must_use]
    pub fn header() -> Vec<&'static str> {
        SnmpField::ALL.iter().map(|f| f.header()).collect()
    }

    /// Values in schema order
    #[must_use]
    pub fn to_vec(&self) -> Vec<u64> {
        self.values.to_vec()
    }

    /// True while no counter has moved since process start
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.values.iter().all(|&v| v == 0)
    }
}

impl Default for SnmpSnapshot {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl Index<SnmpField> for SnmpSnapshot {
    type Output = u64;

    fn index(&self, field: SnmpField) -> &u64 {
        &self.values[field.index()]
    }
}

/// Serializes as a map keyed by snake-case field name, in schema order
impl Serialize for SnmpSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(SnmpField::COUNT))?;
        for (field, value) in self.iter() {
            map.serialize_entry(field.name(), &value)?;
        }
        map.end()
    }
}
