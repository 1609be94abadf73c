//! Point-in-time gauges set directly by the protocol engine

use crate::constants::{help, names};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicI64, Ordering};

/// Gauges in the fixed schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum GaugeField {
    /// Live KCP sessions
    ActiveCount,
}

impl GaugeField {
    pub const ALL: [GaugeField; 1] = [GaugeField::ActiveCount];
    pub const COUNT: usize = Self::ALL.len();

    #[must_use]
    pub const fn metric_name(self) -> &'static str {
        match self {
            Self::ActiveCount => names::ACTIVE_COUNT,
        }
    }

    #[must_use]
    pub const fn help(self) -> &'static str {
        match self {
            Self::ActiveCount => help::ACTIVE_COUNT,
        }
    }

    #[inline]
    const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for GaugeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.metric_name())
    }
}

impl FromStr for GaugeField {
    type Err = super::snmp::UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GaugeField::ALL
            .into_iter()
            .find(|g| g.metric_name() == s)
            .ok_or_else(|| super::snmp::UnknownField(s.to_string()))
    }
}

/// Overwritable gauge values, no history retained
pub struct GaugeSet {
    values: [AtomicI64; GaugeField::COUNT],
}

impl GaugeSet {
    #[must_use]
    pub fn new() -> Self {
        Self {
            values: std::array::from_fn(|_| AtomicI64::new(0)),
        }
    }

    /// Overwrite a gauge with the latest value
    #[inline]
    pub fn set(&self, field: GaugeField, value: i64) {
        self.values[field.index()].store(value, Ordering::Relaxed);
    }

    /// Latest value passed to [`Self::set`], or zero if never set
    #[inline]
    #[must_use]
    pub fn get(&self, field: GaugeField) -> i64 {
        self.values[field.index()].load(Ordering::Relaxed)
    }
}

impl Default for GaugeSet {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for GaugeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for field in GaugeField::ALL {
            map.entry(&field.metric_name(), &self.get(field));
        }
        map.finish()
    }
}
