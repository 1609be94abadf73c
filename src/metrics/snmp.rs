//! SNMP-style protocol counters
//!
//! A fixed block of monotonically increasing counters, one `AtomicU64` per field.
//! Fields are independent, so each increment is a single relaxed `fetch_add` and a
//! snapshot is a sequence of relaxed loads. There is no block-wide lock.

use super::snapshot::SnmpSnapshot;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

/// Define the counter schema once and derive every lookup table from it
macro_rules! snmp_fields {
    (
        $(
            $(#[$meta:meta])*
            $variant:ident => $snake:literal, $header:literal, $help:literal;
        )+
    ) => {
        /// One field of the SNMP counter block
        ///
        /// Variant order is the export order and the order of [`SnmpSnapshot::to_vec`].
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(usize)]
        pub enum SnmpField {
            $( $(#[$meta])* $variant, )+
        }

        impl SnmpField {
            /// Every field in schema order
            pub const ALL: [SnmpField; snmp_fields!(@count $($variant)+)] = [
                $( SnmpField::$variant, )+
            ];

            /// Number of fields in the block
            pub const COUNT: usize = Self::ALL.len();

            /// Snake-case field name (without the `kcp_snmp_` prefix)
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $( SnmpField::$variant => $snake, )+
                }
            }

            /// Fully qualified exported metric name
            #[must_use]
            pub const fn metric_name(self) -> &'static str {
                match self {
                    $( SnmpField::$variant => concat!("kcp_snmp_", $snake), )+
                }
            }

            /// CamelCase column header used by the protocol engine
            #[must_use]
            pub const fn header(self) -> &'static str {
                match self {
                    $( SnmpField::$variant => $header, )+
                }
            }

            /// Help text for the exported counter
            #[must_use]
            pub const fn help(self) -> &'static str {
                match self {
                    $( SnmpField::$variant => $help, )+
                }
            }
        }
    };

    (@count $($t:ident)+) => { 0usize $(+ snmp_fields!(@one $t))+ };
    (@one $t:ident) => { 1usize };
}

snmp_fields! {
    BytesSent => "bytes_sent", "BytesSent", "Bytes sent from upper level";
    BytesReceived => "bytes_received", "BytesReceived", "Bytes received to upper level";
    MaxConn => "max_conn", "MaxConn", "Max number of connections ever reached";
    ActiveOpens => "active_opens", "ActiveOpens", "Accumulated active open connections";
    PassiveOpens => "passive_opens", "PassiveOpens", "Accumulated passive open connections";
    CurrEstab => "curr_estab", "CurrEstab", "Current number of established connections";
    InErrs => "in_errs", "InErrs", "UDP read errors reported from the network";
    InCsumErrors => "in_csum_errors", "InCsumErrors", "Checksum errors from CRC32";
    KcpInErrors => "kcp_in_errors", "KCPInErrors", "Packet input errors reported from KCP";
    InPkts => "in_pkts", "InPkts", "Incoming packets count";
    OutPkts => "out_pkts", "OutPkts", "Outgoing packets count";
    InSegs => "in_segs", "InSegs", "Incoming KCP segments";
    OutSegs => "out_segs", "OutSegs", "Outgoing KCP segments";
    InBytes => "in_bytes", "InBytes", "UDP bytes received";
    OutBytes => "out_bytes", "OutBytes", "UDP bytes sent";
    RetransSegs => "retrans_segs", "RetransSegs", "Accumulated retransmitted segments";
    FastRetransSegs => "fast_retrans_segs", "FastRetransSegs", "Accumulated fast retransmitted segments";
    EarlyRetransSegs => "early_retrans_segs", "EarlyRetransSegs", "Accumulated early retransmitted segments";
    /// Segments inferred lost after a retransmission timeout
    LostSegs => "lost_segs", "LostSegs", "Number of segments inferred as lost";
    RepeatSegs => "repeat_segs", "RepeatSegs", "Number of duplicated segments received";
    FecRecovered => "fec_recovered", "FECRecovered", "Correct packets recovered from FEC";
    FecErrs => "fec_errs", "FECErrs", "Incorrect packets recovered from FEC";
    FecParityShards => "fec_parity_shards", "FECParityShards", "FEC parity shards received";
    /// Groups that could not be recovered because too few shards arrived
    FecShortShards => "fec_short_shards", "FECShortShards", "Number of data shards insufficient for recovery";
}

impl SnmpField {
    /// Position of this field inside the counter block
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for SnmpField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.metric_name())
    }
}

/// Returned when a producer names a counter outside the fixed schema
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown SNMP counter '{0}'")]
pub struct UnknownField(pub String);

impl FromStr for SnmpField {
    type Err = UnknownField;

    /// Accepts the CamelCase header (`InPkts`), the snake-case field name
    /// (`in_pkts`) or the exported metric name (`kcp_snmp_in_pkts`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let snake = s.strip_prefix(crate::constants::names::SNMP_PREFIX).unwrap_or(s);
        SnmpField::ALL
            .into_iter()
            .find(|f| f.header() == s || f.name() == snake)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

/// Lock-free block of SNMP-style counters
///
/// All methods take `&self` and are safe to call from any number of threads.
pub struct SnmpCounters {
    fields: [AtomicU64; SnmpField::COUNT],
}

impl SnmpCounters {
    /// Create a block with every counter at zero
    #[must_use]
    pub fn new() -> Self {
        Self {
            fields: std::array::from_fn(|_| AtomicU64::new(0)),
        }
    }

    /// Add `delta` to one counter
    ///
    /// Wraps on `u64` overflow, matching the protocol engine's counter arithmetic.
    #[inline]
    pub fn add(&self, field: SnmpField, delta: u64) {
        self.fields[field.index()].fetch_add(delta, Ordering::Relaxed);
    }

    #[inline]
    pub fn incr(&self, field: SnmpField) {
        self.add(field, 1);
    }

    /// Current value of a single counter
    #[inline]
    #[must_use]
    pub fn get(&self, field: SnmpField) -> u64 {
        self.fields[field.index()].load(Ordering::Relaxed)
    }

    /// Copy every counter, one field at a time
    ///
    /// Each copied value is one the field really held during the call. No ordering
    /// is guaranteed between two fields: a producer that bumps `InPkts` then
    /// `InBytes` may be observed with only the second increment applied.
    #[must_use]
    pub fn snapshot(&self) -> SnmpSnapshot {
        let values = std::array::from_fn(|i| self.fields[i].load(Ordering::Relaxed));
        SnmpSnapshot::from_values(values)
    }
}

impl Default for SnmpCounters {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SnmpCounters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnmpCounters")
            .field("snapshot", &self.snapshot())
            .finish()
    }
}
