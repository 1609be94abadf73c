//! Constants used throughout the KCP metrics layer
//!
//! Metric names are part of the consumer contract: dashboards and alerts key on
//! these exact strings, so renaming any of them is a breaking change.

/// Default histogram bucket upper bounds
///
/// Both lists are inclusive upper bounds in strictly increasing order. Values above
/// the last bound land in the implicit `+Inf` bucket.
pub mod buckets {
    /// Update-loop duration buckets, in milliseconds
    pub const LATENCY: [f64; 18] = [
        1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 12.0, 15.0, 18.0, 20.0, 25.0, 30.0,
        35.0, 40.0,
    ];

    /// Queue and buffer depth buckets, in segments
    pub const SIZE: [f64; 15] = [
        5.0, 10.0, 15.0, 20.0, 30.0, 50.0, 70.0, 100.0, 150.0, 200.0, 250.0, 300.0, 350.0, 400.0,
        500.0,
    ];

    const fn strictly_increasing(bounds: &[f64]) -> bool {
        let mut i = 1;
        while i < bounds.len() {
            if bounds[i] <= bounds[i - 1] {
                return false;
            }
            i += 1;
        }
        true
    }

    const _LATENCY_SORTED: () = assert!(
        strictly_increasing(&LATENCY),
        "LATENCY buckets must be strictly increasing"
    );

    const _SIZE_SORTED: () = assert!(
        strictly_increasing(&SIZE),
        "SIZE buckets must be strictly increasing"
    );
}

/// Exported metric names
pub mod names {
    /// Prefix shared by every SNMP-style counter
    pub const SNMP_PREFIX: &str = "kcp_snmp_";

    /// Number of live KCP sessions
    pub const ACTIVE_COUNT: &str = "kcp_active_count";

    pub const UPDATE_TIME: &str = "kcp_update_time";
    pub const SEND_QUEUE_LENGTH: &str = "send_queue_length";
    pub const RECEIVE_QUEUE_LENGTH: &str = "receive_queue_length";
    pub const SEND_BUFFER_LENGTH: &str = "send_buffer_length";
    pub const RECEIVE_BUFFER_LENGTH: &str = "receive_buffer_length";
}

/// Help text attached to gauge and histogram descriptors
pub mod help {
    pub const ACTIVE_COUNT: &str = "Number of currently active KCP sessions";
    pub const UPDATE_TIME: &str = "Duration of one KCP update loop in milliseconds";
    pub const SEND_QUEUE_LENGTH: &str = "Segments waiting in the KCP send queue";
    pub const RECEIVE_QUEUE_LENGTH: &str = "Segments waiting in the KCP receive queue";
    pub const SEND_BUFFER_LENGTH: &str = "Segments in flight in the KCP send buffer";
    pub const RECEIVE_BUFFER_LENGTH: &str = "Out-of-order segments held in the KCP receive buffer";
}

/// Pull endpoint defaults
pub mod server {
    /// Listen on all interfaces
    pub const DEFAULT_HOST: &str = "0.0.0.0";

    /// Conventional exporter port range starts at 9100
    pub const DEFAULT_PORT: u16 = 9100;

    pub const DEFAULT_PATH: &str = "/metrics";
}

/// Environment variable names honoured by config loading
pub mod env {
    pub const PREFIX: &str = "KCP_METRICS_PREFIX";
    pub const PORT: &str = "KCP_METRICS_PORT";
    pub const HOST: &str = "KCP_METRICS_HOST";
}
