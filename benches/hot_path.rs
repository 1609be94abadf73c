//! Benchmarks for producer-side updates
//!
//! Measures the cost a protocol session pays per update:
//! - typed counter increments and gauge sets
//! - histogram observations for both bucket schemes
//! - string-keyed updates that resolve the field name first
//! - contended increments from several threads
//!
//! Run with: cargo bench --bench hot_path

use divan::{Bencher, black_box};
use kcp_metrics::{HistogramField, KcpMetrics, SnmpField};
use std::time::Duration;

fn main() {
    divan::main();
}

// =============================================================================
// Typed updates
// =============================================================================

mod typed {
    use super::*;

    #[divan::bench(sample_count = 1000, sample_size = 1000)]
    fn incr(bencher: Bencher) {
        let metrics = KcpMetrics::new();
        bencher.bench(|| metrics.incr(black_box(SnmpField::InPkts)));
    }

    #[divan::bench(sample_count = 1000, sample_size = 1000)]
    fn add_bytes(bencher: Bencher) {
        let metrics = KcpMetrics::new();
        bencher.bench(|| metrics.add(black_box(SnmpField::OutBytes), black_box(1400)));
    }

    #[divan::bench(sample_count = 1000, sample_size = 1000)]
    fn set_active_sessions(bencher: Bencher) {
        let metrics = KcpMetrics::new();
        bencher.bench(|| metrics.set_active_sessions(black_box(128)));
    }

    #[divan::bench(args = [HistogramField::UpdateTime, HistogramField::SendQueueLength])]
    fn observe(bencher: Bencher, field: HistogramField) {
        let metrics = KcpMetrics::new();
        bencher.bench(|| metrics.observe(field, black_box(17.0)));
    }

    #[divan::bench]
    fn observe_duration(bencher: Bencher) {
        let metrics = KcpMetrics::new();
        bencher.bench(|| {
            metrics.observe_duration(HistogramField::UpdateTime, black_box(Duration::from_micros(750)))
        });
    }
}

// =============================================================================
// String-keyed updates
// =============================================================================

mod by_name {
    use super::*;

    #[divan::bench(args = ["InPkts", "in_pkts", "kcp_snmp_fec_short_shards"])]
    fn increment_counter(bencher: Bencher, name: &str) {
        let metrics = KcpMetrics::new();
        bencher.bench(|| metrics.increment_counter(black_box(name), 1));
    }

    #[divan::bench]
    fn observe_histogram(bencher: Bencher) {
        let metrics = KcpMetrics::new();
        bencher.bench(|| metrics.observe_histogram(black_box("receive_queue_length"), 42.0));
    }
}

// =============================================================================
// Contention
// =============================================================================

#[divan::bench(threads = [1, 2, 4, 8])]
fn contended_incr(bencher: Bencher) {
    let metrics = KcpMetrics::new();
    bencher.bench(|| metrics.incr(black_box(SnmpField::InSegs)));
}
