//! Tests for the SNMP counter block
//!
//! Concurrent increments, snapshot bounds and the relaxed consistency model.

use kcp_metrics::metrics::SnmpCounters;
use kcp_metrics::{KcpMetrics, SnmpField};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

/// Two threads, 10,000 increments each, no other writers
#[test]
fn test_two_threads_same_counter() {
    let metrics = KcpMetrics::new();

    let handles: Vec<_> = (0..2)
        .map(|_| {
            let m = metrics.clone();
            thread::spawn(move || {
                for _ in 0..10_000 {
                    m.increment_counter("InPkts", 1);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(metrics.snmp_snapshot().get(SnmpField::InPkts), 20_000);
}

/// Many threads hitting different fields never disturb each other
#[test]
fn test_threads_on_distinct_fields() {
    let counters = Arc::new(SnmpCounters::new());

    let handles: Vec<_> = SnmpField::ALL
        .into_iter()
        .map(|field| {
            let c = Arc::clone(&counters);
            thread::spawn(move || {
                for _ in 0..1_000 {
                    c.add(field, field.index() as u64);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let snapshot = counters.snapshot();
    for field in SnmpField::ALL {
        assert_eq!(snapshot.get(field), 1_000 * field.index() as u64);
    }
}

/// Mixed deltas from several threads sum exactly
#[test]
fn test_mixed_deltas_sum_exactly() {
    let metrics = KcpMetrics::new();
    let deltas = [1u64, 7, 1400, 0, 65_535];

    let handles: Vec<_> = deltas
        .iter()
        .map(|&delta| {
            let m = metrics.clone();
            thread::spawn(move || {
                for _ in 0..500 {
                    m.add(SnmpField::OutBytes, delta);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let expected: u64 = deltas.iter().map(|d| d * 500).sum();
    assert_eq!(metrics.counter(SnmpField::OutBytes), expected);
}

/// Snapshots taken during increments stay between the pre-call sum and the final sum
#[test]
fn test_snapshot_bounds_under_load() {
    let metrics = KcpMetrics::new();
    metrics.add(SnmpField::InSegs, 100);
    let done = Arc::new(AtomicBool::new(false));

    let writer = {
        let m = metrics.clone();
        thread::spawn(move || {
            for _ in 0..50_000 {
                m.incr(SnmpField::InSegs);
            }
        })
    };

    let reader = {
        let m = metrics.clone();
        let done = Arc::clone(&done);
        thread::spawn(move || {
            let mut last = 0;
            let mut reads = 0;
            while !done.load(Ordering::Relaxed) || reads == 0 {
                let value = m.snmp_snapshot().get(SnmpField::InSegs);
                assert!(value >= 100, "snapshot below pre-load sum: {}", value);
                assert!(value <= 50_100, "snapshot above total issued: {}", value);
                assert!(value >= last, "counter went backwards: {} < {}", value, last);
                last = value;
                reads += 1;
            }
        })
    };

    writer.join().unwrap();
    done.store(true, Ordering::Relaxed);
    reader.join().unwrap();

    assert_eq!(metrics.counter(SnmpField::InSegs), 50_100);
}

/// Snapshot reflects every increment that completed before the call
#[test]
fn test_snapshot_after_join_sees_everything() {
    let metrics = KcpMetrics::new();
    let m = metrics.clone();
    thread::spawn(move || {
        m.add(SnmpField::FecRecovered, 3);
        m.add(SnmpField::FecErrs, 1);
    })
    .join()
    .unwrap();

    let snapshot = metrics.snmp_snapshot();
    assert_eq!(snapshot[SnmpField::FecRecovered], 3);
    assert_eq!(snapshot[SnmpField::FecErrs], 1);
}

/// Snapshot header and values line up for tabular dumps
#[test]
fn test_header_and_values() {
    let metrics = KcpMetrics::new();
    metrics.add(SnmpField::BytesSent, 5);
    metrics.add(SnmpField::FecShortShards, 2);

    let snapshot = metrics.snmp_snapshot();
    let header = kcp_metrics::SnmpSnapshot::header();
    let values = snapshot.to_vec();

    assert_eq!(header.len(), 24);
    assert_eq!(values.len(), 24);
    assert_eq!((header[0], values[0]), ("BytesSent", 5));
    assert_eq!((header[23], values[23]), ("FECShortShards", 2));
}

/// Snapshot serializes to a JSON object keyed by field name
#[test]
fn test_snapshot_json() {
    let metrics = KcpMetrics::new();
    metrics.add(SnmpField::RetransSegs, 9);

    let json = serde_json::to_value(metrics.snmp_snapshot()).unwrap();
    let object = json.as_object().unwrap();
    assert_eq!(object.len(), 24);
    assert_eq!(object["retrans_segs"], 9);
    assert_eq!(object["in_pkts"], 0);
}

/// KcpMetrics is Send + Sync
#[test]
fn test_metrics_is_send_sync() {
    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    assert_send::<KcpMetrics>();
    assert_sync::<KcpMetrics>();
    assert_send::<SnmpCounters>();
    assert_sync::<SnmpCounters>();
}
