//! Tests for the pull-based exporter
//!
//! Schema/collect alignment, zero-valued collection and concurrent scrapes.

use kcp_metrics::{
    Exporter, HistogramField, KcpMetrics, MetricKind, SampleValue, SnmpField,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

/// Collecting before any update yields a complete, zero-valued set
#[test]
fn test_collect_before_any_update() {
    let exporter = Exporter::new(KcpMetrics::new(), "").unwrap();
    let samples = exporter.collect();

    assert_eq!(samples.len(), exporter.describe().len());
    for sample in &samples {
        match &sample.value {
            SampleValue::Counter(v) => assert_eq!(*v, 0, "{}", sample.name),
            SampleValue::Gauge(v) => assert_eq!(*v, 0, "{}", sample.name),
            SampleValue::Histogram(h) => {
                assert_eq!(h.count(), 0, "{}", sample.name);
                assert_eq!(h.sum(), 0.0, "{}", sample.name);
                assert!(h.cumulative_counts().iter().all(|c| *c == 0));
            }
        }
    }
}

/// Describe covers every counter, the gauge and every histogram
#[test]
fn test_describe_schema() {
    let exporter = Exporter::new(KcpMetrics::new(), "").unwrap();
    let schema = exporter.describe();

    let counters = schema.iter().filter(|d| d.kind == MetricKind::Counter).count();
    let gauges = schema.iter().filter(|d| d.kind == MetricKind::Gauge).count();
    let histograms = schema.iter().filter(|d| d.kind == MetricKind::Histogram).count();

    assert_eq!(counters, SnmpField::COUNT);
    assert_eq!(gauges, 1);
    assert_eq!(histograms, HistogramField::COUNT);

    let names: Vec<&str> = schema.iter().map(|d| d.name.as_str()).collect();
    assert!(names.contains(&"kcp_snmp_in_pkts"));
    assert!(names.contains(&"kcp_active_count"));
    assert!(names.contains(&"kcp_update_time"));
    assert!(names.contains(&"receive_buffer_length"));
    assert!(schema.iter().all(|d| !d.help.is_empty()));
}

/// Describe is stable across calls and independent of producer activity
#[test]
fn test_describe_is_stable() {
    let metrics = KcpMetrics::new();
    let exporter = Exporter::new(metrics.clone(), "node1").unwrap();
    let before = exporter.describe();

    metrics.add(SnmpField::OutSegs, 10);
    metrics.observe(HistogramField::SendQueueLength, 3.0);

    assert_eq!(before, exporter.describe());
}

/// Collected values mirror producer updates by name
#[test]
fn test_collect_reflects_updates() {
    let metrics = KcpMetrics::new();
    let exporter = Exporter::new(metrics.clone(), "").unwrap();

    metrics.add(SnmpField::InPkts, 5);
    metrics.set_active_sessions(3);
    metrics.observe(HistogramField::UpdateTime, 0.4);

    let samples = exporter.collect();
    let find = |name: &str| {
        samples
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.value.clone())
    };

    assert_eq!(find("kcp_snmp_in_pkts"), Some(SampleValue::Counter(5)));
    assert_eq!(find("kcp_active_count"), Some(SampleValue::Gauge(3)));
    match find("kcp_update_time") {
        Some(SampleValue::Histogram(h)) => assert_eq!(h.count(), 1),
        other => panic!("unexpected sample: {:?}", other),
    }
}

/// Prefix is joined to every name with an underscore
#[test]
fn test_prefixed_names() {
    let exporter = Exporter::new(KcpMetrics::new(), "edge").unwrap();
    assert!(
        exporter
            .describe()
            .iter()
            .all(|d| d.name.starts_with("edge_"))
    );
    assert!(Exporter::new(KcpMetrics::new(), "bad prefix").is_err());
    assert!(Exporter::new(KcpMetrics::new(), "9lives").is_err());
}

/// Concurrent collections while producers run always return the full set
#[test]
fn test_concurrent_collect() {
    let metrics = KcpMetrics::new();
    let exporter = Exporter::new(metrics.clone(), "").unwrap();
    let expected = exporter.describe().len();
    let stop = Arc::new(AtomicBool::new(false));

    let producer = {
        let m = metrics.clone();
        let stop = Arc::clone(&stop);
        thread::spawn(move || {
            let mut n = 0u64;
            while !stop.load(Ordering::Relaxed) {
                m.incr(SnmpField::InSegs);
                m.observe(HistogramField::ReceiveQueueLength, (n % 64) as f64);
                n += 1;
            }
        })
    };

    let scrapers: Vec<_> = (0..4)
        .map(|_| {
            let e = exporter.clone();
            thread::spawn(move || {
                for _ in 0..200 {
                    let samples = e.collect();
                    assert_eq!(samples.len(), expected);
                    for sample in &samples {
                        if let SampleValue::Histogram(h) = &sample.value {
                            let counts = h.cumulative_counts();
                            assert!(counts.windows(2).all(|w| w[0] <= w[1]));
                            assert!(counts.last().copied().unwrap_or(0) <= h.count());
                        }
                    }
                }
            })
        })
        .collect();

    for scraper in scrapers {
        scraper.join().unwrap();
    }
    stop.store(true, Ordering::Relaxed);
    producer.join().unwrap();
}

/// Collecting never mutates producer state
#[test]
fn test_collect_is_read_only() {
    let metrics = KcpMetrics::new();
    let exporter = Exporter::new(metrics.clone(), "").unwrap();
    metrics.add(SnmpField::LostSegs, 7);

    let first = exporter.collect();
    let second = exporter.collect();
    assert_eq!(first, second);
    assert_eq!(metrics.counter(SnmpField::LostSegs), 7);
}
