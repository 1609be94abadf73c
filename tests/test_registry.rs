//! Tests for registry registration and text exposition

use kcp_metrics::{
    Exporter, HistogramField, KcpMetrics, MetricsConfig, MetricsError, MetricsRegistry,
    SnmpField,
};

/// Installed metrics show up in the text exposition
#[test]
fn test_install_and_encode() {
    let registry = MetricsRegistry::new();
    let metrics = kcp_metrics::install(&registry, &MetricsConfig::default()).unwrap();

    metrics.add(SnmpField::InPkts, 5);
    metrics.set_active_sessions(2);
    metrics.observe(HistogramField::UpdateTime, 0.5);

    let text = registry.encode_text().unwrap();
    assert!(text.contains("# TYPE kcp_snmp_in_pkts counter"));
    assert!(text.contains("kcp_snmp_in_pkts 5\n"));
    assert!(text.contains("# TYPE kcp_active_count gauge"));
    assert!(text.contains("kcp_active_count 2\n"));
    assert!(text.contains("# TYPE kcp_update_time histogram"));
    assert!(text.contains("kcp_update_time_bucket{le=\"1\"} 1"));
    assert!(text.contains("kcp_update_time_bucket{le=\"+Inf\"} 1"));
    assert!(text.contains("kcp_update_time_count 1"));
}

/// Every described metric appears in a gather
#[test]
fn test_gather_is_complete() {
    let registry = MetricsRegistry::new();
    let exporter = Exporter::new(KcpMetrics::new(), "").unwrap();
    registry.register(&exporter).unwrap();

    let families = registry.gather();
    assert_eq!(families.len(), exporter.describe().len());
    for descriptor in exporter.describe() {
        assert!(
            families.iter().any(|f| f.get_name() == descriptor.name),
            "missing {}",
            descriptor.name
        );
    }
}

/// Registering the same names twice is rejected
#[test]
fn test_duplicate_install_fails() {
    let registry = MetricsRegistry::new();
    kcp_metrics::install(&registry, &MetricsConfig::default()).unwrap();

    let err = kcp_metrics::install(&registry, &MetricsConfig::default()).unwrap_err();
    assert!(matches!(err, MetricsError::Registration(_)));
    assert_eq!(registry.len(), 1);
}

/// Distinct prefixes let several instances share one registry
#[test]
fn test_prefixed_instances_coexist() {
    let registry = MetricsRegistry::new();
    let a = KcpMetrics::new();
    let b = KcpMetrics::new();
    registry.register(&Exporter::new(a.clone(), "a").unwrap()).unwrap();
    registry.register(&Exporter::new(b.clone(), "b").unwrap()).unwrap();

    a.add(SnmpField::OutPkts, 1);
    b.add(SnmpField::OutPkts, 2);

    let text = registry.encode_text().unwrap();
    assert!(text.contains("a_kcp_snmp_out_pkts 1\n"));
    assert!(text.contains("b_kcp_snmp_out_pkts 2\n"));
}

/// Registry clones share the same collectors
#[test]
fn test_clone_shares_state() {
    let registry = MetricsRegistry::new();
    let clone = registry.clone();
    kcp_metrics::install(&registry, &MetricsConfig::default()).unwrap();

    assert_eq!(clone.len(), 1);
    assert!(!clone.gather().is_empty());
}

/// Text content type matches the exposition format
#[test]
fn test_content_type() {
    let registry = MetricsRegistry::new();
    assert!(registry.content_type().starts_with("text/plain"));
}
