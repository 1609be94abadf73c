//! Prometheus wire representation of collected samples

use super::{Exporter, MetricKind, MetricSample, SampleValue};
use prometheus::core::{Collector, Desc};
use prometheus::proto::{self, MetricFamily, MetricType};
use tracing::debug;

impl Collector for Exporter {
    fn desc(&self) -> Vec<&Desc> {
        self.descs().iter().collect()
    }

    fn collect(&self) -> Vec<MetricFamily> {
        let samples = Exporter::collect(self);
        debug!(metrics = samples.len(), "collected kcp metrics");
        samples.iter().map(to_metric_family).collect()
    }
}

fn metric_type(kind: MetricKind) -> MetricType {
    match kind {
        MetricKind::Counter => MetricType::COUNTER,
        MetricKind::Gauge => MetricType::GAUGE,
        MetricKind::Histogram => MetricType::HISTOGRAM,
    }
}

/// Convert one sample into a single-metric family
///
/// Counter values become `f64` as the text format requires; precision loss only
/// starts past 2^53.
pub(crate) fn to_metric_family(sample: &MetricSample) -> MetricFamily {
    let mut metric = proto::Metric::default();
    match &sample.value {
        SampleValue::Counter(value) => {
            let mut counter = proto::Counter::default();
            counter.set_value(*value as f64);
            metric.set_counter(counter);
        }
        SampleValue::Gauge(value) => {
            let mut gauge = proto::Gauge::default();
            gauge.set_value(*value as f64);
            metric.set_gauge(gauge);
        }
        SampleValue::Histogram(snapshot) => {
            let buckets: Vec<proto::Bucket> = snapshot
                .buckets()
                .map(|(upper_bound, cumulative)| {
                    let mut bucket = proto::Bucket::default();
                    bucket.set_upper_bound(upper_bound);
                    bucket.set_cumulative_count(cumulative);
                    bucket
                })
                .collect();
            let mut histogram = proto::Histogram::default();
            histogram.set_sample_count(snapshot.count());
            histogram.set_sample_sum(snapshot.sum());
            histogram.set_bucket(buckets.into());
            metric.set_histogram(histogram);
        }
    }

    let mut family = MetricFamily::default();
    family.set_name(sample.name.clone());
    family.set_help(sample.help.to_string());
    family.set_field_type(metric_type(sample.kind()));
    family.set_metric(vec![metric].into());
    family
}
