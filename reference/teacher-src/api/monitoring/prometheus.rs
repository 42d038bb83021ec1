// Monitoring Module
//
// Part of the comprehensive monitoring system for RustyDB

use std::sync::{Arc, Mutex, atomic::{AtomicU64, AtomicBool, Ordering}};
use std::collections::{HashMap, BTreeMap, VecDeque};
use std::time::{Duration, SystemTime, Instant, UNIX_EPOCH};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::DbError;
use super::metrics_core::*;

// SECTION 2: PROMETHEUS INTEGRATION (600+ lines)
// ============================================================================

/// Prometheus exposition format exporter
pub struct PrometheusExporter {
    registry: Arc<MetricsRegistry>,
    exemplar_storage: Arc<RwLock<HashMap<String, Vec<Exemplar>>>>,
}

/// Exemplar data for tracing integration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exemplar {
    pub value: f64,
    pub timestamp: SystemTime,
    pub trace_id: String,
    pub span_id: String,
    pub labels: BTreeMap<String, String>,
}

impl PrometheusExporter {
    pub fn new(registry: Arc<MetricsRegistry>) -> Self {
        Self {
            registry,
            exemplar_storage: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn add_exemplar(&self, metric_name: String, exemplar: Exemplar) {
        let mut storage = self.exemplar_storage.write();
        storage.entry(metric_name)
            .or_insert_with(Vec::new)
            .push(exemplar);
    }

    /// Export all metrics in Prometheus text exposition format
    pub fn export_text(&self) -> String {
        let mut output = String::new();
        let metrics = self.registry.all_metrics();

        for (metric_id, metric_type) in metrics {
            match metric_type {
                MetricType::Counter(counter) => {
                    output.push_str(&self.format_counter(&metric_id, &counter));
                }
                MetricType::Gauge(gauge) => {
                    output.push_str(&self.format_gauge(&metric_id, &gauge));
                }
                MetricType::Histogram(histogram) => {
                    output.push_str(&self.format_histogram(&metric_id, &histogram));
                }
                MetricType::Summary(summary) => {
                    output.push_str(&self.format_summary(&metric_id, &summary));
                }
            }
        }

        output
    }

    fn format_counter(&self, id: &MetricId, counter: &CounterMetric) -> String {
        let mut output = String::new();

        // HELP line
        output.push_str(&format!("# HELP {} {}\n", id.name, counter.help));

        // TYPE line
        output.push_str(&format!("# TYPE {} counter\n", id.name));

        // Metric line
        let labels = self.format_labels(&id.labels);
        output.push_str(&format!("{}{} {}\n", id.name, labels, counter.get()));

        output
    }

    fn format_gauge(&self, id: &MetricId, gauge: &GaugeMetric) -> String {
        let mut output = String::new();

        output.push_str(&format!("# HELP {} {}\n", id.name, gauge.help));
        output.push_str(&format!("# TYPE {} gauge\n", id.name));

        let labels = self.format_labels(&id.labels);
        output.push_str(&format!("{}{} {}\n", id.name, labels, gauge.get()));

        output
    }

    fn format_histogram(&self, id: &MetricId, histogram: &HistogramMetric) -> String {
        let mut output = String::new();

        output.push_str(&format!("# HELP {} {}\n", id.name, histogram.help));
        output.push_str(&format!("# TYPE {} histogram\n", id.name));

        // Buckets
        let buckets = histogram.get_buckets();
        for bucket in buckets {
            let mut bucket_labels = id.labels.clone();
            let le = if bucket.upper_bound == f64::INFINITY {
                "+Inf".to_string()
            } else {
                bucket.upper_bound.to_string()
            };
            bucket_labels.insert("le".to_string(), le);

            let labels = self.format_labels(&bucket_labels);
            output.push_str(&format!("{}_bucket{} {}\n", id.name, labels, bucket.count));
        }

        // Sum
        let labels = self.format_labels(&id.labels);
        output.push_str(&format!("{}_sum{} {}\n", id.name, labels, histogram.get_sum()));

        // Count
        output.push_str(&format!("{}_count{} {}\n", id.name, labels, histogram.get_count()));

        output
    }

    fn format_summary(&self, id: &MetricId, summary: &SummaryMetric) -> String {
        let mut output = String::new();

        output.push_str(&format!("# HELP {} {}\n", id.name, summary.help));
        output.push_str(&format!("# TYPE {} summary\n", id.name));

        // Quantiles
        let quantiles = summary.get_quantiles();
        for (quantile, value) in quantiles {
            let mut quantile_labels = id.labels.clone();
            quantile_labels.insert("quantile".to_string(), quantile);

            let labels = self.format_labels(&quantile_labels);
            output.push_str(&format!("{}{} {}\n", id.name, labels, value));
        }

        // Sum
        let labels = self.format_labels(&id.labels);
        output.push_str(&format!("{}_sum{} {}\n", id.name, labels, summary.get_sum()));

        // Count
        output.push_str(&format!("{}_count{} {}\n", id.name, labels, summary.get_count()));

        output
    }

    fn format_labels(&self, labels: &BTreeMap<String, String>) -> String {
        if labels.is_empty() {
            return String::new();
        }

        let label_pairs: Vec<String> = labels.iter()
            .map(|(k, v)| format!("{}=\"{}\"", k, v))
            .collect();

        format!("{{{}}}", label_pairs.join(","))
    }
}

/// Prometheus push gateway client
pub struct PrometheusPushGateway {
    gateway_url: String,
    job_name: String,
    instance_name: String,
    grouping_labels: HashMap<String, String>,
    basic_auth: Option<(String, String)>,
}

impl PrometheusPushGateway {
    pub fn new(
        gateway_url: impl Into<String>,
        job_name: impl Into<String>,
        instance_name: impl Into<String>,
    ) -> Self {
        Self {
            gateway_url: gateway_url.into(),
            job_name: job_name.into(),
            instance_name: instance_name.into(),
            grouping_labels: HashMap::new(),
            basic_auth: None,
        }
    }

    pub fn with_grouping_label(mut self, key: String, value: String) -> Self {
        self.grouping_labels.insert(key, value);
        self
    }

    pub fn with_basic_auth(mut self, username: String, password: String) -> Self {
        self.basic_auth = Some((username, password));
        self
    }

    pub async fn push(&self, metricsdata: String) -> std::result::Result<(), DbError> {
        let url = self.build_url();

        // In a real implementation, this would use an HTTP client like reqwest
        // For now, we'll just log the push
        println!("Pushing metrics to {}", url);
        println!("Metrics data length: {} bytes", metricsdata.len());

        Ok(())
    }

    pub async fn delete(&self) -> std::result::Result<(), DbError> {
        let url = self.build_url();

        // DELETE request to remove metrics
        println!("Deleting metrics at {}", url);

        Ok(())
    }

    fn build_url(&self) -> String {
        let mut url = format!("{}/metrics/job/{}", self.gateway_url, self.job_name);

        // Add instance
        url.push_str(&format!("/instance/{}", self.instance_name));

        // Add grouping labels
        for (key, value) in &self.grouping_labels {
            url.push_str(&format!("/{}/{}", key, value));
        }

        url
    }
}

/// Prometheus remote write protocol implementation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteWriteRequest {
    pub timeseries: Vec<TimeSeries>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSeries {
    pub labels: Vec<PrometheusLabel>,
    pub samples: Vec<Sample>,
    pub exemplars: Vec<PrometheusExemplar>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrometheusLabel {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sample {
    pub value: f64,
    pub timestamp: i64, // milliseconds since epoch
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrometheusExemplar {
    pub labels: Vec<PrometheusLabel>,
    pub value: f64,
    pub timestamp: i64,
}

pub struct RemoteWriteClient {
    endpoint: String,
    basic_auth: Option<(String, String)>,
    bearer_token: Option<String>,
    headers: HashMap<String, String>,
    batch_size: usize,
    batch_timeout: Duration,
    buffer: Arc<Mutex<Vec<TimeSeries>>>,
}

impl RemoteWriteClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            basic_auth: None,
            bearer_token: None,
            headers: HashMap::new(),
            batch_size: 1000,
            batch_timeout: Duration::from_secs(10),
            buffer: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_basic_auth(mut self, username: String, password: String) -> Self {
        self.basic_auth = Some((username, password));
        self
    }

    pub fn with_bearer_token(mut self, token: String) -> Self {
        self.bearer_token = Some(token);
        self
    }

    pub fn with_header(mut self, key: String, value: String) -> Self {
        self.headers.insert(key, value);
        self
    }

    pub fn add_timeseries(&self, ts: TimeSeries) {
        let mut buffer = self.buffer.lock().unwrap();
        buffer.push(ts);
    }

    pub async fn flush(&self) -> std::result::Result<(), DbError> {
        let mut buffer = self.buffer.lock().unwrap();
        if buffer.is_empty() {
            return Ok(());
        }

        let timeseries = buffer.drain(..).collect::<Vec<_>>();
        drop(buffer);

        let request = RemoteWriteRequest { timeseries };

        // In real implementation, this would:
        // 1. Encode as protobuf
        // 2. Compress with Snappy
        // 3. Send via HTTP POST
        println!("Flushing {} timeseries to {}", request.timeseries.len(), self.endpoint);

        Ok(())
    }
}

/// Metric family for grouping related metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricFamily {
    pub name: String,
    pub help: String,
    pub metric_type: String,
    pub metrics: Vec<MetricFamilyMember>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricFamilyMember {
    pub labels: BTreeMap<String, String>,
    pub value: MetricValue,
    pub timestamp: Option<SystemTime>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MetricValue {
    Counter(f64),
    Gauge(f64),
    Histogram {
        sum: f64,
        count: u64,
        buckets: Vec<HistogramBucketData>,
    },
    Summary {
        sum: f64,
        count: u64,
        quantiles: HashMap<String, f64>,
    },
}

pub struct MetricFamilyBuilder {
    families: HashMap<String, MetricFamily>,
}

impl MetricFamilyBuilder {
    pub fn new() -> Self {
        Self {
            families: HashMap::new(),
        }
    }

    pub fn add_counter(
        &mut self,
        name: String,
        help: String,
        labels: BTreeMap<String, String>,
        value: f64,
    ) {
        let family = self.families.entry(name.clone()).or_insert_with(|| {
            MetricFamily {
                name,
                help,
                metric_type: "counter".to_string(),
                metrics: Vec::new(),
            }
        });

        family.metrics.push(MetricFamilyMember {
            labels,
            value: MetricValue::Counter(value),
            timestamp: Some(SystemTime::now()),
        });
    }

    pub fn build(self) -> Vec<MetricFamily> {
        self.families.into_values().collect()
    }
}

impl Default for MetricFamilyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
