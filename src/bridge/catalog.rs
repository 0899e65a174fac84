//! Metric Catalog
//!
//! The fixed set of ZooKeeper gauges this bridge republishes, with the
//! descriptor fields the monitoring host needs at registration time.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::Serialize;

/// How a gauge's value moves over time. Monotonic counters register with
/// `Positive` so the host can derive rates; everything else is `Both`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Slope {
    Both,
    Positive,
}

/// Static, process-lifetime description of one republished gauge.
#[derive(Debug, Clone, Serialize)]
pub struct MetricDescriptor {
    /// Metric name as reported by `mntr`
    pub name: &'static str,

    /// Unit label shown by the monitoring host
    pub units: &'static str,

    /// Counter slope hint
    pub slope: Slope,

    /// Seconds after which the host considers a sample stale
    pub time_max: u32,

    /// Printf-style display format
    pub format: &'static str,

    /// Metric group the gauges register under
    pub group: &'static str,
}

/// Staleness threshold shared by every descriptor.
const TIME_MAX_SECONDS: u32 = 90;

const fn gauge(name: &'static str, units: &'static str) -> MetricDescriptor {
    MetricDescriptor {
        name,
        units,
        slope: Slope::Both,
        time_max: TIME_MAX_SECONDS,
        format: "%d",
        group: "zookeeper",
    }
}

const fn counter(name: &'static str, units: &'static str) -> MetricDescriptor {
    MetricDescriptor {
        name,
        units,
        slope: Slope::Positive,
        time_max: TIME_MAX_SECONDS,
        format: "%d",
        group: "zookeeper",
    }
}

/// Every gauge the bridge republishes.
pub static DESCRIPTORS: &[MetricDescriptor] = &[
    gauge("zk_avg_latency", "ms"),
    gauge("zk_max_latency", "ms"),
    gauge("zk_min_latency", "ms"),
    counter("zk_packets_received", "packets"),
    counter("zk_packets_sent", "packets"),
    gauge("zk_outstanding_requests", "connections"),
    gauge("zk_znode_count", "znodes"),
    gauge("zk_watch_count", "watches"),
    gauge("zk_ephemerals_count", "znodes"),
    gauge("zk_approximate_data_size", "bytes"),
    gauge("zk_open_file_descriptor_count", "descriptors"),
    gauge("zk_max_file_descriptor_count", "descriptors"),
    gauge("zk_followers", "nodes"),
    gauge("zk_synced_followers", "nodes"),
    gauge("zk_pending_syncs", "syncs"),
];

static BY_NAME: Lazy<HashMap<&'static str, &'static MetricDescriptor>> =
    Lazy::new(|| DESCRIPTORS.iter().map(|d| (d.name, d)).collect());

/// The registration table, in declaration order.
pub fn descriptors() -> &'static [MetricDescriptor] {
    DESCRIPTORS
}

/// Look up one descriptor by metric name.
pub fn descriptor(name: &str) -> Option<&'static MetricDescriptor> {
    BY_NAME.get(name).copied()
}
