//! Host Integration Surface
//!
//! What the monitoring host sees: a registration call returning the metric
//! catalog and a per-metric numeric callback. The callback never fails and
//! never blocks longer than one fetch timeout; an unreachable target reads
//! as 0 on every gauge.

mod catalog;

pub use catalog::{descriptor, descriptors, MetricDescriptor, Slope, DESCRIPTORS};

use std::sync::Arc;

use async_trait::async_trait;

use crate::stats::{CacheConfig, MetricValue, StatsCache};

// =============================================================================
// Port
// =============================================================================

/// Source of metric values, implemented by [`StatsCache`]. The bridge
/// depends on this seam so hosts and tests can substitute their own source.
#[async_trait]
pub trait MetricSource: Send + Sync {
    /// Current value for `name`; `Int(0)` when unknown.
    async fn value_of(&self, name: &str) -> MetricValue;
}

#[async_trait]
impl MetricSource for StatsCache {
    async fn value_of(&self, name: &str) -> MetricValue {
        StatsCache::value_of(self, name).await
    }
}

// =============================================================================
// Bridge
// =============================================================================

/// Ganglia-facing bridge: registration table plus the per-metric sampling
/// callback the host's polling loop invokes.
pub struct GangliaBridge {
    source: Arc<dyn MetricSource>,
}

impl GangliaBridge {
    /// Create a bridge polling the target described by `config`.
    pub fn new(config: CacheConfig) -> Self {
        Self {
            source: StatsCache::new(config),
        }
    }

    /// Create a bridge over an arbitrary metric source.
    pub fn with_source(source: Arc<dyn MetricSource>) -> Self {
        Self { source }
    }

    /// The registration call: every gauge this bridge republishes.
    pub fn descriptors(&self) -> &'static [MetricDescriptor] {
        catalog::descriptors()
    }

    /// The per-metric callback. Every cataloged gauge is declared numeric,
    /// so textual and absent values report 0.
    pub async fn sample(&self, name: &str) -> i64 {
        self.source.value_of(name).await.as_i64().unwrap_or(0)
    }
}

impl std::fmt::Debug for GangliaBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GangliaBridge").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedSource;

    #[async_trait]
    impl MetricSource for FixedSource {
        async fn value_of(&self, name: &str) -> MetricValue {
            match name {
                "zk_znode_count" => MetricValue::Int(29),
                "zk_server_state" => MetricValue::Text("leader".into()),
                _ => MetricValue::Int(0),
            }
        }
    }

    #[tokio::test]
    async fn test_sample_passes_numeric_values_through() {
        let bridge = GangliaBridge::with_source(Arc::new(FixedSource));

        assert_eq!(bridge.sample("zk_znode_count").await, 29);
    }

    #[tokio::test]
    async fn test_sample_reports_zero_for_text_values() {
        let bridge = GangliaBridge::with_source(Arc::new(FixedSource));

        assert_eq!(bridge.sample("zk_server_state").await, 0);
    }

    #[tokio::test]
    async fn test_sample_reports_zero_for_unknown_names() {
        let bridge = GangliaBridge::with_source(Arc::new(FixedSource));

        assert_eq!(bridge.sample("zk_missing").await, 0);
    }

    #[test]
    fn test_bridge_registers_full_catalog() {
        let bridge = GangliaBridge::with_source(Arc::new(FixedSource));

        assert_eq!(bridge.descriptors().len(), 15);
    }
}
