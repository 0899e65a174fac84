//! Stats Cache - time-gated snapshot refresh
//!
//! Wraps [`StatusClient`] with a minimum refresh interval so that a
//! monitoring host polling every gauge in quick succession costs one
//! network round-trip per interval, not one per gauge.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};

use crate::error::Result;
use crate::stats::client::StatusClient;
use crate::stats::snapshot::{MetricValue, StatsSnapshot};

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for the stats cache
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// ZooKeeper host
    pub host: String,

    /// ZooKeeper client port (the status commands share it)
    pub port: u16,

    /// Per-fetch timeout
    pub timeout: Duration,

    /// Minimum time between refresh attempts
    pub refresh_interval: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 2181,
            timeout: Duration::from_secs(5),
            refresh_interval: Duration::from_secs(20),
        }
    }
}

// =============================================================================
// Cache State
// =============================================================================

/// Mutable state behind the refresh mutex. The snapshot is replaced
/// wholesale on every refresh outcome; `refreshed_at` advances on every
/// attempt, success or failure, so a dead target is probed once per
/// interval rather than once per gauge read.
#[derive(Debug, Default)]
struct CacheState {
    snapshot: StatsSnapshot,
    refreshed_at: Option<Instant>,
}

impl CacheState {
    fn is_stale(&self, interval: Duration) -> bool {
        self.refreshed_at.map_or(true, |at| at.elapsed() >= interval)
    }
}

// =============================================================================
// Stats Cache
// =============================================================================

/// Serves metric values from a periodically refreshed `mntr` snapshot.
pub struct StatsCache {
    config: CacheConfig,
    client: StatusClient,
    state: Mutex<CacheState>,
    healthy: RwLock<bool>,
}

impl StatsCache {
    /// Create a new stats cache for the configured target. The first
    /// [`value_of`](Self::value_of) call performs the first fetch.
    pub fn new(config: CacheConfig) -> Arc<Self> {
        let client = StatusClient::new(&config.host, config.port, config.timeout);

        Arc::new(Self {
            config,
            client,
            state: Mutex::new(CacheState::default()),
            healthy: RwLock::new(true),
        })
    }

    /// Look up one metric, refreshing the snapshot first when it is stale.
    ///
    /// A failed refresh is logged, marks the cache unhealthy, and discards
    /// the previous snapshot: every gauge then reads 0 until the target
    /// answers again, rather than reporting outdated numbers as current.
    /// Absent names also read 0, which covers both "never fetched" and
    /// "server doesn't report this counter".
    #[instrument(skip(self))]
    pub async fn value_of(&self, name: &str) -> MetricValue {
        let mut state = self.state.lock().await;

        if state.is_stale(self.config.refresh_interval) {
            state.refreshed_at = Some(Instant::now());

            match self.refresh().await {
                Ok(snapshot) => {
                    debug!(entries = snapshot.len(), "refreshed stats snapshot");
                    *self.healthy.write() = true;
                    state.snapshot = snapshot;
                }
                Err(e) => {
                    warn!("stats refresh failed: {}", e);
                    *self.healthy.write() = false;
                    state.snapshot = StatsSnapshot::default();
                }
            }
        }

        state
            .snapshot
            .get(name)
            .cloned()
            .unwrap_or(MetricValue::Int(0))
    }

    /// True after a successful refresh, false after a failed one.
    /// Optimistically true before the first attempt.
    pub fn is_healthy(&self) -> bool {
        *self.healthy.read()
    }

    /// Target address in `host:port` form.
    pub fn address(&self) -> &str {
        self.client.address()
    }

    async fn refresh(&self) -> Result<StatsSnapshot> {
        let raw = self.client.fetch().await?;
        Ok(StatsSnapshot::parse(&raw))
    }
}

impl std::fmt::Debug for StatsCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatsCache")
            .field("addr", &self.client.address())
            .field("refresh_interval", &self.config.refresh_interval)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // CacheConfig Tests
    // =========================================================================

    #[test]
    fn test_cache_config_default() {
        let config = CacheConfig::default();

        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 2181);
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.refresh_interval, Duration::from_secs(20));
    }

    #[test]
    fn test_cache_config_custom() {
        let config = CacheConfig {
            host: "zk1.internal".to_string(),
            port: 2182,
            timeout: Duration::from_secs(1),
            refresh_interval: Duration::from_secs(60),
        };

        assert_eq!(config.host, "zk1.internal");
        assert_eq!(config.port, 2182);
        assert_eq!(config.timeout, Duration::from_secs(1));
        assert_eq!(config.refresh_interval, Duration::from_secs(60));
    }

    // =========================================================================
    // CacheState Tests
    // =========================================================================

    #[test]
    fn test_state_stale_before_first_attempt() {
        let state = CacheState::default();

        assert!(state.is_stale(Duration::from_secs(20)));
    }

    #[test]
    fn test_state_fresh_within_interval() {
        let state = CacheState {
            snapshot: StatsSnapshot::default(),
            refreshed_at: Some(Instant::now()),
        };

        assert!(!state.is_stale(Duration::from_secs(20)));
    }

    #[test]
    fn test_state_stale_after_interval() {
        let state = CacheState {
            snapshot: StatsSnapshot::default(),
            refreshed_at: Some(Instant::now() - Duration::from_secs(30)),
        };

        assert!(state.is_stale(Duration::from_secs(20)));
    }

    // =========================================================================
    // StatsCache Creation Tests
    // =========================================================================

    #[test]
    fn test_cache_new() {
        let cache = StatsCache::new(CacheConfig::default());

        assert_eq!(cache.address(), "localhost:2181");
        // Optimistic before the first attempt
        assert!(cache.is_healthy());
    }

    #[test]
    fn test_cache_debug_omits_state() {
        let cache = StatsCache::new(CacheConfig::default());

        let repr = format!("{:?}", cache);
        assert!(repr.contains("StatsCache"));
        assert!(repr.contains("localhost:2181"));
    }
}
