//! Stats acquisition and caching
//!
//! Talks the `mntr` four-letter protocol to a ZooKeeper status port and
//! caches the parsed report behind a minimum refresh interval.

mod cache;
mod client;
mod snapshot;

pub use cache::{CacheConfig, StatsCache};
pub use client::StatusClient;
pub use snapshot::{MetricValue, StatsSnapshot};
