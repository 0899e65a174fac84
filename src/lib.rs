//! zkbridge - ZooKeeper Metrics Bridge
//!
//! Polls a running ZooKeeper node for its internal runtime statistics (the
//! `mntr` four-letter command) and republishes them as named numeric gauges
//! to a Ganglia-style monitoring host.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐  mntr   ┌──────────────┐  snapshot  ┌────────────┐
//! │  ZooKeeper │────────▶│ StatusClient │───────────▶│ StatsCache │
//! │ (TCP 2181) │         │   + parser   │            │ (time gate)│
//! └────────────┘         └──────────────┘            └─────┬──────┘
//!                                                          │ value_of
//!                                                    ┌─────▼────────┐
//!                                                    │ GangliaBridge│
//!                                                    │  (callbacks) │
//!                                                    └──────────────┘
//! ```
//!
//! One fetch per refresh interval amortizes the network round-trip across
//! every gauge the host polls in a cycle. A target outage never surfaces to
//! the host: failures are logged and every gauge reads 0 until the next
//! successful fetch.
//!
//! # Modules
//!
//! - [`bridge`] - Host integration surface (metric catalog, sampling callback)
//! - [`error`] - Error types
//! - [`stats`] - Status protocol client, reply parser, time-gated cache

pub mod bridge;
pub mod error;
pub mod stats;

// Re-export commonly used types
pub use bridge::{descriptor, descriptors, GangliaBridge, MetricDescriptor, MetricSource, Slope};
pub use error::{Error, Result};
pub use stats::{CacheConfig, MetricValue, StatsCache, StatsSnapshot, StatusClient};
