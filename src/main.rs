//! ZooKeeper Metrics Bridge
//!
//! Manual-test entry point: registers the gauge catalog against the
//! configured ZooKeeper node, samples every gauge once, and prints the
//! results. Exits 0 even when the target is down - every gauge reads 0,
//! which is exactly what the monitoring host would see.

use std::collections::BTreeMap;
use std::time::Duration;

use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use zkbridge::{CacheConfig, GangliaBridge};

// =============================================================================
// CLI Arguments
// =============================================================================

/// ZooKeeper metrics bridge - republishes mntr statistics as gauges
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// ZooKeeper host
    #[arg(long, env = "ZK_HOST", default_value = "localhost")]
    host: String,

    /// ZooKeeper client port
    #[arg(long, env = "ZK_PORT", default_value = "2181")]
    port: u16,

    /// Per-fetch timeout in seconds
    #[arg(long, env = "ZK_TIMEOUT_SECONDS", default_value = "5")]
    timeout_seconds: u64,

    /// Minimum seconds between refresh attempts
    #[arg(long, env = "ZK_REFRESH_INTERVAL_SECONDS", default_value = "20")]
    refresh_interval_seconds: u64,

    /// Print samples as a single JSON object
    #[arg(long)]
    json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long, env = "LOG_JSON")]
    log_json: bool,
}

// =============================================================================
// Main
// =============================================================================

#[tokio::main]
async fn main() {
    let args = Args::parse();

    init_logging(&args);

    info!("Starting ZooKeeper metrics bridge");
    info!("  Target: {}:{}", args.host, args.port);
    info!("  Fetch timeout: {}s", args.timeout_seconds);
    info!("  Refresh interval: {}s", args.refresh_interval_seconds);

    let config = CacheConfig {
        host: args.host,
        port: args.port,
        timeout: Duration::from_secs(args.timeout_seconds),
        refresh_interval: Duration::from_secs(args.refresh_interval_seconds),
    };

    let bridge = GangliaBridge::new(config);

    let mut samples = BTreeMap::new();
    for descriptor in bridge.descriptors() {
        samples.insert(descriptor.name, bridge.sample(descriptor.name).await);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&samples).unwrap());
    } else {
        for (name, value) in &samples {
            println!("{}={}", name, value);
        }
    }
}

// =============================================================================
// Logging Setup
// =============================================================================

fn init_logging(args: &Args) {
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if args.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true))
            .init();
    }
}
