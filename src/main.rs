//! ttl_lru - Workload driver
//!
//! Runs a concurrent get/put/remove workload against one shared cache and
//! prints a JSON summary of the run.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ttl_lru::{run_workload, Config, TtlCache};

/// Main entry point for the workload driver.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load and validate configuration from environment variables
/// 3. Create the cache with a counting eviction callback
/// 4. Run the workload, stopping early on Ctrl+C
/// 5. Print worker totals and cache statistics as JSON
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ttl_lru=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    config.validate()?;
    info!(
        "Configuration loaded: capacity={}, ttl={}ms, workers={}, operations={}, key_space={}",
        config.capacity, config.ttl_ms, config.workers, config.operations, config.key_space
    );

    let callbacks = Arc::new(AtomicU64::new(0));
    let counter = Arc::clone(&callbacks);
    let cache = Arc::new(TtlCache::from_config(&config, move |_value: u64| {
        counter.fetch_add(1, Ordering::Relaxed);
    })?);

    let started = Instant::now();
    let report = tokio::select! {
        report = run_workload(Arc::clone(&cache), &config) => report?,
        _ = signal::ctrl_c() => {
            warn!("Received Ctrl+C, abandoning workload");
            return Ok(());
        }
    };
    let elapsed = started.elapsed();

    info!(
        "Workload complete in {:?} ({:.0} ops/s)",
        elapsed,
        report.operations() as f64 / elapsed.as_secs_f64().max(f64::EPSILON)
    );

    let summary = serde_json::json!({
        "workload": report,
        "cache": cache.stats(),
        "hit_rate": cache.stats().hit_rate(),
        "callback_invocations": callbacks.load(Ordering::Relaxed),
        "elapsed_ms": elapsed.as_millis() as u64,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
