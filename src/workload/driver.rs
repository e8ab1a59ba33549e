//! Workload Driver
//!
//! Spawns tasks that hammer one shared cache with a deterministic mix of
//! operations: six gets, three puts and one remove out of every ten.

use std::sync::Arc;

use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::TtlCache;
use crate::config::Config;
use crate::error::{CacheError, Result};

/// Operations between cooperative yields.
const YIELD_EVERY: usize = 256;

// == Workload Report ==
/// Operation counts from one worker, or merged across workers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WorkloadReport {
    pub puts: u64,
    pub gets: u64,
    pub hits: u64,
    pub removes: u64,
}

impl WorkloadReport {
    /// Total operations issued.
    pub fn operations(&self) -> u64 {
        self.puts + self.gets + self.removes
    }

    /// Adds another report's counts into this one.
    pub fn merge(&mut self, other: &WorkloadReport) {
        self.puts += other.puts;
        self.gets += other.gets;
        self.hits += other.hits;
        self.removes += other.removes;
    }
}

/// Spawns one worker issuing `operations` cache calls.
///
/// Key choice depends only on `worker` and the operation index, so two runs
/// with the same configuration issue the same calls per worker.
///
/// Fails with `InvalidConfig` when `key_space` is zero.
pub fn spawn_worker(
    cache: Arc<TtlCache<String, u64>>,
    worker: usize,
    operations: usize,
    key_space: usize,
) -> Result<JoinHandle<WorkloadReport>> {
    if key_space == 0 {
        return Err(CacheError::InvalidConfig(
            "WORKLOAD_KEY_SPACE must be greater than zero".to_string(),
        ));
    }

    Ok(tokio::spawn(async move {
        let mut report = WorkloadReport::default();

        for i in 0..operations {
            let key = format!("key-{}", key_index(worker, i, key_space));
            match i % 10 {
                0..=5 => {
                    report.gets += 1;
                    if cache.get(&key).is_some() {
                        report.hits += 1;
                    }
                }
                6..=8 => {
                    report.puts += 1;
                    cache.put(key, i as u64);
                }
                _ => {
                    report.removes += 1;
                    cache.remove(&key);
                }
            }

            if (i + 1) % YIELD_EVERY == 0 {
                tokio::task::yield_now().await;
            }
        }

        debug!(worker, ?report, "worker finished");
        report
    }))
}

/// Runs `config.workers` workers to completion and merges their reports.
///
/// The configuration is validated before any worker is spawned.
pub async fn run_workload(
    cache: Arc<TtlCache<String, u64>>,
    config: &Config,
) -> Result<WorkloadReport> {
    config.validate()?;
    info!(
        "Starting workload: {} workers x {} operations over {} keys",
        config.workers, config.operations, config.key_space
    );

    let handles = (0..config.workers)
        .map(|worker| {
            spawn_worker(
                Arc::clone(&cache),
                worker,
                config.operations,
                config.key_space,
            )
        })
        .collect::<Result<Vec<_>>>()?;

    let mut total = WorkloadReport::default();
    for handle in handles {
        let report = handle
            .await
            .map_err(|e| CacheError::Internal(format!("workload worker failed: {e}")))?;
        total.merge(&report);
    }

    info!(
        "Workload finished: {} operations, {} hits",
        total.operations(),
        total.hits
    );
    Ok(total)
}

fn key_index(worker: usize, i: usize, key_space: usize) -> usize {
    worker
        .wrapping_mul(7919)
        .wrapping_add(i.wrapping_mul(104_729))
        % key_space
}
