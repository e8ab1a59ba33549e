//! Workload Module
//!
//! Concurrent load generator driving a shared cache from tokio tasks.
//!
//! # Tasks
//! - Worker: runs a fixed get/put/remove mix over a bounded key space

mod driver;

pub use driver::{run_workload, spawn_worker, WorkloadReport};
