// src/pipeline/mod.rs

//! Scan-cycle pipeline: delta computation and monitor orchestration.

pub mod delta;
pub mod monitor;

pub use delta::SeenSet;
pub use monitor::Monitor;
