//! # Flowsint Tasks
//!
//! The Task Runtime: accepts enricher and flow submissions, tracks each as
//! a [`Scan`] row, and bounds concurrent execution with a worker-pool-sized
//! semaphore.

mod config;
mod runtime;
mod scan;

pub use config::TaskRuntimeConfig;
pub use runtime::TaskRuntime;
pub use scan::{Scan, ScanStatus};
