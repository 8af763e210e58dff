//! # Flowsint Orchestrator
//!
//! Executes a branch-compiled flow graph against the live enricher
//! runtime: resolves each step's real inputs from the run's edges and
//! outputs produced so far, applies the per-run step cache, and records
//! every attempt to a crash-safe execution log.

mod log;
mod orchestrator;
mod result;

pub use log::{ExecutionLog, LogStatus, StepLogEntry, Summary};
pub use orchestrator::Orchestrator;
pub use result::{BranchResult, ExecutionResult, StepResult};
