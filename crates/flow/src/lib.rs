//! # Flowsint Flow
//!
//! The Branch Compiler: turns a user-authored flow graph
//! plus one seed value into an ordered list of linear execution branches,
//! handling cycles and ranking branches by shortest path to completion.

mod compiler;
mod distance;
mod graph;

pub use compiler::{EnricherSchema, compile};
pub use graph::{Branch, FlowEdge, FlowNode, Step, StepKind, StepStatus};
