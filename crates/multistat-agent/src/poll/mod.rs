//! Poll cycle: one worker per port, fanned in by the orchestrator.

pub mod orchestrator;
pub mod worker;

pub use orchestrator::Orchestrator;
pub use worker::{poll_port, PortResult};
