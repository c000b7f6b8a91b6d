//! Top-level facade crate for multistat.
//!
//! Re-exports core types and the agent library so users can depend on a single crate.

pub mod core {
    pub use multistat_core::*;
}

pub mod agent {
    pub use multistat_agent::*;
}
