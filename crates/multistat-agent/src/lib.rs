//! multistat agent library entry.
//!
//! This crate wires config, the HTTP status source, the per-port poll
//! pipeline, and plugin output into one agent. It is intended to be consumed
//! by the binary (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod fetch;
pub mod output;
pub mod poll;
