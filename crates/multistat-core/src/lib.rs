//! multistat core: runtime-free metric model, status-page parsers, and the
//! graph-definition registry.
//!
//! This crate turns the plain-text status export of one server instance into a
//! typed metric set, and defines the error surface shared with the agent. It
//! intentionally carries no transport or runtime dependencies so the parsers
//! can be exercised without a network.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Malformed status documents surface as `ParseError`, never as a crash.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod graph;
pub mod metric;
pub mod parse;

/// Shared result type.
pub use error::{MultistatError, Result};
pub use metric::{AggregatedMetrics, MetricName, ParsedMetricSet};
