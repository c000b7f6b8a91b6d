//! Fan-out / fan-in over all configured ports.
//!
//! Every endpoint gets its own task, all spawned up front into a `JoinSet`
//! owned by the poll call. Each task posts exactly one `PortResult` into a
//! channel sized to the number of ports, so no sender ever waits. The
//! orchestrator always drains the channel and joins every task: a failure
//! stops aggregation, not draining, and in-flight requests are never
//! cancelled. Dropping the poll future aborts the workers with it.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::Instrument;

use multistat_core::error::{MultistatError, PortError, Result};
use multistat_core::AggregatedMetrics;

use crate::fetch::{Endpoint, StatusSource};

use super::worker::{poll_port, PortResult};

pub struct Orchestrator {
    source: Arc<dyn StatusSource>,
    namespace: String,
}

impl Orchestrator {
    pub fn new(source: Arc<dyn StatusSource>, namespace: impl Into<String>) -> Self {
        Self {
            source,
            namespace: namespace.into(),
        }
    }

    /// Run one poll cycle.
    ///
    /// Returns the merged metrics of every port, or the first port error in
    /// arrival order. Partial results are never returned.
    pub async fn poll(&self, endpoints: &[Endpoint]) -> Result<AggregatedMetrics> {
        let expected = endpoints.len();
        if expected == 0 {
            return Ok(AggregatedMetrics::new());
        }

        let (tx, mut rx) = mpsc::channel::<PortResult>(expected);
        let mut workers = JoinSet::new();
        for endpoint in endpoints.iter().cloned() {
            let tx = tx.clone();
            let source = Arc::clone(&self.source);
            let span = tracing::debug_span!("port", port = endpoint.port);
            workers.spawn(
                async move {
                    let result = poll_port(source.as_ref(), &endpoint).await;
                    // Capacity equals the number of senders; this never waits.
                    let _ = tx.send(result).await;
                }
                .instrument(span),
            );
        }
        drop(tx);

        let mut failure: Option<PortError> = None;
        let mut merged = AggregatedMetrics::new();

        while let Some(result) = rx.recv().await {
            let port = result.port;
            match result.outcome {
                Err(e) if failure.is_none() => {
                    tracing::warn!(port, stage = e.stage().as_str(), error = %e, "port failed, poll cycle aborted");
                    failure = Some(e);
                }
                Err(e) => {
                    tracing::debug!(port, error = %e, "discarding later port error");
                }
                Ok(_) if failure.is_some() => {
                    tracing::debug!(port, "discarding port result after failure");
                }
                Ok(set) => merged.merge_port(&self.namespace, port, &set),
            }
        }

        let mut lost = 0usize;
        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                tracing::warn!(error = %e, "port worker exited without a result");
                lost += 1;
            }
        }

        if let Some(e) = failure {
            return Err(e.into());
        }
        if lost > 0 {
            return Err(MultistatError::Internal(format!(
                "{lost} of {expected} port workers exited without a result"
            )));
        }

        tracing::debug!(ports = expected, metrics = merged.len(), "poll cycle complete");
        Ok(merged)
    }
}
