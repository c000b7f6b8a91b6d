use std::time::Instant;

use multistat_core::error::PortError;
use multistat_core::parse::parse_document;
use multistat_core::ParsedMetricSet;

use crate::fetch::{Endpoint, StatusSource};

/// Outcome of one port's worker. Exactly one per configured port per cycle.
#[derive(Debug)]
pub struct PortResult {
    pub port: u16,
    pub outcome: Result<ParsedMetricSet, PortError>,
}

impl PortResult {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Fetch, then parse status lines, then the scoreboard. The first failing
/// step ends the worker.
pub async fn poll_port<S>(source: &S, endpoint: &Endpoint) -> PortResult
where
    S: StatusSource + ?Sized,
{
    let port = endpoint.port;
    let started = Instant::now();
    let outcome = run(source, endpoint).await;

    let elapsed_ms = started.elapsed().as_millis() as u64;
    match &outcome {
        Ok(set) => tracing::debug!(port, metrics = set.len(), elapsed_ms, "port polled"),
        Err(e) => tracing::debug!(port, stage = e.stage().as_str(), elapsed_ms, error = %e, "port failed"),
    }

    PortResult { port, outcome }
}

async fn run<S>(source: &S, endpoint: &Endpoint) -> Result<ParsedMetricSet, PortError>
where
    S: StatusSource + ?Sized,
{
    let port = endpoint.port;
    let doc = source
        .fetch(endpoint)
        .await
        .map_err(|e| PortError::new(port, e))?;

    parse_document(doc.as_str()).map_err(|e| PortError::new(port, e))
}
