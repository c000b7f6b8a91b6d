//! Shared state for one agent invocation.
//!
//! - Endpoints and the graph registry are built once from config and never
//!   mutated afterwards.
//! - Startup errors are explicit (Result instead of panic).

use std::io::Write;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use multistat_core::error::{MultistatError, Result};
use multistat_core::graph::GraphRegistry;

use crate::config::AgentConfig;
use crate::fetch::{Endpoint, HttpFetcher, StatusSource};
use crate::output::{render_definitions, render_values, CounterState};
use crate::poll::Orchestrator;

const FAIL_FAST_ON_MISMATCH: bool = false; // if changed to true, boot fails.

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    orchestrator: Arc<Orchestrator>,
}

struct AppStateInner {
    cfg: AgentConfig,
    endpoints: Vec<Endpoint>,
    registry: GraphRegistry,
}

impl AppState {
    /// Build state polling over HTTP.
    pub fn new(cfg: AgentConfig) -> Result<Self> {
        let fetcher = HttpFetcher::new()?;
        Self::with_source(cfg, Arc::new(fetcher))
    }

    /// Build state over an arbitrary status source.
    pub fn with_source(cfg: AgentConfig, source: Arc<dyn StatusSource>) -> Result<Self> {
        let registry = GraphRegistry::apache2(&cfg.plugin.namespace);

        // registry <-> parser vocabulary sanity check
        for name in registry.unmatched_metrics() {
            tracing::warn!(metric = %name, "graph definition names a metric the parsers never emit");
            if FAIL_FAST_ON_MISMATCH {
                return Err(MultistatError::Config(format!(
                    "graph definition references unknown metric: {name}"
                )));
            }
        }

        let endpoints = cfg.endpoints();
        let orchestrator = Orchestrator::new(source, cfg.plugin.namespace.clone());

        Ok(Self {
            inner: Arc::new(AppStateInner {
                cfg,
                endpoints,
                registry,
            }),
            orchestrator: Arc::new(orchestrator),
        })
    }

    pub fn cfg(&self) -> &AgentConfig {
        &self.inner.cfg
    }

    pub fn endpoints(&self) -> &[Endpoint] {
        &self.inner.endpoints
    }

    pub fn registry(&self) -> &GraphRegistry {
        &self.inner.registry
    }

    /// Print graph definitions.
    pub fn output_definitions(&self, out: &mut impl Write) -> Result<()> {
        let body = render_definitions(self.registry())?;
        out.write_all(body.as_bytes())
            .map_err(|e| MultistatError::Internal(format!("write definitions failed: {e}")))
    }

    /// Poll every port once and print the values. Nothing is printed if any
    /// port fails.
    pub async fn output_values(&self, out: &mut impl Write) -> Result<()> {
        let metrics = self.orchestrator.poll(self.endpoints()).await?;
        let now = unix_now()?;

        let tempfile = &self.cfg().plugin.tempfile;
        let previous = CounterState::load(tempfile);
        let body = render_values(self.registry(), &metrics, previous.as_ref(), now);

        if let Err(e) = CounterState::new(now, &metrics).save(tempfile) {
            tracing::warn!(error = %e, "counter state not saved; next cycle has no diff baseline");
        }

        out.write_all(body.as_bytes())
            .map_err(|e| MultistatError::Internal(format!("write values failed: {e}")))
    }
}

fn unix_now() -> Result<u64> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .map_err(|e| MultistatError::Internal(format!("system clock before epoch: {e}")))
}
