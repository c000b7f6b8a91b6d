//! multistat agent
//!
//! Polls every configured status port once and prints the merged metrics in
//! the monitoring agent's plugin format:
//! - config: first argument, else `$MULTISTAT_CONFIG`, else `multistat.yaml`
//! - definitions instead of values when `MACKEREL_AGENT_PLUGIN_META` is set
//! - logs go to stderr; stdout is reserved for the plugin protocol

use std::io::{self, Write};
use std::process::ExitCode;

use tracing_subscriber::{fmt, EnvFilter};

use multistat_agent::{app_state::AppState, config, output};
use multistat_core::{MultistatError, Result};

const DEFAULT_CONFIG: &str = "multistat.yaml";

#[tokio::main]
async fn main() -> ExitCode {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, port = ?e.port(), "poll failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("MULTISTAT_CONFIG").ok())
        .unwrap_or_else(|| DEFAULT_CONFIG.to_string());

    let cfg = config::load_from_file(&path)?;
    let state = AppState::new(cfg)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if output::meta_requested() {
        state.output_definitions(&mut out)?;
    } else {
        tracing::debug!(ports = state.endpoints().len(), config = %path, "polling");
        state.output_values(&mut out).await?;
    }
    out.flush()
        .map_err(|e| MultistatError::Internal(format!("flush stdout failed: {e}")))
}
