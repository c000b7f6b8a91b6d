//! Raw values of the previous cycle, persisted as JSON between runs.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};

use multistat_core::error::{MultistatError, Result};
use multistat_core::AggregatedMetrics;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CounterState {
    /// Unix seconds of the cycle the values were taken in.
    pub timestamp: u64,
    pub values: BTreeMap<String, f64>,
}

impl CounterState {
    pub fn new(timestamp: u64, metrics: &AggregatedMetrics) -> Self {
        Self {
            timestamp,
            values: metrics.iter().map(|(k, v)| (k.to_string(), v)).collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }

    /// Load the previous state. Missing or unreadable state means there is
    /// nothing to diff against.
    pub fn load(path: &Path) -> Option<Self> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "state file unreadable, ignoring");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(state) => Some(state),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "state file corrupt, ignoring");
                None
            }
        }
    }

    /// Write via a sibling file and rename, so readers never see a partial file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let body = serde_json::to_vec(self)
            .map_err(|e| MultistatError::State(format!("encode failed: {e}")))?;

        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        fs::write(&tmp, body)
            .map_err(|e| MultistatError::State(format!("write {} failed: {e}", path.display())))?;
        fs::rename(&tmp, path)
            .map_err(|e| MultistatError::State(format!("rename to {} failed: {e}", path.display())))
    }
}
