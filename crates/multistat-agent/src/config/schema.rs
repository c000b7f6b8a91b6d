use std::collections::HashSet;
use std::path::PathBuf;

use multistat_core::error::{MultistatError, Result};
use serde::Deserialize;

use crate::fetch::{Endpoint, HeaderLine};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    pub version: u32,

    pub target: TargetSection,

    #[serde(default)]
    pub plugin: PluginSection,
}

impl AgentConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(MultistatError::UnsupportedVersion);
        }

        self.target.validate()?;
        self.plugin.validate()?;

        Ok(())
    }

    /// One endpoint per configured port, in configured order.
    pub fn endpoints(&self) -> Vec<Endpoint> {
        self.target
            .ports
            .iter()
            .map(|&port| {
                Endpoint::new(&self.target.host, port, &self.target.path)
                    .with_headers(self.target.headers.clone())
            })
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetSection {
    #[serde(default = "default_host")]
    pub host: String,

    pub ports: Vec<u16>,

    #[serde(default = "default_path")]
    pub path: String,

    #[serde(default)]
    pub headers: Vec<String>,
}

impl TargetSection {
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(MultistatError::Config("target.host must not be empty".into()));
        }
        if self.ports.is_empty() {
            return Err(MultistatError::Config("target.ports must not be empty".into()));
        }
        let mut seen = HashSet::new();
        for &port in &self.ports {
            if port == 0 {
                return Err(MultistatError::Config("target.ports must not contain 0".into()));
            }
            if !seen.insert(port) {
                return Err(MultistatError::Config(format!(
                    "target.ports lists {port} more than once"
                )));
            }
        }
        if !self.path.starts_with('/') {
            return Err(MultistatError::Config("target.path must start with '/'".into()));
        }
        for raw in &self.headers {
            HeaderLine::parse(raw)
                .map_err(|e| MultistatError::Config(format!("target.headers: {e}")))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PluginSection {
    #[serde(default = "default_namespace")]
    pub namespace: String,

    #[serde(default = "default_tempfile")]
    pub tempfile: PathBuf,
}

impl Default for PluginSection {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            tempfile: default_tempfile(),
        }
    }
}

impl PluginSection {
    pub fn validate(&self) -> Result<()> {
        if self.namespace.is_empty() || self.namespace.contains(['.', '*']) {
            return Err(MultistatError::Config(
                "plugin.namespace must be non-empty and contain no '.' or '*'".into(),
            ));
        }
        Ok(())
    }
}

fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_path() -> String {
    "/server-status?auto".into()
}
fn default_namespace() -> String {
    "apache2".into()
}
fn default_tempfile() -> PathBuf {
    std::env::temp_dir().join("mackerel-plugin-multistat")
}
