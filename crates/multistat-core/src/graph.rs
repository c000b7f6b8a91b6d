//! Graph-definition registry consumed by the monitoring agent.
//!
//! Built once at startup and never mutated. Graph keys carry a `*` in place of
//! the port so one definition covers every polled instance. The registry is
//! only read when emitting definitions and when selecting which aggregated
//! values to report; the poll pipeline itself never consults it.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::{MultistatError, Result};
use crate::parse::scoreboard::SCOREBOARD_MARKER;
use crate::parse::status::STATUS_KEYS;

/// Wildcard standing in for the port segment of a graph key.
pub const PORT_WILDCARD: &str = "*";

/// Value type hint for counters that must not be treated as floats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Uint64,
}

/// One metric line of a graph.
#[derive(Debug, Clone, Serialize)]
pub struct MetricDef {
    pub name: &'static str,
    pub label: &'static str,
    /// Report the per-minute rate instead of the raw value.
    pub diff: bool,
    pub stacked: bool,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub value_type: Option<ValueType>,
}

impl MetricDef {
    const fn gauge(name: &'static str, label: &'static str, stacked: bool) -> Self {
        Self {
            name,
            label,
            diff: false,
            stacked,
            value_type: None,
        }
    }

    const fn counter(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            diff: true,
            stacked: false,
            value_type: Some(ValueType::Uint64),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GraphDef {
    pub label: &'static str,
    pub unit: &'static str,
    pub metrics: Vec<MetricDef>,
}

/// Immutable `graph key -> GraphDef` table.
#[derive(Debug, Clone, Serialize)]
pub struct GraphRegistry {
    graphs: BTreeMap<String, GraphDef>,
}

impl GraphRegistry {
    /// Apache-style status graphs under `namespace`.
    pub fn apache2(namespace: &str) -> Self {
        let key = |category: &str| format!("{namespace}.{PORT_WILDCARD}.{category}");

        let mut graphs = BTreeMap::new();
        graphs.insert(
            key("Workers"),
            GraphDef {
                label: "Apache Workers",
                unit: "integer",
                metrics: vec![
                    MetricDef::gauge("busy_workers", "Busy Workers", true),
                    MetricDef::gauge("idle_workers", "Idle Workers", true),
                ],
            },
        );
        graphs.insert(
            key("Bytes"),
            GraphDef {
                label: "Apache Bytes",
                unit: "bytes",
                metrics: vec![MetricDef::counter("bytes_sent", "Bytes Sent")],
            },
        );
        graphs.insert(
            key("Cpu"),
            GraphDef {
                label: "Apache CPU Load",
                unit: "float",
                metrics: vec![MetricDef::gauge("cpu_load", "CPU Load", false)],
            },
        );
        graphs.insert(
            key("Req"),
            GraphDef {
                label: "Apache Requests",
                unit: "integer",
                metrics: vec![MetricDef::counter("requests", "Requests")],
            },
        );
        graphs.insert(
            key(SCOREBOARD_MARKER),
            GraphDef {
                label: "Apache Scoreboard",
                unit: "integer",
                metrics: vec![
                    MetricDef::gauge("score-_", "Waiting for connection", true),
                    MetricDef::gauge("score-S", "Starting up", true),
                    MetricDef::gauge("score-R", "Reading request", true),
                    // Published under this name; the parser emits score-W.
                    MetricDef::gauge("scpre-W", "Sending reply", true),
                    MetricDef::gauge("score-K", "Keepalive", true),
                    MetricDef::gauge("score-D", "DNS lookup", true),
                    MetricDef::gauge("score-C", "Closing connection", true),
                    MetricDef::gauge("score-L", "Logging", true),
                    MetricDef::gauge("score-G", "Gracefully finishing", true),
                    MetricDef::gauge("score-I", "Idle cleanup", true),
                    MetricDef::gauge("score-.", "Open slot", true),
                ],
            },
        );

        Self { graphs }
    }

    pub fn get(&self, key: &str) -> Option<&GraphDef> {
        self.graphs.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &GraphDef)> {
        self.graphs.iter().map(|(k, g)| (k.as_str(), g))
    }

    /// `Category.Name` of every registered metric, paired with its definition.
    pub fn metrics(&self) -> impl Iterator<Item = (String, &MetricDef)> {
        self.graphs.iter().flat_map(|(key, graph)| {
            let category = key.rsplit('.').next().unwrap_or_default().to_string();
            graph
                .metrics
                .iter()
                .map(move |m| (format!("{category}.{}", m.name), m))
        })
    }

    /// Registered metrics the parsers can never produce, as `Category.Name`.
    /// Values for these stay unreported.
    pub fn unmatched_metrics(&self) -> Vec<String> {
        self.metrics()
            .map(|(full, _)| full)
            .filter(|full| !is_emittable(full))
            .collect()
    }

    /// Definitions payload: `{"graphs": {...}}`.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| MultistatError::Internal(format!("graph definitions: {e}")))
    }
}

fn is_emittable(full: &str) -> bool {
    if STATUS_KEYS
        .iter()
        .any(|(_, category, name)| full == format!("{category}.{name}"))
    {
        return true;
    }
    full.strip_prefix(SCOREBOARD_MARKER)
        .and_then(|rest| rest.strip_prefix(".score-"))
        .is_some_and(|sym| sym.chars().count() == 1)
}
