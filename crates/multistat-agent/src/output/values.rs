//! Value lines for one cycle.
//!
//! The registry decides what gets reported: each graph metric is matched
//! against the aggregated keys, with the graph's `*` standing for exactly one
//! dot-free segment (the port). Aggregated keys no graph describes are not
//! printed.

use std::fmt::Write;

use multistat_core::graph::{GraphRegistry, MetricDef, PORT_WILDCARD};
use multistat_core::AggregatedMetrics;

use super::state::CounterState;

/// Previous values older than this are not diffed against.
pub const MAX_DIFF_INTERVAL_SECS: u64 = 600;

/// Match `key` against a pattern that may hold one wildcard segment.
fn matches(pattern: &str, key: &str) -> bool {
    let Some((prefix, suffix)) = pattern.split_once(PORT_WILDCARD) else {
        return pattern == key;
    };
    key.strip_prefix(prefix)
        .and_then(|rest| rest.strip_suffix(suffix))
        .is_some_and(|segment| !segment.is_empty() && !segment.contains('.'))
}

/// Per-minute rate between two samples of a counter.
fn per_minute(current: f64, previous: f64, elapsed_secs: u64) -> Option<f64> {
    if elapsed_secs == 0 || elapsed_secs > MAX_DIFF_INTERVAL_SECS {
        return None;
    }
    let delta = current - previous;
    if delta < 0.0 {
        // counter reset (restarted instance)
        return None;
    }
    Some(delta * 60.0 / elapsed_secs as f64)
}

fn reported_value(
    metric: &MetricDef,
    key: &str,
    current: f64,
    previous: Option<&CounterState>,
    now: u64,
) -> Option<f64> {
    if !metric.diff {
        return Some(current);
    }
    let prev = previous?;
    let last = prev.get(key)?;
    per_minute(current, last, now.saturating_sub(prev.timestamp))
}

/// Render `<key>\t<value>\t<now>` lines, ordered by graph, metric, then key.
pub fn render_values(
    registry: &GraphRegistry,
    current: &AggregatedMetrics,
    previous: Option<&CounterState>,
    now: u64,
) -> String {
    let mut out = String::new();
    for (graph_key, graph) in registry.iter() {
        for metric in &graph.metrics {
            let pattern = format!("{graph_key}.{}", metric.name);
            for (key, value) in current.iter().filter(|(key, _)| matches(&pattern, key)) {
                match reported_value(metric, key, value, previous, now) {
                    Some(v) => {
                        let _ = writeln!(out, "{key}\t{v:.6}\t{now}");
                    }
                    None => tracing::debug!(key, "no diff baseline, skipped"),
                }
            }
        }
    }
    out
}
