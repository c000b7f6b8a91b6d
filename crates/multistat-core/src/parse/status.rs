//! `key: value` status lines.

use crate::error::ParseError;
use crate::metric::{MetricName, ParsedMetricSet};

/// Recognized status keys and the metric each maps to.
pub const STATUS_KEYS: [(&str, &str, &str); 5] = [
    ("Total Accesses", "Req", "requests"),
    ("Total kBytes", "Bytes", "bytes_sent"),
    ("CPULoad", "Cpu", "cpu_load"),
    ("BusyWorkers", "Workers", "busy_workers"),
    ("IdleWorkers", "Workers", "idle_workers"),
];

fn lookup(key: &str) -> Option<MetricName> {
    STATUS_KEYS
        .iter()
        .find(|(k, _, _)| *k == key)
        .map(|(_, category, name)| MetricName::new(*category, *name))
}

/// Parse recognized status lines into `set`.
///
/// The key is the text before the first colon, matched exactly. Unrecognized
/// lines are skipped. A recognized key whose value is not a number fails the
/// whole parse, and a document without any recognized key is malformed.
pub fn parse_status(doc: &str, set: &mut ParsedMetricSet) -> Result<(), ParseError> {
    let mut found = 0usize;

    for line in doc.split('\n') {
        let Some((key, raw)) = line.split_once(':') else {
            continue;
        };
        let Some(name) = lookup(key) else {
            continue;
        };

        let raw = raw.trim();
        let value: f64 = raw.parse().map_err(|_| ParseError::StatusValue {
            key: key.to_string(),
            value: raw.to_string(),
        })?;

        tracing::trace!(%name, value, "status line");
        set.insert(name, value);
        found += 1;
    }

    if found == 0 {
        return Err(ParseError::StatusMissing);
    }
    Ok(())
}
