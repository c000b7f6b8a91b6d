//! Metric model shared by the parsers and the agent.
//!
//! Names are two-part `Category.Name` identifiers. A port's parse result is a
//! `ParsedMetricSet`; once every port reported, the agent flattens them into
//! one `AggregatedMetrics` keyed `<namespace>.<port>.<Category>.<Name>`.

use std::collections::BTreeMap;
use std::fmt;

/// Two-part metric identifier, rendered as `Category.Name`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MetricName {
    category: String,
    name: String,
}

impl MetricName {
    pub fn new(category: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            name: name.into(),
        }
    }

    /// Parse a rendered `Category.Name`. Only the first dot separates, so
    /// `Scoreboard.score-.` keeps its trailing dot in the name.
    pub fn parse(s: &str) -> Option<Self> {
        let (category, name) = s.split_once('.')?;
        if category.is_empty() || name.is_empty() {
            return None;
        }
        Some(Self::new(category, name))
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.category, self.name)
    }
}

/// Metrics parsed from one port's status document. Keys are unique.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedMetricSet {
    values: BTreeMap<MetricName, f64>,
}

impl ParsedMetricSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value, replacing any earlier one for the same name.
    pub fn insert(&mut self, name: MetricName, value: f64) {
        self.values.insert(name, value);
    }

    /// Add one to a counter, starting from 0.0 if unseen.
    pub fn increment(&mut self, name: MetricName) {
        *self.values.entry(name).or_insert(0.0) += 1.0;
    }

    pub fn get(&self, name: &MetricName) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// Look up by rendered `Category.Name`.
    pub fn value(&self, key: &str) -> Option<f64> {
        MetricName::parse(key).and_then(|name| self.get(&name))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&MetricName, f64)> {
        self.values.iter().map(|(k, v)| (k, *v))
    }
}

/// All ports' metrics flattened under `<namespace>.<port>.<Category>.<Name>`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregatedMetrics {
    values: BTreeMap<String, f64>,
}

impl AggregatedMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one port's set under its namespace and port number.
    pub fn merge_port(&mut self, namespace: &str, port: u16, set: &ParsedMetricSet) {
        for (name, value) in set.iter() {
            self.values.insert(format!("{namespace}.{port}.{name}"), value);
        }
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn name_parse_keeps_dot_character() {
        let name = MetricName::parse("Scoreboard.score-.").unwrap();
        assert_eq!(name.category(), "Scoreboard");
        assert_eq!(name.name(), "score-.");
        assert_eq!(name.to_string(), "Scoreboard.score-.");
        assert!(MetricName::parse("NoDot").is_none());
    }

    #[test]
    fn merge_port_prefixes_namespace_and_port() {
        let mut set = ParsedMetricSet::new();
        set.insert(MetricName::new("Req", "requests"), 42.0);
        set.increment(MetricName::new("Scoreboard", "score-_"));

        let mut agg = AggregatedMetrics::new();
        agg.merge_port("apache2", 8080, &set);
        agg.merge_port("apache2", 8081, &set);

        assert_eq!(agg.len(), 4);
        assert_eq!(agg.get("apache2.8080.Req.requests"), Some(42.0));
        assert_eq!(agg.get("apache2.8081.Scoreboard.score-_"), Some(1.0));
    }
}
