//! Scoreboard histogram line.

use crate::error::ParseError;
use crate::metric::{MetricName, ParsedMetricSet};

/// Substring identifying the scoreboard line.
pub const SCOREBOARD_MARKER: &str = "Scoreboard";

/// Count each character of the first scoreboard line into `set` as
/// `Scoreboard.score-<c>`.
///
/// Later lines containing the marker are ignored. Every character gets its
/// own bucket; no symbol set is enforced. A marker line without a colon has
/// an empty histogram.
pub fn parse_scoreboard(doc: &str, set: &mut ParsedMetricSet) -> Result<(), ParseError> {
    let line = doc
        .split('\n')
        .find(|line| line.contains(SCOREBOARD_MARKER))
        .ok_or(ParseError::ScoreboardMissing)?;

    let slots = line.split_once(':').map(|(_, rhs)| rhs.trim()).unwrap_or("");
    for c in slots.chars() {
        set.increment(MetricName::new("Scoreboard", format!("score-{c}")));
    }

    tracing::trace!(slots = slots.chars().count(), "scoreboard line");
    Ok(())
}
