//! Status-page parsers.
//!
//! The export is line-oriented text. Two passes read the same document:
//! - `status`: `key: value` counters from a fixed vocabulary.
//! - `scoreboard`: one histogram line, one bucket per distinct character.
//!
//! Both write into the same per-port `ParsedMetricSet`. Neither parser
//! indexes into split results; a malformed document is a `ParseError`.

pub mod scoreboard;
pub mod status;

pub use scoreboard::parse_scoreboard;
pub use status::parse_status;

use crate::error::ParseError;
use crate::metric::ParsedMetricSet;

/// Run both parsers over one document, status lines first.
pub fn parse_document(doc: &str) -> std::result::Result<ParsedMetricSet, ParseError> {
    let mut set = ParsedMetricSet::new();
    parse_status(doc, &mut set)?;
    parse_scoreboard(doc, &mut set)?;
    Ok(set)
}
