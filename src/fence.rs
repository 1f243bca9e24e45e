//! Cleanup of fenced JSON replies.
//!
//! Gemini tends to wrap JSON output in a Markdown code block. Only the exact
//! opening marker at the very start and the exact closing marker at the very
//! end are removed; anything else is left for the JSON parser to reject.

use crate::models::Analysis;
use crate::{Error, Result};

const OPENING_FENCE: &str = "```json\n";
const CLOSING_FENCE: &str = "\n```";

/// Remove a leading `` ```json\n `` and a trailing `` \n``` `` if present.
pub fn strip_json_fence(text: &str) -> &str {
    let text = text.strip_prefix(OPENING_FENCE).unwrap_or(text);
    text.strip_suffix(CLOSING_FENCE).unwrap_or(text)
}

/// Parse cleaned model output into a JSON object.
///
/// Arrays and scalars are rejected the same way as malformed JSON.
pub fn parse_analysis(text: &str) -> Result<Analysis> {
    serde_json::from_str::<Analysis>(text).map_err(|e| Error::InvalidOutput(e.to_string()))
}
