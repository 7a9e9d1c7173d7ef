//! Result extraction: grounding sources and the display name.
//!
//! Both helpers are pure and operate on already-parsed response data.

use regex::Regex;
use std::sync::LazyLock;

use super::gemini::GroundingChunk;
use super::types::SearchSource;

/// Longest first line still treated as a font name.
pub const MAX_NAME_CHARS: usize = 50;

/// Name used when the first line is too long to be a font name.
pub const UNKNOWN_FONT: &str = "Unknown Font";

static BOLD_MARKERS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*").unwrap());
static LEADING_PHRASE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*the font is").unwrap());

/// Collect sources that have both a link and a title, in service order.
pub fn extract_sources(chunks: &[GroundingChunk]) -> Vec<SearchSource> {
    chunks
        .iter()
        .filter_map(|chunk| {
            let web = chunk.web.as_ref()?;
            let uri = web.uri.as_deref().filter(|u| !u.is_empty())?;
            let title = web.title.as_deref().filter(|t| !t.is_empty())?;
            Some(SearchSource {
                title: title.to_string(),
                uri: uri.to_string(),
            })
        })
        .collect()
}

/// Derive a display name from the first line of the analysis.
///
/// Bold markers and a leading "The font is" are removed. Lines longer than
/// [`MAX_NAME_CHARS`] become [`UNKNOWN_FONT`].
///
/// An empty line is the one exception to "short lines become the name": it
/// yields `None` rather than `Some("")`, so callers never show a blank name.
pub fn derive_identified_name(analysis_text: &str) -> Option<String> {
    let first_line = analysis_text.split('\n').next().unwrap_or_default();
    let unbolded = BOLD_MARKERS.replace_all(first_line, "");
    let name = LEADING_PHRASE.replace(&unbolded, "");
    let name = name.trim();

    if name.is_empty() {
        None
    } else if name.chars().count() <= MAX_NAME_CHARS {
        Some(name.to_string())
    } else {
        Some(UNKNOWN_FONT.to_string())
    }
}
