//! Explicitly stated alignment extraction
//!
//! Pure pattern matching over entity text. A match here is ground truth:
//! confidence 1.0, source `explicit`. No match is the only failure mode.

use super::types::StatedAlignment;
use regex::Regex;
use std::sync::OnceLock;

/// Ordered pattern table: full two-word phrases first, then the standard
/// abbreviations. The first matching entry wins, so order is load-bearing
/// (e.g. "lawful good" must be consumed before a stray "LG" elsewhere).
///
/// All patterns are case-insensitive and word-boundary anchored. The bare
/// "N" abbreviation relies on `\b` to reject a following word character,
/// so "North" or "NE" never read as true neutral.
const PATTERN_TABLE: &[(&str, f64, f64)] = &[
    (r"(?i)\blawful\s+good\b", 1.0, 1.0),
    (r"(?i)\bneutral\s+good\b", 0.0, 1.0),
    (r"(?i)\bchaotic\s+good\b", -1.0, 1.0),
    (r"(?i)\blawful\s+neutral\b", 1.0, 0.0),
    (r"(?i)\btrue\s+neutral\b", 0.0, 0.0),
    (r"(?i)\bchaotic\s+neutral\b", -1.0, 0.0),
    (r"(?i)\blawful\s+evil\b", 1.0, -1.0),
    (r"(?i)\bneutral\s+evil\b", 0.0, -1.0),
    (r"(?i)\bchaotic\s+evil\b", -1.0, -1.0),
    (r"(?i)\bLG\b", 1.0, 1.0),
    (r"(?i)\bNG\b", 0.0, 1.0),
    (r"(?i)\bCG\b", -1.0, 1.0),
    (r"(?i)\bLN\b", 1.0, 0.0),
    (r"(?i)\bTN\b", 0.0, 0.0),
    (r"(?i)\bN\b", 0.0, 0.0),
    (r"(?i)\bCN\b", -1.0, 0.0),
    (r"(?i)\bLE\b", 1.0, -1.0),
    (r"(?i)\bNE\b", 0.0, -1.0),
    (r"(?i)\bCE\b", -1.0, -1.0),
];

fn patterns() -> &'static [(Regex, f64, f64)] {
    static PATTERNS: OnceLock<Vec<(Regex, f64, f64)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        PATTERN_TABLE
            .iter()
            .map(|(pattern, law_chaos, good_evil)| {
                let re = Regex::new(pattern).expect("alignment pattern table is valid");
                (re, *law_chaos, *good_evil)
            })
            .collect()
    })
}

/// Extract an explicitly stated alignment from entity text.
///
/// Returns `None` when no pattern matches or the text is empty.
pub fn extract_stated(content: &str) -> Option<StatedAlignment> {
    if content.is_empty() {
        return None;
    }

    for (re, law_chaos, good_evil) in patterns() {
        if re.is_match(content) {
            return Some(StatedAlignment::explicit(*law_chaos, *good_evil));
        }
    }

    None
}
