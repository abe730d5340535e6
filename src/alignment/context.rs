//! Link-context extraction
//!
//! Locates the textual neighborhood of a cross-reference so the
//! relationship classifier sees only the sentence (or a short window)
//! where the target entity is actually mentioned.

use regex::{Regex, RegexBuilder};
use std::sync::OnceLock;

/// Characters of surrounding text kept on each side of a mention.
const WINDOW_CHARS: usize = 200;
/// Minimum length for the title's first word to be usable as a fallback
/// needle; shorter words ("the", "of") match far too generically.
const MIN_FALLBACK_LEN: usize = 4;

fn sentence_splitter() -> &'static Regex {
    static SPLITTER: OnceLock<Regex> = OnceLock::new();
    SPLITTER.get_or_init(|| Regex::new(r"[.!?]\s+").expect("sentence splitter is valid"))
}

/// Byte range of the first case-insensitive occurrence of `needle`.
fn find_ci(haystack: &str, needle: &str) -> Option<(usize, usize)> {
    let re = RegexBuilder::new(&regex::escape(needle))
        .case_insensitive(true)
        .build()
        .ok()?;
    re.find(haystack).map(|m| (m.start(), m.end()))
}

/// Byte index `count` characters to the left of `idx`, clamped to the start.
fn widen_left(text: &str, idx: usize, count: usize) -> usize {
    text[..idx]
        .char_indices()
        .rev()
        .take(count)
        .last()
        .map(|(i, _)| i)
        .unwrap_or(idx)
}

/// Byte index `count` characters to the right of `idx`, clamped to the end.
fn widen_right(text: &str, idx: usize, count: usize) -> usize {
    match text[idx..].char_indices().nth(count) {
        Some((offset, _)) => idx + offset,
        None => text.len(),
    }
}

/// Extract the context around the first mention of `target_title` in
/// `content`.
///
/// Falls back to the title's first word when the full title is absent,
/// but only when that word is long enough to be distinctive. Returns the
/// single sentence containing the mention when one can be isolated,
/// otherwise the trimmed ±200-character window. `None` means the target
/// is never mentioned and the caller should skip this edge.
pub fn link_context(content: &str, target_title: &str) -> Option<String> {
    if content.is_empty() || target_title.is_empty() {
        return None;
    }

    let first_word = target_title
        .split_whitespace()
        .next()
        .unwrap_or(target_title);
    let fallback_usable = first_word.chars().count() >= MIN_FALLBACK_LEN;

    let (start, end) = find_ci(content, target_title).or_else(|| {
        if fallback_usable {
            find_ci(content, first_word)
        } else {
            None
        }
    })?;

    let window_start = widen_left(content, start, WINDOW_CHARS);
    let window_end = widen_right(content, end, WINDOW_CHARS);
    let window = &content[window_start..window_end];

    let title_lower = target_title.to_lowercase();
    let first_lower = first_word.to_lowercase();
    for sentence in sentence_splitter().split(window) {
        let lower = sentence.to_lowercase();
        if lower.contains(&title_lower) || (fallback_usable && lower.contains(&first_lower)) {
            return Some(sentence.trim().to_string());
        }
    }

    Some(window.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn isolates_the_sentence_containing_the_mention() {
        let content = "The village slept. Karras burned the granary that night. Nobody saw him leave.";
        let context = link_context(content, "Karras").unwrap();
        assert_eq!(context, "Karras burned the granary that night");
    }

    #[test]
    fn match_is_case_insensitive() {
        let content = "They spoke of KARRAS in hushed tones.";
        assert!(link_context(content, "Karras").is_some());
    }

    #[test]
    fn falls_back_to_first_word_of_long_titles() {
        let content = "Veyra rode south before dawn.";
        // Full title absent; first word "Veyra" (5 chars) qualifies.
        let context = link_context(content, "Veyra the Unbound").unwrap();
        assert!(context.contains("Veyra"));
    }

    #[test]
    fn short_first_word_is_not_used_as_fallback() {
        let content = "The road wound on for miles.";
        // First word "The" is too short to be a meaningful needle.
        assert!(link_context(content, "The Shattered Vale").is_none());
    }

    #[test]
    fn absent_mention_returns_none() {
        assert!(link_context("Nothing relevant here.", "Karras").is_none());
        assert!(link_context("", "Karras").is_none());
        assert!(link_context("Some text.", "").is_none());
    }

    #[test]
    fn window_is_bounded_when_no_sentence_qualifies() {
        // No sentence-ending punctuation followed by whitespace, so the
        // raw window comes back; it must stay within ±200 chars of the hit.
        let padding = "x".repeat(500);
        let content = format!("{padding} Karras {padding}");
        let context = link_context(&content, "Karras").unwrap();
        assert!(context.contains("Karras"));
        assert!(context.chars().count() <= "Karras".len() + 2 * WINDOW_CHARS + 2);
    }

    #[test]
    fn window_clamps_to_multibyte_boundaries() {
        let padding = "é".repeat(300);
        let content = format!("{padding} Karras {padding}");
        // Must not panic slicing into a multibyte sequence.
        assert!(link_context(&content, "Karras").is_some());
    }
}
