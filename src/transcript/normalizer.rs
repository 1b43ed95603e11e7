//! Paragraph segmentation and cleanup of caption fragments.

use super::TranscriptEntry;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// A pause longer than this between two fragments starts a new paragraph.
pub const PARAGRAPH_GAP_SECONDS: f64 = 3.0;

const PARAGRAPH_BREAK: &str = "\n\n";

static ANNOTATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[.*?\]").expect("Invalid regex"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("Invalid regex"));
static ELLIPSIS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.{2,}").expect("Invalid regex"));
static BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").expect("Invalid regex"));

/// Turn ordered caption fragments into paragraphed, cleaned text.
pub fn normalize(entries: &[TranscriptEntry]) -> String {
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current: Vec<String> = Vec::new();
    let mut previous_start: Option<f64> = None;

    for entry in entries {
        if let Some(prev) = previous_start {
            if entry.start - prev > PARAGRAPH_GAP_SECONDS && !current.is_empty() {
                paragraphs.push(current.join(" "));
                current.clear();
            }
        }
        previous_start = Some(entry.start);

        let text = entry.text.split_whitespace().collect::<Vec<_>>().join(" ");
        if !text.is_empty() {
            current.push(text);
        }
    }

    if !current.is_empty() {
        paragraphs.push(current.join(" "));
    }

    clean(&paragraphs.join(PARAGRAPH_BREAK))
}

/// Apply the four cleanup passes in order: drop bracketed annotations,
/// collapse whitespace runs, collapse period runs, cap consecutive line breaks at two.
///
/// Cleaning already-clean text leaves it unchanged.
pub fn clean(text: &str) -> String {
    let text = ANNOTATION.replace_all(text, "");
    // A run that spans line breaks keeps them, so paragraphs survive.
    let text = WHITESPACE.replace_all(&text, |caps: &Captures| {
        match caps[0].matches('\n').count() {
            0 => " ".to_string(),
            breaks => "\n".repeat(breaks),
        }
    });
    let text = ELLIPSIS.replace_all(&text, ".");
    let text = BLANK_LINES.replace_all(&text, PARAGRAPH_BREAK);
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(items: &[(&str, f64)]) -> Vec<TranscriptEntry> {
        items
            .iter()
            .map(|(text, start)| TranscriptEntry::new(*text, *start))
            .collect()
    }

    #[test]
    fn test_gap_starts_new_paragraph() {
        let transcript = entries(&[("Hello", 0.0), ("world", 1.0), ("Next", 5.0)]);
        assert_eq!(normalize(&transcript), "Hello world\n\nNext");
    }

    #[test]
    fn test_gap_of_exactly_threshold_stays_in_paragraph() {
        let transcript = entries(&[("one", 0.0), ("two", 3.0), ("three", 6.5)]);
        assert_eq!(normalize(&transcript), "one two\n\nthree");
    }

    #[test]
    fn test_annotations_and_ellipses_are_removed() {
        let transcript = entries(&[
            ("[Music] so today", 0.0),
            ("we talk   about\ncells...", 1.5),
            ("[Applause]", 2.0),
        ]);
        assert_eq!(normalize(&transcript), "so today we talk about cells.");
    }

    #[test]
    fn test_empty_transcript() {
        assert_eq!(normalize(&[]), "");
        assert_eq!(normalize(&entries(&[("  ", 0.0)])), "");
    }

    #[test]
    fn test_clean_caps_line_breaks() {
        assert_eq!(clean("a\n\n\n\nb"), "a\n\nb");
        assert_eq!(clean("a  \t b"), "a b");
        assert_eq!(clean("end. [Music]\n\n  next"), "end.\n\nnext");
    }

    #[test]
    fn test_clean_is_idempotent() {
        let samples = [
            "Hello world\n\nNext",
            "so [inaudible] we... begin\n\n\n\nagain  [laughs].",
            "end.[x]. next",
            "",
        ];
        for sample in samples {
            let once = clean(sample);
            assert_eq!(clean(&once), once, "not idempotent for {sample:?}");
        }
    }
}
