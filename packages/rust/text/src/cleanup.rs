//! Cleanup pipeline for fetched document text.
//!
//! Each cleanup pass is a function `&str -> String` applied in sequence.
//! The pipeline normalizes line endings, invisible characters, blank
//! lines, and trailing whitespace.

use std::sync::LazyLock;

use regex::Regex;

/// Run the full cleanup pipeline on raw text.
pub(crate) fn run_pipeline(text: &str) -> String {
    let mut result = text.to_string();

    result = normalize_line_endings(&result);
    result = replace_invisible_chars(&result);
    result = clean_blank_lines(&result);
    result = normalize_whitespace(&result);
    result = ensure_trailing_newline(&result);

    result
}

// ---------------------------------------------------------------------------
// Pass 1: Normalize line endings
// ---------------------------------------------------------------------------

/// Convert CRLF and bare CR to LF.
fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

// ---------------------------------------------------------------------------
// Pass 2: Replace invisible characters
// ---------------------------------------------------------------------------

/// Replace no-break spaces with plain spaces and drop zero-width characters.
///
/// EUR-Lex HTML renditions are full of `&nbsp;` runs used for layout.
fn replace_invisible_chars(text: &str) -> String {
    text.chars()
        .filter_map(|c| match c {
            '\u{a0}' | '\u{2007}' | '\u{202f}' => Some(' '),
            '\u{200b}' | '\u{200c}' | '\u{200d}' | '\u{feff}' => None,
            _ => Some(c),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Pass 3: Clean up excessive blank lines
// ---------------------------------------------------------------------------

/// Collapse runs of 3+ blank lines into exactly 2.
fn clean_blank_lines(text: &str) -> String {
    static MULTI_BLANK_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\n{4,}").expect("valid regex"));

    MULTI_BLANK_RE.replace_all(text, "\n\n\n").to_string()
}

// ---------------------------------------------------------------------------
// Pass 4: Normalize whitespace
// ---------------------------------------------------------------------------

/// Trim trailing whitespace on every line.
fn normalize_whitespace(text: &str) -> String {
    text.lines()
        .map(|line| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

// ---------------------------------------------------------------------------
// Pass 5: Ensure trailing newline
// ---------------------------------------------------------------------------

/// Ensure the text ends with exactly one newline.
fn ensure_trailing_newline(text: &str) -> String {
    let trimmed = text.trim_end_matches('\n');
    format!("{trimmed}\n")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_endings_normalized() {
        let input = "Article 1\r\nScope\rEnd";
        assert_eq!(normalize_line_endings(input), "Article 1\nScope\nEnd");
    }

    #[test]
    fn nbsp_becomes_plain_space() {
        let input = "Article\u{a0}1";
        assert_eq!(replace_invisible_chars(input), "Article 1");
    }

    #[test]
    fn zero_width_chars_removed() {
        let input = "Arti\u{200b}cle\u{feff}";
        assert_eq!(replace_invisible_chars(input), "Article");
    }

    #[test]
    fn clean_blank_lines_collapses_excess() {
        let input = "Line 1\n\n\n\n\nLine 2";
        assert_eq!(clean_blank_lines(input), "Line 1\n\n\nLine 2");
    }

    #[test]
    fn clean_blank_lines_keeps_double() {
        let input = "Line 1\n\nLine 2";
        assert_eq!(clean_blank_lines(input), input);
    }

    #[test]
    fn normalize_whitespace_trims_trailing() {
        let input = "Line 1   \nLine 2\t\nLine 3";
        assert_eq!(normalize_whitespace(input), "Line 1\nLine 2\nLine 3");
    }

    #[test]
    fn ensure_trailing_newline_adds_if_missing() {
        assert_eq!(ensure_trailing_newline("Content"), "Content\n");
    }

    #[test]
    fn ensure_trailing_newline_normalizes_multiple() {
        assert_eq!(ensure_trailing_newline("Content\n\n\n"), "Content\n");
    }

    #[test]
    fn full_pipeline_cleans_body() {
        let input = "TITLE\u{a0}I\r\n\r\n\r\n\r\n\r\nArticle 1   \r\nScope";
        let result = run_pipeline(input);

        assert!(!result.contains('\u{a0}'));
        assert!(!result.contains('\r'));
        assert!(!result.contains("\n\n\n\n"));
        assert!(result.contains("Article 1\nScope"));
        assert!(result.ends_with('\n'));
    }
}
