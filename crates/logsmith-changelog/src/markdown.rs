//! Markdown text utilities

use std::sync::LazyLock;

use regex::Regex;

static HEADING_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#").expect("Invalid regex"));

static SUBHEADING_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^##").expect("Invalid regex"));

static BLANK_RUN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("Invalid regex"));

/// Push every ATX heading down by `levels` (`# A` with 2 becomes `### A`)
pub fn shift_headings(text: &str, levels: usize) -> String {
    if levels == 0 {
        return text.to_string();
    }
    let replacement = "#".repeat(levels + 1);
    HEADING_REGEX
        .replace_all(text, regex::NoExpand(&replacement))
        .into_owned()
}

/// Pull every heading below level 1 up one level (`### A` becomes `## A`)
pub fn lift_headings(text: &str) -> String {
    SUBHEADING_REGEX.replace_all(text, "#").into_owned()
}

/// Trim, drop carriage returns and collapse runs of blank lines to one
pub fn normalize(text: &str) -> String {
    let text = text.replace('\r', "");
    BLANK_RUN_REGEX
        .replace_all(&text, "\n\n")
        .trim()
        .to_string()
}

/// [`normalize`], substituting `placeholder` when nothing is left
pub fn normalize_or(text: &str, placeholder: &str) -> String {
    let normalized = normalize(text);
    if normalized.is_empty() {
        placeholder.to_string()
    } else {
        normalized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shift_headings() {
        let text = "# Features\n\n- item #3\n\n## Sub\ntext";
        assert_eq!(
            shift_headings(text, 1),
            "## Features\n\n- item #3\n\n### Sub\ntext"
        );
        assert_eq!(shift_headings(text, 3).lines().next(), Some("#### Features"));
        assert_eq!(shift_headings(text, 0), text);
    }

    #[test]
    fn test_shift_headings_leaves_indented_hashes() {
        assert_eq!(shift_headings("  # not a heading", 2), "  # not a heading");
    }

    #[test]
    fn test_lift_headings() {
        assert_eq!(
            lift_headings("## [Release v1](x)\r\n\n### Fixes\n\n- #3\n# Top"),
            "# [Release v1](x)\r\n\n## Fixes\n\n- #3\n# Top"
        );
    }

    #[test]
    fn test_normalize_collapses_blank_runs() {
        assert_eq!(normalize("\n\n a\n\n\n\nb\r\n\r\n\r\nc \n\n"), "a\n\nb\n\nc");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for input in ["a\n\n\n\n\nb", "  x\r\n", "", "\n\n\n", "one\n\ntwo\nthree"] {
            let once = normalize(input);
            assert_eq!(normalize(&once), once);
            assert!(!once.contains("\n\n\n"));
        }
    }

    #[test]
    fn test_normalize_or_placeholder() {
        assert_eq!(normalize_or(" \n\r\n ", "Security updates"), "Security updates");
        assert_eq!(normalize_or("x", "Security updates"), "x");
    }
}
