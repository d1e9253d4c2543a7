//! Commit model
//!
//! Turns a raw commit record into a structured [`Commit`]. Subjects are
//! classified with the conventional-commit grammar `type(scope): description`;
//! anything else stays unclassified and never reaches a changelog.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Serialize;

use logsmith_git::CommitInfo;

/// Accepted commit subject grammar: `category(scope): description`.
///
/// The category is a single word; the scope is optional and may contain word
/// characters, dots and dashes.
pub const SUBJECT_PATTERN: &str = r"^(\w+)(?:\(([\w.\-]+)\))?:\s*(.*)$";

static SUBJECT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(SUBJECT_PATTERN).expect("Invalid regex"));

/// Category, scope and description parsed from a subject
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    /// Leading token (`feat`, `fix`, ...)
    pub category: String,
    /// Parenthesised qualifier without the parentheses
    pub scope: Option<String>,
    /// Text after the colon
    pub description: String,
}

impl Classification {
    /// Classify a subject line, `None` if it does not follow the grammar
    pub fn parse(subject: &str) -> Option<Self> {
        let caps = SUBJECT_REGEX.captures(subject)?;
        Some(Self {
            category: caps.get(1)?.as_str().to_string(),
            scope: caps.get(2).map(|m| m.as_str().to_string()),
            description: caps.get(3).map_or("", |m| m.as_str()).to_string(),
        })
    }
}

/// A parsed commit
#[derive(Debug, Clone, Serialize)]
pub struct Commit {
    /// Full commit hash
    pub hash: String,
    /// Abbreviated hash
    pub short_hash: String,
    /// Commit time
    pub timestamp: DateTime<Utc>,
    /// First line of the message
    pub subject: String,
    /// Remaining lines, trimmed; empty when the message is a single line
    pub body: String,
    /// Parsed subject; `None` for commits outside the grammar
    #[serde(flatten)]
    pub classification: Option<Classification>,
}

impl Commit {
    /// Parse a raw commit record
    pub fn parse(info: &CommitInfo) -> Self {
        let message = info.message.trim();
        let (first, rest) = message.split_once('\n').unwrap_or((message, ""));

        let subject = first.trim().to_string();
        let body = rest
            .lines()
            .map(|l| l.trim_end_matches('\r'))
            .collect::<Vec<_>>()
            .join("\n")
            .trim()
            .to_string();
        let classification = Classification::parse(&subject);

        Self {
            hash: info.hash.clone(),
            short_hash: info.short_hash.clone(),
            timestamp: info.timestamp,
            subject,
            body,
            classification,
        }
    }

    /// Category, if the subject was classified
    pub fn category(&self) -> Option<&str> {
        self.classification.as_ref().map(|c| c.category.as_str())
    }

    /// Scope, if present
    pub fn scope(&self) -> Option<&str> {
        self.classification.as_ref().and_then(|c| c.scope.as_deref())
    }

    /// Description, or the whole subject for unclassified commits
    pub fn description(&self) -> &str {
        self.classification
            .as_ref()
            .map_or(self.subject.as_str(), |c| c.description.as_str())
    }

    /// Whether the commit carries a body worth quoting
    pub fn has_body(&self) -> bool {
        !self.body.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn info(message: &str) -> CommitInfo {
        CommitInfo::new(
            "0123456789abcdef0123456789abcdef01234567",
            message,
            "Test Author",
            "test@example.com",
            Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
        )
    }

    #[test]
    fn test_parse_category_scope_description() {
        let commit = Commit::parse(&info("feat(ui): add button"));
        assert_eq!(commit.category(), Some("feat"));
        assert_eq!(commit.scope(), Some("ui"));
        assert_eq!(commit.description(), "add button");
        assert_eq!(commit.short_hash, "0123456");
    }

    #[test]
    fn test_parse_without_scope() {
        let c = Classification::parse("fix: null pointer").unwrap();
        assert_eq!(c.category, "fix");
        assert_eq!(c.scope, None);
        assert_eq!(c.description, "null pointer");
    }

    #[test]
    fn test_whitespace_after_colon_is_optional() {
        let c = Classification::parse("docs:typo in readme").unwrap();
        assert_eq!(c.description, "typo in readme");

        let c = Classification::parse("perf(core):    faster").unwrap();
        assert_eq!(c.scope.as_deref(), Some("core"));
        assert_eq!(c.description, "faster");
    }

    #[test]
    fn test_scope_with_dash_and_dot() {
        let c = Classification::parse("fix(ui-kit.v2): align").unwrap();
        assert_eq!(c.scope.as_deref(), Some("ui-kit.v2"));
    }

    #[test]
    fn test_unclassifiable_subjects() {
        for subject in [
            "Merge branch 'main' into feature",
            "Just a regular commit message",
            "feat add button",
            "feat(): empty scope",
            "feat(ui: unbalanced",
            "multi word: category",
            ": no category",
        ] {
            let commit = Commit::parse(&info(subject));
            assert_eq!(commit.category(), None, "{}", subject);
        }
    }

    #[test]
    fn test_body_is_split_and_trimmed() {
        let commit = Commit::parse(&info(
            "  fix: null pointer  \n\n  crashed on start\nwhen config missing\n\n",
        ));
        assert_eq!(commit.subject, "fix: null pointer");
        assert_eq!(commit.body, "crashed on start\nwhen config missing");
        assert!(commit.has_body());
    }

    #[test]
    fn test_single_line_has_empty_body() {
        let commit = Commit::parse(&info("feat: add button\n"));
        assert!(commit.body.is_empty());
        assert!(!commit.has_body());
    }

    #[test]
    fn test_crlf_message() {
        let commit = Commit::parse(&info("fix: windows\r\n\r\nline ending\r\n"));
        assert_eq!(commit.subject, "fix: windows");
        assert_eq!(commit.body, "line ending");
    }

    #[test]
    fn test_unclassified_description_falls_back_to_subject() {
        let commit = Commit::parse(&info("Initial commit"));
        assert_eq!(commit.description(), "Initial commit");
    }
}
