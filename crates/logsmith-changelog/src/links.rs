//! Issue reference linking
//!
//! Rewrites `owner/repo#N` and bare `#N` references in rendered text into
//! markdown links to the hosting service's issue tracker.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::debug;

/// `owner/repo#N`, not preceded by a path or word character
pub const QUALIFIED_ISSUE_PATTERN: &str =
    r"(^|[^\w/.:-])([A-Za-z0-9_.\-]+/[A-Za-z0-9_.\-]+)#(\d+)\b";

/// `#N`, not preceded by a word character, `/` or `&`
pub const BARE_ISSUE_PATTERN: &str = r"(^|[^\w/&#])#(\d+)\b";

static QUALIFIED_ISSUE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("(?m){}", QUALIFIED_ISSUE_PATTERN)).expect("Invalid regex"));

static BARE_ISSUE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("(?m){}", BARE_ISSUE_PATTERN)).expect("Invalid regex"));

/// Rewrites issue references into links
#[derive(Debug, Clone)]
pub struct IssueLinker {
    host: String,
    default_repo: Option<String>,
}

impl IssueLinker {
    /// Linker for `host` (e.g. `https://github.com`); bare references resolve
    /// against `default_repo` and are left alone without one.
    pub fn new(host: impl Into<String>, default_repo: Option<impl Into<String>>) -> Self {
        Self {
            host: host.into().trim_end_matches('/').to_string(),
            default_repo: default_repo.map(Into::into),
        }
    }

    /// URL of issue `number` in `repo`
    pub fn issue_url(&self, repo: &str, number: &str) -> String {
        format!("{}/{}/issues/{}", self.host, repo, number)
    }

    /// Rewrite qualified references, then bare ones
    pub fn rewrite(&self, text: &str) -> String {
        let mut count = 0usize;

        let qualified = QUALIFIED_ISSUE_REGEX.replace_all(text, |caps: &Captures<'_>| {
            count += 1;
            format!("{}{}", &caps[1], self.link(&caps[2], &caps[3]))
        });

        let result = match &self.default_repo {
            Some(repo) => BARE_ISSUE_REGEX
                .replace_all(&qualified, |caps: &Captures<'_>| {
                    count += 1;
                    format!("{}{}", &caps[1], self.link(repo, &caps[2]))
                })
                .into_owned(),
            None => qualified.into_owned(),
        };

        debug!(links = count, "issue references rewritten");
        result
    }

    fn link(&self, repo: &str, number: &str) -> String {
        format!("[`{}`]({})", number, self.issue_url(repo, number))
    }
}
