//! Changelog formatters
//!
//! A formatter turns a [`RenderContext`] into text. The context is built once
//! from a template and a commit collection, so formatters only deal with
//! layout.

mod markdown;

pub use markdown::MarkdownFormatter;

use serde::Serialize;

use crate::collection::CommitCollection;
use crate::commit::Commit;
use crate::template::ChangesTemplate;

/// Trait for changelog formatters
pub trait ChangelogFormatter: Send + Sync {
    /// Format a render context to string
    fn format(&self, context: &RenderContext<'_>) -> String;
}

/// A non-empty section ready to be written
#[derive(Debug, Clone, Serialize)]
pub struct RenderSection<'a> {
    pub title: &'a str,
    pub commits: Vec<&'a Commit>,
}

/// Everything a formatter needs, in render order
#[derive(Debug, Clone, Serialize)]
pub struct RenderContext<'a> {
    /// Optional title heading above the sections
    pub title: Option<&'a str>,
    /// Non-empty sections in template order
    pub sections: Vec<RenderSection<'a>>,
    /// Commit notes; empty when comments are disabled
    pub comments: &'a [String],
}

impl<'a> RenderContext<'a> {
    /// Lay out `collection` according to `template`.
    ///
    /// Commits within a section are in chronological order. Categories not
    /// claimed by any section go to the template's catch-all section when it
    /// is enabled, and are dropped otherwise.
    pub fn build(
        template: &'a ChangesTemplate,
        collection: &'a CommitCollection,
        title: Option<&'a str>,
        include_comments: bool,
    ) -> Self {
        let mut buckets: Vec<Vec<&'a Commit>> = vec![Vec::new(); template.sections.len()];
        let mut other: Vec<&'a Commit> = Vec::new();

        for (category, commits) in collection.groups() {
            match template.section_for(category) {
                Some(index) => buckets[index].extend(commits),
                None if template.other.enabled => other.extend(commits),
                None => {}
            }
        }

        let mut sections: Vec<RenderSection<'a>> = template
            .sections
            .iter()
            .zip(buckets)
            .filter(|(_, commits)| !commits.is_empty())
            .map(|(section, commits)| RenderSection {
                title: section.title.as_str(),
                commits,
            })
            .collect();

        if !other.is_empty() {
            sections.push(RenderSection {
                title: template.other.title.as_str(),
                commits: other,
            });
        }

        for section in &mut sections {
            section.commits.sort_by_key(|c| c.timestamp);
        }

        Self {
            title,
            sections,
            comments: if include_comments {
                collection.comments()
            } else {
                &[]
            },
        }
    }

    /// Whether nothing would be rendered
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty() && self.comments.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::commit;

    #[test]
    fn test_sections_follow_template_order() {
        let template = ChangesTemplate::builtin();
        let collection = CommitCollection::new(vec![
            commit("fix: b", 1),
            commit("feat: a", 2),
            commit("wip: c", 3),
        ]);
        let context = RenderContext::build(&template, &collection, None, true);

        let titles: Vec<_> = context.sections.iter().map(|s| s.title).collect();
        assert_eq!(titles, ["Features", "Fixes", "Other changes"]);
    }

    #[test]
    fn test_section_merges_categories_chronologically() {
        let template = ChangesTemplate::parse(
            r#"
[[sections]]
title = "Changes"
categories = ["fix", "feat"]

[other]
enabled = false
"#,
        )
        .unwrap();
        let collection = CommitCollection::new(vec![
            commit("feat: first", 1),
            commit("fix: second", 2),
            commit("feat: third", 3),
            commit("chore: hidden", 4),
        ]);
        let context = RenderContext::build(&template, &collection, None, false);

        assert_eq!(context.sections.len(), 1);
        let descriptions: Vec<_> = context.sections[0]
            .commits
            .iter()
            .map(|c| c.description())
            .collect();
        assert_eq!(descriptions, ["first", "second", "third"]);
    }

    #[test]
    fn test_comments_toggle() {
        let template = ChangesTemplate::builtin();
        let collection = CommitCollection::new(vec![commit("fix: a\n\nbody", 1)]);

        assert_eq!(
            RenderContext::build(&template, &collection, None, true).comments.len(),
            1
        );
        assert!(RenderContext::build(&template, &collection, None, false)
            .comments
            .is_empty());
    }

    #[test]
    fn test_empty_collection() {
        let template = ChangesTemplate::builtin();
        let collection = CommitCollection::default();
        assert!(RenderContext::build(&template, &collection, None, true).is_empty());
    }
}
