//! Commits grouped by category

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::commit::Commit;

/// Classified commits grouped by category, plus the extended notes of every
/// classified commit that carries a body.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CommitCollection {
    groups: BTreeMap<String, Vec<Commit>>,
    comments: Vec<String>,
}

impl CommitCollection {
    /// Group commits in chronological order; the sort is stable, so commits
    /// with equal timestamps keep their input order
    pub fn new(commits: impl IntoIterator<Item = Commit>) -> Self {
        let mut commits: Vec<Commit> = commits.into_iter().collect();
        commits.sort_by_key(|c| c.timestamp);

        let mut collection = Self::default();
        let mut skipped = 0usize;

        for commit in commits {
            let Some(category) = commit.category().map(str::to_string) else {
                skipped += 1;
                continue;
            };

            if commit.has_body() {
                collection
                    .comments
                    .push(format!("**{}**\n\n{}", category, commit.body));
            }
            collection.groups.entry(category).or_default().push(commit);
        }

        debug!(
            categories = collection.groups.len(),
            comments = collection.comments.len(),
            skipped,
            "commits grouped"
        );
        collection
    }

    /// All groups, keyed by category
    pub fn groups(&self) -> &BTreeMap<String, Vec<Commit>> {
        &self.groups
    }

    /// Commits of one category
    pub fn group(&self, category: &str) -> &[Commit] {
        self.groups.get(category).map_or(&[], Vec::as_slice)
    }

    /// Formatted `**category**\n\nbody` notes in commit order
    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    /// Categories present in the collection
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// Number of classified commits
    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Whether no commit was classified
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::commit;

    #[test]
    fn test_groups_by_category_in_order() {
        let collection = CommitCollection::new(vec![
            commit("feat(ui): add button", 1),
            commit("fix: null pointer", 2),
            commit("feat: dark mode", 3),
        ]);

        assert_eq!(collection.len(), 3);
        assert_eq!(collection.categories().collect::<Vec<_>>(), ["feat", "fix"]);

        let feats: Vec<_> = collection
            .group("feat")
            .iter()
            .map(|c| c.description())
            .collect();
        assert_eq!(feats, ["add button", "dark mode"]);
    }

    #[test]
    fn test_sorted_by_time_stable_on_ties() {
        let collection = CommitCollection::new(vec![
            commit("fix: late", 30),
            commit("fix: early", 10),
            commit("fix: tie-a", 20),
            commit("fix: tie-b", 20),
        ]);

        let fixes: Vec<_> = collection
            .group("fix")
            .iter()
            .map(|c| c.description())
            .collect();
        assert_eq!(fixes, ["early", "tie-a", "tie-b", "late"]);
    }

    #[test]
    fn test_unclassified_commits_are_dropped() {
        let collection = CommitCollection::new(vec![
            commit("Merge branch 'main'", 1),
            commit("WIP\n\nstill has a body", 2),
        ]);

        assert!(collection.is_empty());
        assert!(collection.comments().is_empty());
        assert!(collection.group("feat").is_empty());
    }

    #[test]
    fn test_comments_use_category_and_body() {
        let collection = CommitCollection::new(vec![
            commit("feat(ui): add button", 1),
            commit("fix: null pointer\n\ncrashed on start", 2),
            commit("docs(readme): usage\n\nexplain flags", 3),
        ]);

        assert_eq!(
            collection.comments(),
            ["**fix**\n\ncrashed on start", "**docs**\n\nexplain flags"]
        );
    }

    #[test]
    fn test_every_classified_commit_lands_in_exactly_one_group() {
        let commits = vec![
            commit("feat: a", 1),
            commit("fix: b", 2),
            commit("chore(deps): c", 3),
            commit("random", 4),
        ];
        let collection = CommitCollection::new(commits);

        let total: usize = collection.groups().values().map(Vec::len).sum();
        assert_eq!(total, 3);
        for (category, group) in collection.groups() {
            assert!(group.iter().all(|c| c.category() == Some(category.as_str())));
        }
    }
}
