//! Commit history operations

use chrono::{TimeZone, Utc};
use git2::{Oid, Sort};
use tracing::{debug, instrument};

use logsmith_core::error::GitError;

use crate::repository::{GitRepo, Result};
use crate::types::CommitInfo;

/// Order in which history is returned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommitOrder {
    /// HEAD first, like `git log`
    #[default]
    NewestFirst,
    /// Oldest reachable commit first
    OldestFirst,
}

impl CommitOrder {
    fn sorting(self) -> Sort {
        match self {
            Self::NewestFirst => Sort::TOPOLOGICAL | Sort::TIME,
            Self::OldestFirst => Sort::TOPOLOGICAL | Sort::TIME | Sort::REVERSE,
        }
    }
}

impl GitRepo {
    /// Resolve a reference (branch, tag, hash, `HEAD~2`, ...) to a commit hash
    pub fn resolve_ref(&self, reference: &str) -> Result<String> {
        let object = self.repo.revparse_single(reference).map_err(|e| match e.code() {
            git2::ErrorCode::NotFound
            | git2::ErrorCode::InvalidSpec
            | git2::ErrorCode::Ambiguous => GitError::ReferenceNotFound(reference.to_string()),
            _ => GitError::Git2(e),
        })?;
        let commit = object
            .peel_to_commit()
            .map_err(|_| GitError::ReferenceNotFound(reference.to_string()))?;
        Ok(commit.id().to_string())
    }

    /// Get commits reachable from HEAD but not from `since` (`since..HEAD`)
    #[instrument(skip(self), fields(since, order = ?order))]
    pub fn commits_since(&self, since: &str, order: CommitOrder) -> Result<Vec<CommitInfo>> {
        let since_oid = Oid::from_str(&self.resolve_ref(since)?)?;
        self.walk(Some(since_oid), order)
    }

    /// Get all commits reachable from HEAD
    #[instrument(skip(self), fields(order = ?order))]
    pub fn all_commits(&self, order: CommitOrder) -> Result<Vec<CommitInfo>> {
        self.walk(None, order)
    }

    /// Number of commits on HEAD that `upstream` does not contain
    pub fn commits_ahead_of(&self, upstream: &str) -> Result<usize> {
        Ok(self.commits_since(upstream, CommitOrder::NewestFirst)?.len())
    }

    /// HEAD as a commit record
    pub fn head_info(&self) -> Result<CommitInfo> {
        let head = self.head_commit()?;
        Ok(commit_to_info(&head))
    }

    fn walk(&self, hide: Option<Oid>, order: CommitOrder) -> Result<Vec<CommitInfo>> {
        let head = self.head_commit()?;

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(order.sorting())?;
        revwalk.push(head.id())?;
        if let Some(oid) = hide {
            revwalk.hide(oid)?;
        }

        let mut commits = Vec::new();

        for oid in revwalk {
            let oid = oid?;
            let commit = self.repo.find_commit(oid)?;
            commits.push(commit_to_info(&commit));
        }

        debug!(count = commits.len(), "walked history");
        Ok(commits)
    }
}

/// Convert a git2 Commit to CommitInfo
fn commit_to_info(commit: &git2::Commit<'_>) -> CommitInfo {
    let hash = commit.id().to_string();
    let author = commit.author();

    let message = String::from_utf8_lossy(commit.message_bytes()).to_string();

    let timestamp = Utc
        .timestamp_opt(commit.time().seconds(), 0)
        .single()
        .unwrap_or_else(Utc::now);

    CommitInfo::new(
        hash,
        message,
        author.name().unwrap_or("Unknown"),
        author.email().unwrap_or("unknown@example.com"),
        timestamp,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{commit_file, init_repo};

    #[test]
    fn test_all_commits_orders() {
        let (temp, repo) = init_repo();
        commit_file(&repo, temp.path(), "a.txt", "Initial commit", 100);
        commit_file(&repo, temp.path(), "b.txt", "feat: add file", 200);
        let git_repo = GitRepo::open(temp.path()).unwrap();

        let newest = git_repo.all_commits(CommitOrder::NewestFirst).unwrap();
        assert_eq!(newest.len(), 2);
        assert_eq!(newest[0].summary(), "feat: add file");

        let oldest = git_repo.all_commits(CommitOrder::OldestFirst).unwrap();
        assert_eq!(oldest[0].summary(), "Initial commit");
    }

    #[test]
    fn test_commits_since_reference() {
        let (temp, repo) = init_repo();
        let first = commit_file(&repo, temp.path(), "a.txt", "Initial commit", 100);
        commit_file(&repo, temp.path(), "b.txt", "feat: one", 200);
        commit_file(&repo, temp.path(), "c.txt", "fix: two", 300);
        repo.tag_lightweight("v1.0", &repo.find_object(first, None).unwrap(), false)
            .unwrap();
        let git_repo = GitRepo::open(temp.path()).unwrap();

        let commits = git_repo.commits_since("v1.0", CommitOrder::OldestFirst).unwrap();
        let subjects: Vec<_> = commits.iter().map(|c| c.summary().to_string()).collect();
        assert_eq!(subjects, vec!["feat: one", "fix: two"]);
    }

    #[test]
    fn test_commits_since_head_is_empty() {
        let (temp, repo) = init_repo();
        commit_file(&repo, temp.path(), "a.txt", "Initial commit", 100);
        let git_repo = GitRepo::open(temp.path()).unwrap();

        assert!(git_repo
            .commits_since("HEAD", CommitOrder::NewestFirst)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_unknown_reference() {
        let (temp, repo) = init_repo();
        commit_file(&repo, temp.path(), "a.txt", "Initial commit", 100);
        let git_repo = GitRepo::open(temp.path()).unwrap();

        let result = git_repo.commits_since("v9.9.9", CommitOrder::NewestFirst);
        assert!(matches!(result, Err(GitError::ReferenceNotFound(r)) if r == "v9.9.9"));
    }

    #[test]
    fn test_head_info_keeps_full_message() {
        let (temp, repo) = init_repo();
        commit_file(&repo, temp.path(), "a.txt", "Initial commit", 100);
        commit_file(&repo, temp.path(), "b.txt", "fix: crash\n\ncrashed on start", 200);
        let git_repo = GitRepo::open(temp.path()).unwrap();

        let head = git_repo.head_info().unwrap();
        assert_eq!(head.message, "fix: crash\n\ncrashed on start");
        assert_eq!(head.timestamp.timestamp(), 200);
    }

    #[test]
    fn test_commits_ahead_of() {
        let (temp, repo) = init_repo();
        commit_file(&repo, temp.path(), "a.txt", "Initial commit", 100);
        let git_repo = GitRepo::open(temp.path()).unwrap();
        let base = git_repo.resolve_ref("HEAD").unwrap();
        commit_file(&repo, temp.path(), "b.txt", "feat: more", 200);

        assert_eq!(git_repo.commits_ahead_of(&base).unwrap(), 1);
    }
}
