//! Tag operations

use chrono::{TimeZone, Utc};
use tracing::{info, instrument};

use crate::repository::{GitRepo, Result};
use crate::types::TagInfo;
use logsmith_core::error::GitError;

impl GitRepo {
    /// Find a tag by name, reading the annotation when there is one
    pub fn find_tag(&self, name: &str) -> Result<Option<TagInfo>> {
        let tag_ref = format!("refs/tags/{}", name);

        let reference = match self.repo.find_reference(&tag_ref) {
            Ok(reference) => reference,
            Err(e) if e.code() == git2::ErrorCode::NotFound => return Ok(None),
            Err(e) => return Err(GitError::Git2(e)),
        };

        let target = reference.peel_to_commit()?;
        let mut info = TagInfo::new(name, target.id().to_string());

        if let Ok(tag) = reference.peel_to_tag() {
            if let Some(msg) = tag.message() {
                info = info.with_message(msg);
            }
            if let Some(tagger) = tag.tagger() {
                if let Some(name) = tagger.name() {
                    info = info.with_tagger(name);
                }
                let timestamp = Utc
                    .timestamp_opt(tagger.when().seconds(), 0)
                    .single()
                    .unwrap_or_else(Utc::now);
                info = info.with_timestamp(timestamp);
            }
        }

        Ok(Some(info))
    }

    /// Create an annotated tag on HEAD, replacing an existing one when `force`
    #[instrument(skip(self, message), fields(name, force))]
    pub fn create_annotated_tag(&self, name: &str, message: &str, force: bool) -> Result<TagInfo> {
        let head = self.head_commit()?;
        let sig = self.repo.signature()?;
        self.repo.tag(name, head.as_object(), &sig, message, force)?;

        info!(name, force, "created annotated tag");
        Ok(TagInfo::new(name, head.id().to_string()).with_message(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{commit_file, init_repo};

    #[test]
    fn test_find_lightweight_tag() {
        let (temp, repo) = init_repo();
        let oid = commit_file(&repo, temp.path(), "a.txt", "Initial commit", 100);
        repo.tag_lightweight("v1.0.0", &repo.find_object(oid, None).unwrap(), false)
            .unwrap();
        let git_repo = GitRepo::open(temp.path()).unwrap();

        let tag = git_repo.find_tag("v1.0.0").unwrap().unwrap();
        assert_eq!(tag.commit_hash, oid.to_string());
        assert!(tag.message.is_none());
    }

    #[test]
    fn test_missing_tag() {
        let (temp, repo) = init_repo();
        commit_file(&repo, temp.path(), "a.txt", "Initial commit", 100);
        let git_repo = GitRepo::open(temp.path()).unwrap();

        assert!(git_repo.find_tag("published").unwrap().is_none());
    }

    #[test]
    fn test_create_and_replace_annotated_tag() {
        let (temp, repo) = init_repo();
        commit_file(&repo, temp.path(), "a.txt", "Initial commit", 100);
        let git_repo = GitRepo::open(temp.path()).unwrap();

        git_repo
            .create_annotated_tag("published", "first\n", false)
            .unwrap();
        assert!(git_repo
            .create_annotated_tag("published", "again\n", false)
            .is_err());

        commit_file(&repo, temp.path(), "b.txt", "feat: more", 200);
        git_repo
            .create_annotated_tag("published", "second\n", true)
            .unwrap();

        let tag = git_repo.find_tag("published").unwrap().unwrap();
        assert_eq!(tag.message_headline(), Some("second"));
        assert_eq!(tag.tagger.as_deref(), Some("Test"));
        assert_eq!(tag.commit_hash, git_repo.resolve_ref("HEAD").unwrap());
    }
}
