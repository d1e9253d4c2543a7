//! `git describe` equivalent

use tracing::{debug, instrument};

use crate::repository::{GitRepo, Result};

impl GitRepo {
    /// Describe HEAD relative to the nearest tag matching `pattern`.
    ///
    /// Mirrors `git describe --always --tags --match=<pattern>`: the result is
    /// `<tag>` on a tagged commit, `<tag>-<n>-g<hash>` past it, and the
    /// abbreviated commit hash when no tag matches.
    #[instrument(skip(self), fields(pattern))]
    pub fn describe(&self, pattern: &str) -> Result<String> {
        let mut opts = git2::DescribeOptions::new();
        opts.describe_tags()
            .pattern(pattern)
            .show_commit_oid_as_fallback(true);

        let mut format = git2::DescribeFormatOptions::new();
        format.abbreviated_size(7);

        let description = self.repo.describe(&opts)?.format(Some(&format))?;
        debug!(description, "described HEAD");
        Ok(description)
    }
}

#[cfg(test)]
mod tests {
    use crate::repository::GitRepo;
    use crate::test_support::{commit_file, init_repo};

    #[test]
    fn test_describe_on_tag() {
        let (temp, repo) = init_repo();
        let oid = commit_file(&repo, temp.path(), "a.txt", "Initial commit", 100);
        repo.tag_lightweight("v1.2.0", &repo.find_object(oid, None).unwrap(), false)
            .unwrap();
        let git_repo = GitRepo::open(temp.path()).unwrap();

        assert_eq!(git_repo.describe("v*.*").unwrap(), "v1.2.0");
    }

    #[test]
    fn test_describe_past_tag() {
        let (temp, repo) = init_repo();
        let oid = commit_file(&repo, temp.path(), "a.txt", "Initial commit", 100);
        repo.tag_lightweight("v1.2", &repo.find_object(oid, None).unwrap(), false)
            .unwrap();
        commit_file(&repo, temp.path(), "b.txt", "feat: more", 200);
        commit_file(&repo, temp.path(), "c.txt", "fix: less", 300);
        let git_repo = GitRepo::open(temp.path()).unwrap();

        let described = git_repo.describe("v*.*").unwrap();
        assert!(described.starts_with("v1.2-2-g"), "{}", described);
    }

    #[test]
    fn test_describe_falls_back_to_hash() {
        let (temp, repo) = init_repo();
        let oid = commit_file(&repo, temp.path(), "a.txt", "Initial commit", 100);
        repo.tag_lightweight("other", &repo.find_object(oid, None).unwrap(), false)
            .unwrap();
        let git_repo = GitRepo::open(temp.path()).unwrap();

        let described = git_repo.describe("v*.*").unwrap();
        assert_eq!(described, &oid.to_string()[..7]);
    }
}
