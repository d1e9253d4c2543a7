use chrono::{TimeZone, Utc};
use logsmith_git::CommitInfo;

use crate::commit::Commit;

/// Parsed commit with a hash derived from `seconds`
pub fn commit(message: &str, seconds: i64) -> Commit {
    Commit::parse(&CommitInfo::new(
        format!("{:040x}", seconds),
        message,
        "Test",
        "test@example.com",
        Utc.timestamp_opt(seconds, 0).unwrap(),
    ))
}

/// Throw-away repositories
pub mod repo {
    use std::path::Path;

    use git2::{Oid, Repository, Signature, Time};
    use tempfile::TempDir;

    pub fn init_repo() -> (TempDir, Repository) {
        let temp = TempDir::new().unwrap();
        let repo = Repository::init(temp.path()).unwrap();
        let mut config = repo.config().unwrap();
        config.set_str("user.name", "Test").unwrap();
        config.set_str("user.email", "test@example.com").unwrap();
        (temp, repo)
    }

    /// Write `name` and commit it on HEAD at a fixed time
    pub fn commit_file(
        repo: &Repository,
        dir: &Path,
        name: &str,
        message: &str,
        seconds: i64,
    ) -> Oid {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, message).unwrap();
        let mut index = repo.index().unwrap();
        index.add_path(Path::new(name)).unwrap();
        index.write().unwrap();

        let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
        let sig = Signature::new("Test", "test@example.com", &Time::new(seconds, 0)).unwrap();
        let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

        repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .unwrap()
    }
}
