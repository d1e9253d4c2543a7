//! Remote operations

use crate::repository::{GitRepo, Result};
use logsmith_core::error::GitError;

impl GitRepo {
    /// Get list of remote names
    pub fn remotes(&self) -> Result<Vec<String>> {
        let remotes = self.repo.remotes()?;
        Ok(remotes
            .iter()
            .filter_map(|r| r.map(|s| s.to_string()))
            .collect())
    }

    /// Get the URL for a remote
    pub fn remote_url(&self, name: &str) -> Result<Option<String>> {
        match self.repo.find_remote(name) {
            Ok(remote) => Ok(remote.url().map(|s| s.to_string())),
            Err(e) if e.code() == git2::ErrorCode::NotFound => {
                Err(GitError::RemoteNotFound(name.to_string()))
            }
            Err(e) => Err(GitError::Git2(e)),
        }
    }

    /// `owner/repo` of a remote, if its URL has that shape
    pub fn remote_slug(&self, name: &str) -> Result<Option<String>> {
        Ok(self.remote_url(name)?.as_deref().and_then(parse_repo_slug))
    }
}

/// Extract `owner/repo` from an SSH or HTTPS remote URL.
///
/// `git@github.com:owner/repo.git` and `https://github.com/owner/repo` both
/// yield `owner/repo`. Remotes without a host (local paths, `file://`) yield
/// `None`.
pub fn parse_repo_slug(url: &str) -> Option<String> {
    let url = url.trim();
    let (host, path) = match url.split_once("://") {
        Some((_, rest)) => rest.split_once('/')?,
        None => url.split_once(':')?,
    };
    let host = host.rsplit_once('@').map_or(host, |(_, h)| h);
    if host.is_empty() || host.contains('/') {
        return None;
    }

    let path = path.trim_end_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);
    let mut parts = path.rsplit('/');
    let repo = parts.next().filter(|s| !s.is_empty())?;
    let owner = parts.next().filter(|s| !s.is_empty())?;
    Some(format!("{}/{}", owner, repo))
}
