//! Operations delegated to the git CLI.
//!
//! Network access and GPG signing go through the `git` binary so the user's
//! credential helpers and signing configuration apply.

use std::path::Path;
use std::process::Command;

use tracing::{info, instrument};

use crate::repository::{GitRepo, Result};
use logsmith_core::error::GitError;

/// Run `git <args>` in `dir`, returning trimmed stdout
#[instrument(skip(args), fields(dir = %dir.display()))]
pub fn run_git(dir: &Path, args: &[&str]) -> Result<String> {
    let start = std::time::Instant::now();
    let command = args.first().copied().unwrap_or_default().to_string();

    let output = Command::new("git")
        .current_dir(dir)
        .args(args)
        .output()
        .map_err(|e| GitError::CommandFailed {
            command: command.clone(),
            reason: e.to_string(),
        })?;

    info!(
        command = %command,
        duration_ms = start.elapsed().as_millis(),
        success = output.status.success(),
        "git (CLI)"
    );

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(GitError::CommandFailed {
            command,
            reason: if stderr.is_empty() {
                format!("exited with {}", output.status)
            } else {
                stderr
            },
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Clone `url` into `dest`
#[instrument(skip(url), fields(dest = %dest.display()))]
pub fn git_clone(url: &str, dest: &Path) -> Result<()> {
    let parent = dest.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(parent).map_err(|e| GitError::CommandFailed {
        command: "clone".to_string(),
        reason: e.to_string(),
    })?;
    let dest_str = dest.to_string_lossy();
    run_git(parent, &["clone", url, dest_str.as_ref()])?;
    Ok(())
}

impl GitRepo {
    /// `git pull` in the working tree
    pub fn pull(&self) -> Result<()> {
        run_git(self.workdir()?, &["pull"])?;
        Ok(())
    }

    /// Commit all tracked changes, GPG-signed when `sign`
    pub fn commit_all(&self, message: &str, sign: bool) -> Result<()> {
        let mut args = vec!["commit", "-a"];
        if sign {
            args.push("-S");
        }
        args.extend(["-m", message]);
        run_git(self.workdir()?, &args)?;
        Ok(())
    }

    /// Create (or replace) an annotated tag on HEAD, GPG-signed when `sign`
    pub fn create_release_tag(&self, name: &str, message: &str, sign: bool) -> Result<()> {
        let mut args = vec!["tag", "-f", "-m", message];
        if sign {
            args.push("-s");
        }
        args.push(name);
        run_git(self.workdir()?, &args)?;
        Ok(())
    }

    /// Force-push all tags to `remote`
    pub fn push_tags(&self, remote: &str) -> Result<()> {
        run_git(self.workdir()?, &["push", "-f", "--tags", remote])
            .map_err(|e| GitError::PushFailed(format!("tags to {}: {}", remote, e)))?;
        Ok(())
    }

    /// Push the current branch to `remote`
    pub fn push(&self, remote: &str) -> Result<()> {
        run_git(self.workdir()?, &["push", remote])
            .map_err(|e| GitError::PushFailed(format!("{}: {}", remote, e)))?;
        Ok(())
    }
}
