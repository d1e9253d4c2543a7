//! Branch and index status operations

use std::path::Path;

use git2::{BranchType, Oid};
use tracing::{debug, instrument};

use crate::repository::{GitRepo, Result};

impl GitRepo {
    /// Get the current branch name
    pub fn current_branch(&self) -> Result<Option<String>> {
        let head = match self.repo.head() {
            Ok(head) => head,
            Err(e) if e.code() == git2::ErrorCode::UnbornBranch => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        if head.is_branch() {
            Ok(head.shorthand().map(|s| s.to_string()))
        } else {
            // Detached HEAD
            Ok(None)
        }
    }

    /// Local branches whose tip is `hash` or a descendant of it, sorted by name
    #[instrument(skip(self), fields(hash))]
    pub fn branches_containing(&self, hash: &str) -> Result<Vec<String>> {
        let target = Oid::from_str(hash)?;
        let mut names = Vec::new();

        for branch in self.repo.branches(Some(BranchType::Local))? {
            let (branch, _) = branch?;
            let Some(tip) = branch.get().target() else {
                continue;
            };

            if tip == target || self.repo.graph_descendant_of(tip, target)? {
                if let Some(name) = branch.name()? {
                    names.push(name.to_string());
                }
            }
        }

        names.sort();
        debug!(?names, "branches containing commit");
        Ok(names)
    }

    /// Add paths (relative to the working tree) to the index
    #[instrument(skip(self, paths), fields(count = paths.len()))]
    pub fn stage<P: AsRef<Path>>(&self, paths: &[P]) -> Result<()> {
        let mut index = self.repo.index()?;
        index.read(false)?;
        for path in paths {
            index.add_path(path.as_ref())?;
        }
        index.write()?;
        Ok(())
    }

    /// Whether the index differs from the HEAD tree
    pub fn has_staged_changes(&self) -> Result<bool> {
        let head_tree = match self.repo.head() {
            Ok(head) => Some(head.peel_to_tree()?),
            Err(e) if e.code() == git2::ErrorCode::UnbornBranch => None,
            Err(e) => return Err(e.into()),
        };

        // The git CLI may have rewritten the index since it was cached
        let mut index = self.repo.index()?;
        index.read(false)?;
        let diff = self
            .repo
            .diff_tree_to_index(head_tree.as_ref(), Some(&index), None)?;
        Ok(diff.deltas().count() > 0)
    }
}
