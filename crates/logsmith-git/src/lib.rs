//! logsmith git - repository access for the changelog generator
//!
//! Read-side queries (history, describe, branches, tags, remotes) go through
//! `git2`; clone, pull, push and signed commits/tags shell out to `git`.

mod command;
mod commits;
mod describe;
mod remote;
mod repository;
mod status;
mod tags;
pub mod types;

#[cfg(test)]
mod test_support;

pub use command::{git_clone, run_git};
pub use commits::CommitOrder;
pub use remote::parse_repo_slug;
pub use repository::{GitRepo, Result};
pub use types::{short_hash, CommitInfo, TagInfo};
