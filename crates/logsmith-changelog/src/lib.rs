//! logsmith changelog - commit classification, rendering and changelog merging
//!
//! The pipeline runs commit records through [`Commit::parse`], groups them in
//! a [`CommitCollection`], renders them with a [`ChangelogGenerator`] and
//! merges the resulting [`ChangelogEntry`] into a changelog file.
//! [`ChangelogBuilder`] drives the whole pipeline for one release and
//! [`Deployment`] publishes it to a releases repository.

pub mod builder;
pub mod collection;
pub mod commit;
pub mod deploy;
pub mod formatter;
pub mod generator;
pub mod links;
pub mod markdown;
pub mod merge;
pub mod template;
pub mod version;

#[cfg(test)]
mod test_support;

pub use builder::{write_changes, write_version, Changes, ChangelogBuilder, ReleaseContext};
pub use collection::CommitCollection;
pub use commit::{Classification, Commit, SUBJECT_PATTERN};
pub use deploy::{Deployment, PublishOutcome, ReleasesRepo};
pub use formatter::{ChangelogFormatter, MarkdownFormatter, RenderContext};
pub use generator::ChangelogGenerator;
pub use links::IssueLinker;
pub use merge::{ChangelogDocument, ChangelogEntry, ChangelogFile};
pub use template::ChangesTemplate;
pub use version::ReleaseVersion;
