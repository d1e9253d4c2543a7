//! Release changelog building
//!
//! Ties repository facts, commit collection and rendering together:
//! [`ReleaseContext`] gathers what is known about HEAD, [`ChangelogBuilder`]
//! renders the changes since a reference and turns them into a changelog
//! entry.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use logsmith_core::error::{ChangelogError, GitError};
use logsmith_core::{Config, Result};
use logsmith_git::{CommitOrder, GitRepo};

use crate::collection::CommitCollection;
use crate::commit::Commit;
use crate::generator::ChangelogGenerator;
use crate::links::IssueLinker;
use crate::merge::{ChangelogEntry, ChangelogFile};
use crate::version::ReleaseVersion;

/// Levels body headings are pushed below the entry title
pub const ENTRY_HEADING_SHIFT: usize = 1;

/// Facts about the release being described
#[derive(Debug, Clone, Serialize)]
pub struct ReleaseContext {
    /// `owner/repo` of the source repository
    pub repository: String,
    /// Branch containing HEAD
    pub branch: String,
    /// Full HEAD hash
    pub commit: String,
    /// HEAD commit time
    pub date: DateTime<Utc>,
    /// Release version
    pub version: ReleaseVersion,
}

impl ReleaseContext {
    /// Collect the release facts for HEAD of `repo`
    #[instrument(skip(repo, config), fields(path = %repo.path().display()))]
    pub fn resolve(repo: &GitRepo, config: &Config, version_override: Option<&str>) -> Result<Self> {
        let head = repo.head_info()?;

        let repository = match repo.remote_slug(&config.git.remote) {
            Ok(Some(slug)) => slug,
            Ok(None) | Err(GitError::RemoteNotFound(_)) => {
                let name = repo.workdir_name().unwrap_or_default();
                warn!(remote = %config.git.remote, fallback = %name, "no usable remote, using directory name");
                name
            }
            Err(e) => return Err(e.into()),
        };

        let containing = repo.branches_containing(&head.hash)?;
        let current = repo.current_branch()?;
        let branch = match current {
            Some(name) if containing.contains(&name) => name,
            _ => containing
                .into_iter()
                .next()
                .unwrap_or_else(|| config.git.default_branch.clone()),
        };

        let version = match version_override {
            Some(v) => ReleaseVersion::from_override(v),
            None => {
                let described = repo.describe(&config.git.tag_match)?;
                ReleaseVersion::from_describe(&described)
                    .ok_or_else(|| GitError::VersionNotFound(described.clone()))?
            }
        };

        info!(
            repository = %repository,
            branch = %branch,
            commit = %head.short_hash,
            version = %version,
            "release context resolved"
        );

        Ok(Self {
            repository,
            branch,
            commit: head.hash,
            date: head.timestamp,
            version,
        })
    }

    /// Abbreviated HEAD hash
    pub fn short_commit(&self) -> String {
        logsmith_git::short_hash(&self.commit)
    }
}

/// Rendered changes since some starting point
#[derive(Debug, Clone, Serialize)]
pub struct Changes {
    /// Human label of the starting point
    pub from_label: String,
    /// Resolved starting commit; `None` when the whole history was used
    pub from_hash: Option<String>,
    /// Commits examined
    pub commit_count: usize,
    /// Normalized, linked changes text
    pub text: String,
}

/// Builds changes text and changelog entries for one release
pub struct ChangelogBuilder {
    config: Config,
    context: ReleaseContext,
    generator: ChangelogGenerator,
}

impl ChangelogBuilder {
    /// Create a builder; a configured template is loaded relative to `workdir`
    pub fn new(config: Config, context: ReleaseContext, workdir: &Path) -> Result<Self> {
        let generator = ChangelogGenerator::from_config(&config.changelog, workdir)?;
        Ok(Self {
            config,
            context,
            generator,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn context(&self) -> &ReleaseContext {
        &self.context
    }

    /// Linker resolving bare references against `releases`, or the source
    /// repository when no releases repository is given
    pub fn linker(&self, releases: Option<&str>) -> IssueLinker {
        IssueLinker::new(
            self.config.links.host.as_str(),
            Some(releases.unwrap_or(&self.context.repository)),
        )
    }

    /// Render the changes between `from_ref` and HEAD.
    ///
    /// When `from_ref` does not resolve the whole history is used and the
    /// start is labelled with the root commit.
    #[instrument(skip(self, repo), fields(from_ref, include_comments))]
    pub fn collect(
        &self,
        repo: &GitRepo,
        from_ref: &str,
        include_comments: bool,
        releases: Option<&str>,
    ) -> Result<Changes> {
        let (commits, from_label, from_hash) =
            match repo.commits_since(from_ref, CommitOrder::OldestFirst) {
                Ok(commits) => {
                    let hash = repo.resolve_ref(from_ref)?;
                    (commits, from_ref.to_string(), Some(hash))
                }
                Err(GitError::ReferenceNotFound(_)) => {
                    warn!(from_ref, "reference not found, using the whole history");
                    let commits = repo.all_commits(CommitOrder::OldestFirst)?;
                    let root = commits.first().ok_or(GitError::NoCommits)?;
                    let label = format!("initial commit ({})", root.short_hash);
                    (commits, label, None)
                }
                Err(e) => return Err(e.into()),
            };

        let commit_count = commits.len();
        let collection = CommitCollection::new(commits.iter().map(Commit::parse));
        let text = self.generator.render(&collection, include_comments);
        let text = self.linker(releases).rewrite(&text);

        info!(
            from = %from_label,
            commit_count,
            classified = collection.len(),
            "changes collected"
        );

        Ok(Changes {
            from_label,
            from_hash,
            commit_count,
            text,
        })
    }

    /// Changes consisting of the placeholder only
    pub fn placeholder_changes(&self, from_label: impl Into<String>) -> Changes {
        Changes {
            from_label: from_label.into(),
            from_hash: None,
            commit_count: 0,
            text: self.generator.placeholder().to_string(),
        }
    }

    /// Entry title line
    pub fn entry_title(&self, title: Option<&str>, releases: Option<&str>) -> String {
        let ctx = &self.context;
        let title = title.unwrap_or(&self.config.changelog.title);
        let releases = releases.unwrap_or(&ctx.repository);
        format!(
            "# [{} {}]({}/{}/releases/tag/{}) ({})",
            title,
            ctx.version,
            self.host(),
            releases,
            ctx.version.release_tag(),
            ctx.date.format(&self.config.changelog.date_format),
        )
    }

    /// Entry header: branch, date and, when the start is known, a diff link
    pub fn entry_header(&self, changes: &Changes) -> String {
        let ctx = &self.context;
        let mut lines = vec![
            format!("> Branch: `{}`", ctx.branch),
            format!(
                "> Date: `{}`",
                ctx.date.format(&self.config.changelog.datetime_format)
            ),
        ];
        if let Some(from) = &changes.from_hash {
            lines.push(format!(
                "> Diff: [{repo}]({host}/{repo}/compare/{from}...{head})",
                repo = ctx.repository,
                host = self.host(),
                from = from,
                head = ctx.commit,
            ));
        }
        // Trailing backslash is a markdown hard line break
        lines.join("\\\n")
    }

    /// Changelog entry for `changes`
    pub fn entry(
        &self,
        changes: &Changes,
        title: Option<&str>,
        releases: Option<&str>,
    ) -> ChangelogEntry {
        ChangelogEntry::new(
            self.entry_title(title, releases),
            self.entry_header(changes),
            changes.text.clone(),
        )
    }

    /// Preamble text from `workdir`, if the file exists and is not blank
    pub fn read_preamble(&self, workdir: &Path) -> Result<Option<String>> {
        let path = workdir.join(&self.config.changelog.preamble);
        match std::fs::read_to_string(&path) {
            Ok(text) => {
                let text = text.trim().to_string();
                debug!(path = %path.display(), empty = text.is_empty(), "preamble read");
                Ok(Some(text).filter(|t| !t.is_empty()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ChangelogError::Io(e).into()),
        }
    }

    /// Merge `entry` into the changelog at `path`, using the preamble found
    /// in `workdir`
    #[instrument(skip(self, entry), fields(path = %path.display()))]
    pub fn update_log(&self, path: &Path, entry: &ChangelogEntry, workdir: &Path) -> Result<()> {
        let preamble = self.read_preamble(workdir)?;
        ChangelogFile::new(path).merge(entry, preamble.as_deref(), ENTRY_HEADING_SHIFT)?;
        Ok(())
    }

    fn host(&self) -> &str {
        self.config.links.host.trim_end_matches('/')
    }
}

/// Write the changes text followed by a newline
pub fn write_changes(path: &Path, changes: &Changes) -> Result<()> {
    std::fs::write(path, format!("{}\n", changes.text))
        .map_err(|e| ChangelogError::write_failed(path, e))?;
    info!(path = %path.display(), "changes written");
    Ok(())
}

/// Write the version without its `v` prefix and without a newline
pub fn write_version(path: &Path, version: &ReleaseVersion) -> Result<()> {
    std::fs::write(path, version.bare()).map_err(|e| ChangelogError::write_failed(path, e))?;
    info!(path = %path.display(), version = %version, "version written");
    Ok(())
}
