//! Publishing release notes to a releases repository
//!
//! The releases repository is a separate git repository, checked out next to
//! the source tree, that collects a `CHANGELOG.md` and one notes file per
//! version. An annotated marker tag in it records which source commit was
//! published last, so the next deployment knows where its changes start.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use logsmith_core::error::{ChangelogError, GitError};
use logsmith_core::{LogsmithError, Result};
use logsmith_git::{git_clone, GitRepo};

use crate::builder::ChangelogBuilder;
use crate::markdown::shift_headings;
use crate::version::ReleaseVersion;

/// Levels notes headings are pushed down (`# Fixes` becomes `#### Fixes`)
pub const NOTES_HEADING_SHIFT: usize = 3;

/// A checked-out releases repository
pub struct ReleasesRepo {
    repo: GitRepo,
    slug: String,
}

impl ReleasesRepo {
    /// Default checkout location: a sibling of the source working tree
    /// named after the repository (`../<repo>`)
    pub fn default_path(source_workdir: &Path, slug: &str) -> PathBuf {
        let name = slug.rsplit('/').next().unwrap_or(slug);
        source_workdir
            .parent()
            .unwrap_or(source_workdir)
            .join(name)
    }

    /// HTTPS clone URL, with the token as user info when given
    pub fn clone_url(host: &str, slug: &str, token: Option<&str>) -> String {
        let host = host.trim_end_matches('/');
        match (token.filter(|t| !t.is_empty()), host.split_once("://")) {
            (Some(token), Some((scheme, rest))) => {
                format!("{}://{}@{}/{}.git", scheme, token, rest, slug)
            }
            _ => format!("{}/{}.git", host, slug),
        }
    }

    /// Open an existing checkout
    pub fn open(dir: &Path, slug: impl Into<String>) -> Result<Self> {
        let repo = GitRepo::open(dir)?;
        repo.workdir()?;
        Ok(Self {
            repo,
            slug: slug.into(),
        })
    }

    /// Open the checkout at `dir`, cloning it first when missing.
    ///
    /// An existing checkout is pulled when `pull` is set.
    #[instrument(skip(token), fields(dir = %dir.display(), slug))]
    pub fn open_or_clone(
        dir: &Path,
        slug: &str,
        host: &str,
        token: Option<&str>,
        pull: bool,
    ) -> Result<Self> {
        if dir.exists() {
            let releases = Self::open(dir, slug)?;
            if pull {
                info!(slug, "pulling releases repository");
                releases.repo.pull()?;
            }
            return Ok(releases);
        }

        info!(slug, "cloning releases repository");
        git_clone(&Self::clone_url(host, slug, token), dir)?;
        Self::open(dir, slug)
    }

    pub fn repo(&self) -> &GitRepo {
        &self.repo
    }

    /// `owner/repo`
    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn workdir(&self) -> Result<&Path> {
        Ok(self.repo.workdir()?)
    }

    /// Source commit recorded by the marker tag, `None` before the first
    /// deployment
    pub fn published_commit(&self, marker: &str) -> Result<Option<String>> {
        let commit = self
            .repo
            .find_tag(marker)?
            .and_then(|tag| tag.message_headline().map(str::to_string));
        debug!(marker, commit = ?commit, "published commit");
        Ok(commit)
    }
}

/// What [`Deployment::publish`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PublishOutcome {
    /// A new commit was created in the releases repository
    pub committed: bool,
    /// Tags and commits were pushed
    pub pushed: bool,
}

/// Release notes prepared in a releases repository
#[derive(Debug, Clone, Serialize)]
pub struct Deployment {
    version: ReleaseVersion,
    source_commit: String,
    previous_commit: Option<String>,
    notes: String,
    notes_path: PathBuf,
    changelog_path: PathBuf,
    already_published: bool,
}

impl Deployment {
    /// Write the notes file and merge the changelog entry for HEAD of
    /// `source`, then stage both.
    ///
    /// When the marker tag already records HEAD, nothing is written and the
    /// existing notes are read back.
    #[instrument(skip_all, fields(slug = releases.slug()))]
    pub fn prepare(
        builder: &ChangelogBuilder,
        source: &GitRepo,
        releases: &ReleasesRepo,
        title: Option<&str>,
    ) -> Result<Self> {
        let config = &builder.config().releases;
        let context = builder.context();
        let workdir = releases.workdir()?;

        let notes_rel = config
            .notes_dir
            .join(format!("release-{}.md", context.version.bare()));
        let notes_path = workdir.join(&notes_rel);
        let changelog_path = workdir.join(&config.changelog);

        let previous_commit = releases.published_commit(&config.marker_tag)?;
        let mut deployment = Self {
            version: context.version.clone(),
            source_commit: context.commit.clone(),
            previous_commit: previous_commit.clone(),
            notes: String::new(),
            notes_path,
            changelog_path,
            already_published: false,
        };

        if previous_commit.as_deref() == Some(context.commit.as_str()) {
            info!(commit = %context.short_commit(), "already published");
            deployment.already_published = true;
            deployment.notes = match std::fs::read_to_string(&deployment.notes_path) {
                Ok(notes) => notes,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    warn!(path = %deployment.notes_path.display(), "published notes missing");
                    String::new()
                }
                Err(e) => return Err(ChangelogError::Io(e).into()),
            };
            return Ok(deployment);
        }

        let changes = match &previous_commit {
            Some(previous) => builder.collect(source, previous, true, Some(releases.slug()))?,
            None => {
                info!("clean releases repository");
                builder.placeholder_changes("clean releases repository")
            }
        };

        deployment.notes = shift_headings(&changes.text, NOTES_HEADING_SHIFT);
        if let Some(parent) = deployment.notes_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ChangelogError::write_failed(parent, e))?;
        }
        std::fs::write(&deployment.notes_path, format!("{}\n", deployment.notes))
            .map_err(|e| ChangelogError::write_failed(&deployment.notes_path, e))?;

        let entry = builder.entry(&changes, title, Some(releases.slug()));
        builder.update_log(&deployment.changelog_path, &entry, source.workdir()?)?;

        releases
            .repo()
            .stage(&[notes_rel.as_path(), config.changelog.as_path()])?;

        info!(
            version = %deployment.version,
            from = %changes.from_label,
            notes = %deployment.notes_path.display(),
            "deployment prepared"
        );
        Ok(deployment)
    }

    pub fn version(&self) -> &ReleaseVersion {
        &self.version
    }

    /// Notes text as written to the notes file
    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn notes_path(&self) -> &Path {
        &self.notes_path
    }

    pub fn changelog_path(&self) -> &Path {
        &self.changelog_path
    }

    /// Source commit the previous deployment recorded
    pub fn previous_commit(&self) -> Option<&str> {
        self.previous_commit.as_deref()
    }

    /// Whether HEAD was already published before this run
    pub fn is_already_published(&self) -> bool {
        self.already_published
    }

    /// Commit message of the releases repository commit
    pub fn commit_message(&self) -> String {
        format!("Update to version {}", self.version)
    }

    /// Commit, tag and optionally push the releases repository.
    ///
    /// The version tag and the marker tag are replaced when they exist. The
    /// marker tag's message is the published source commit.
    #[instrument(skip(self, releases), fields(version = %self.version))]
    pub fn publish(
        &self,
        releases: &ReleasesRepo,
        remote: &str,
        marker: &str,
        sign: bool,
        push: bool,
    ) -> Result<PublishOutcome> {
        let repo = releases.repo();
        let message = self.commit_message();

        let committed = if repo.has_staged_changes()? {
            repo.commit_all(&message, sign)?;
            info!(message = %message, sign, "releases repository committed");
            true
        } else {
            let head = repo.head_info()?;
            if head.summary().trim() != message {
                return Err(LogsmithError::other(format!(
                    "nothing to commit and releases HEAD is '{}', expected '{}'",
                    head.summary().trim(),
                    message
                )));
            }
            info!("releases repository already committed");
            false
        };

        repo.create_release_tag(&self.version.release_tag(), &message, sign)?;
        repo.create_annotated_tag(marker, &self.source_commit, true)?;

        let pushed = if push {
            let upstream = format!("{}/HEAD", remote);
            let ahead = match repo.commits_ahead_of(&upstream) {
                Ok(count) => count,
                Err(GitError::ReferenceNotFound(_)) => {
                    warn!(upstream = %upstream, "upstream not found, pushing everything");
                    usize::MAX
                }
                Err(e) => return Err(e.into()),
            };

            if ahead > 0 {
                repo.push_tags(remote)?;
                repo.push(remote)?;
                info!(remote, "releases repository pushed");
                true
            } else {
                info!(remote, "releases repository already pushed");
                false
            }
        } else {
            debug!("push disabled");
            false
        };

        Ok(PublishOutcome { committed, pushed })
    }
}
