//! Configuration types

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for logsmith
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Version of the config schema
    #[serde(rename = "$schema", skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Project name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Changelog configuration
    pub changelog: ChangelogConfig,

    /// Git configuration
    pub git: GitConfig,

    /// Issue and release link configuration
    pub links: LinksConfig,

    /// Releases repository configuration
    pub releases: ReleasesConfig,
}

/// Changelog configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangelogConfig {
    /// Changelog file updated by `--log` when none is given explicitly
    pub file: PathBuf,

    /// Title prefix of each changelog entry heading
    pub title: String,

    /// Custom changes template (TOML); the built-in one is used when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<PathBuf>,

    /// Preamble file, relative to the working tree
    pub preamble: PathBuf,

    /// Text used when no classifiable commits were found
    pub placeholder: String,

    /// Whether commit bodies are rendered as a comments section
    pub include_comments: bool,

    /// Whether bullets carry the short commit hash
    pub include_hashes: bool,

    /// strftime format for entry dates
    pub date_format: String,

    /// strftime format for entry timestamps
    pub datetime_format: String,
}

impl Default for ChangelogConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("CHANGELOG.md"),
            title: "Release".to_string(),
            template: None,
            preamble: PathBuf::from(".changelog"),
            placeholder: "Security updates".to_string(),
            include_comments: true,
            include_hashes: false,
            date_format: "%x".to_string(),
            datetime_format: "%x %X".to_string(),
        }
    }
}

/// Git configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitConfig {
    /// Remote used to derive the repository name
    pub remote: String,

    /// Branch reported when no local branch contains HEAD
    pub default_branch: String,

    /// Glob passed to `git describe --match`
    pub tag_match: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            remote: "origin".to_string(),
            default_branch: "main".to_string(),
            tag_match: "v*.*".to_string(),
        }
    }
}

/// Link configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LinksConfig {
    /// Base URL of the hosting service
    pub host: String,
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            host: "https://github.com".to_string(),
        }
    }
}

/// Releases repository configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleasesConfig {
    /// Releases repository (`owner/repo`); defaults to the source repository
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,

    /// Directory inside the releases repository holding per-version notes
    pub notes_dir: PathBuf,

    /// Changelog file inside the releases repository
    pub changelog: PathBuf,

    /// Annotated tag recording the last published source commit
    pub marker_tag: String,

    /// Whether commits and tags are GPG-signed
    pub sign: bool,

    /// Whether to push after publishing
    pub push: bool,
}

impl Default for ReleasesConfig {
    fn default() -> Self {
        Self {
            repo: None,
            notes_dir: PathBuf::from("notes"),
            changelog: PathBuf::from("CHANGELOG.md"),
            marker_tag: "published".to_string(),
            sign: true,
            push: true,
        }
    }
}
