//! Error types for logsmith

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using LogsmithError
pub type Result<T> = std::result::Result<T, LogsmithError>;

/// Main error type for logsmith operations
#[derive(Debug, Error)]
pub enum LogsmithError {
    /// Configuration-related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Git-related errors
    #[error(transparent)]
    Git(#[from] GitError),

    /// Changelog-related errors
    #[error(transparent)]
    Changelog(#[from] ChangelogError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found at {0}")]
    NotFound(PathBuf),

    /// Invalid configuration value
    #[error("Invalid configuration: {field} - {message}")]
    InvalidValue { field: String, message: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// IO error
    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),
}

/// Git-related errors
#[derive(Debug, Error)]
pub enum GitError {
    /// Repository not found
    #[error("Git repository not found at {0}")]
    RepositoryNotFound(PathBuf),

    /// Not a git repository
    #[error("Not a git repository: {0}")]
    NotARepository(PathBuf),

    /// Failed to open repository
    #[error("Failed to open repository: {0}")]
    OpenFailed(String),

    /// Repository has no working tree
    #[error("Repository at {0} is bare")]
    BareRepository(PathBuf),

    /// No commits found
    #[error("No commits found in repository")]
    NoCommits,

    /// Reference does not resolve to a commit
    #[error("Reference not found: {0}")]
    ReferenceNotFound(String),

    /// Describe produced no usable version
    #[error("Unable to determine version from tags matching {0}")]
    VersionNotFound(String),

    /// Remote not found
    #[error("Remote not found: {0}")]
    RemoteNotFound(String),

    /// A git child process exited unsuccessfully
    #[error("git {command} failed: {reason}")]
    CommandFailed { command: String, reason: String },

    /// Failed to push
    #[error("Failed to push to remote: {0}")]
    PushFailed(String),

    /// Git2 library error
    #[error("Git error: {0}")]
    Git2(#[from] git2::Error),
}

/// Changelog-related errors
#[derive(Debug, Error)]
pub enum ChangelogError {
    /// Configured changes template does not exist
    #[error("Changes template not found at {0}")]
    TemplateNotFound(PathBuf),

    /// Changes template could not be parsed
    #[error("Invalid changes template: {0}")]
    TemplateInvalid(String),

    /// Failed to write changelog
    #[error("Failed to write {path}: {reason}")]
    WriteFailed { path: PathBuf, reason: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl LogsmithError {
    /// Create a new "other" error with a message
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Self::Other(msg.into())
    }
}

impl ChangelogError {
    /// Wrap an IO failure that happened while writing `path`
    pub fn write_failed(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::WriteFailed {
            path: path.into(),
            reason: err.to_string(),
        }
    }
}
