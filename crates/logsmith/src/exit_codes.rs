//! Exit codes for the CLI

use logsmith_core::{ChangelogError, ConfigError, GitError, LogsmithError};

/// Success
pub const SUCCESS: u8 = 0;

/// General error
pub const ERROR: u8 = 1;

/// Configuration error
pub const CONFIG_ERROR: u8 = 2;

/// Git error
pub const GIT_ERROR: u8 = 3;

/// Changelog template or write error
pub const CHANGELOG_ERROR: u8 = 6;

/// Exit code for the first recognised error in the chain
pub fn for_error(err: &anyhow::Error) -> u8 {
    for cause in err.chain() {
        if let Some(e) = cause.downcast_ref::<LogsmithError>() {
            return match e {
                LogsmithError::Config(_) => CONFIG_ERROR,
                LogsmithError::Git(_) => GIT_ERROR,
                LogsmithError::Changelog(_) => CHANGELOG_ERROR,
                _ => ERROR,
            };
        }
        if cause.is::<ConfigError>() {
            return CONFIG_ERROR;
        }
        if cause.is::<GitError>() {
            return GIT_ERROR;
        }
        if cause.is::<ChangelogError>() {
            return CHANGELOG_ERROR;
        }
    }
    ERROR
}
