//! Configuration validation

use chrono::format::{Item, StrftimeItems};
use tracing::debug;

use crate::error::{ConfigError, Result};

use super::types::Config;

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    debug!("validating configuration");
    validate_changelog(config)?;
    validate_git(config)?;
    validate_links(config)?;
    validate_releases(config)?;
    debug!("configuration validation passed");
    Ok(())
}

/// Check that a repository identifier has the `owner/repo` shape
pub fn is_repo_slug(value: &str) -> bool {
    let mut parts = value.split('/');
    matches!(
        (parts.next(), parts.next(), parts.next()),
        (Some(owner), Some(repo), None) if !owner.is_empty() && !repo.is_empty()
    )
}

fn validate_changelog(config: &Config) -> Result<()> {
    if config.changelog.title.trim().is_empty() {
        return Err(ConfigError::InvalidValue {
            field: "changelog.title".to_string(),
            message: "title cannot be empty".to_string(),
        }
        .into());
    }

    if config.changelog.placeholder.trim().is_empty() {
        return Err(ConfigError::InvalidValue {
            field: "changelog.placeholder".to_string(),
            message: "placeholder cannot be empty".to_string(),
        }
        .into());
    }

    for (field, format) in [
        ("changelog.date_format", &config.changelog.date_format),
        ("changelog.datetime_format", &config.changelog.datetime_format),
    ] {
        if !is_strftime_format(format) {
            return Err(ConfigError::InvalidValue {
                field: field.to_string(),
                message: format!("'{}' is not a valid strftime format", format),
            }
            .into());
        }
    }

    Ok(())
}

/// Non-empty and free of unknown `%` specifiers
fn is_strftime_format(format: &str) -> bool {
    !format.is_empty() && !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}

fn validate_git(config: &Config) -> Result<()> {
    if config.git.remote.is_empty() {
        return Err(ConfigError::InvalidValue {
            field: "git.remote".to_string(),
            message: "remote cannot be empty".to_string(),
        }
        .into());
    }

    if config.git.tag_match.is_empty() {
        return Err(ConfigError::InvalidValue {
            field: "git.tag_match".to_string(),
            message: "tag pattern cannot be empty".to_string(),
        }
        .into());
    }

    Ok(())
}

fn validate_links(config: &Config) -> Result<()> {
    let host = &config.links.host;
    if !(host.starts_with("https://") || host.starts_with("http://")) {
        return Err(ConfigError::InvalidValue {
            field: "links.host".to_string(),
            message: format!("'{}' must start with http:// or https://", host),
        }
        .into());
    }

    Ok(())
}

fn validate_releases(config: &Config) -> Result<()> {
    if let Some(repo) = &config.releases.repo {
        if !is_repo_slug(repo) {
            return Err(ConfigError::InvalidValue {
                field: "releases.repo".to_string(),
                message: format!("'{}' must be in owner/repo form", repo),
            }
            .into());
        }
    }

    if config.releases.marker_tag.is_empty() {
        return Err(ConfigError::InvalidValue {
            field: "releases.marker_tag".to_string(),
            message: "marker tag cannot be empty".to_string(),
        }
        .into());
    }

    Ok(())
}
