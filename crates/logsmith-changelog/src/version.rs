//! Release version strings

use std::fmt;

use serde::Serialize;

/// A release version such as `v1.2.3`.
///
/// Derived from `git describe` output: dashes become dots and only the first
/// three components are kept, so `v1.2-5-gabc1234` becomes `v1.2.5`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ReleaseVersion(String);

impl ReleaseVersion {
    /// Version from `git describe` output, `None` when empty
    pub fn from_describe(described: &str) -> Option<Self> {
        let dotted = described.trim().replace('-', ".");
        let version = dotted
            .split('.')
            .take(3)
            .collect::<Vec<_>>()
            .join(".");
        if version.is_empty() {
            None
        } else {
            Some(Self(version))
        }
    }

    /// Version given explicitly; a leading `v` is added when missing
    pub fn from_override(version: &str) -> Self {
        let version = version.trim();
        if version.starts_with('v') {
            Self(version.to_string())
        } else {
            Self(format!("v{}", version))
        }
    }

    /// The version as written, e.g. `v1.2.3`
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Without the leading `v`, e.g. `1.2.3`
    pub fn bare(&self) -> &str {
        self.0.strip_prefix('v').unwrap_or(&self.0)
    }

    /// Release tag name, e.g. `release-1.2.3`
    pub fn release_tag(&self) -> String {
        format!("release-{}", self.bare())
    }
}

impl fmt::Display for ReleaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
