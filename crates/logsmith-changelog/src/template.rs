//! Changes template
//!
//! A TOML document describing how classified commits are laid out: which
//! sections exist, in what order, which categories feed them, and how a
//! single commit is written as a bullet. The built-in template lives in
//! `templates/changes.toml`.

use std::path::Path;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use logsmith_core::error::ChangelogError;

use crate::commit::Commit;

const BUILTIN_TEMPLATE_TOML: &str = include_str!("../templates/changes.toml");

static BUILTIN_TEMPLATE: LazyLock<ChangesTemplate> = LazyLock::new(|| {
    toml::from_str(BUILTIN_TEMPLATE_TOML).expect("Invalid built-in template")
});

static PLACEHOLDER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(\w+)\}").expect("Invalid regex"));

/// One titled section fed by one or more categories
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionTemplate {
    /// Section heading text
    pub title: String,
    /// Categories rendered under this heading
    pub categories: Vec<String>,
}

/// Catch-all section for categories no section claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OtherSection {
    pub title: String,
    pub enabled: bool,
}

impl Default for OtherSection {
    fn default() -> Self {
        Self {
            title: "Other changes".to_string(),
            enabled: true,
        }
    }
}

/// Layout of the rendered changes text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangesTemplate {
    /// Sections in render order
    #[serde(default)]
    pub sections: Vec<SectionTemplate>,

    /// Catch-all section
    #[serde(default)]
    pub other: OtherSection,

    /// Bullet for commits without a scope
    #[serde(default = "default_bullet")]
    pub bullet: String,

    /// Bullet for commits with a scope
    #[serde(default = "default_scoped_bullet")]
    pub scoped_bullet: String,

    /// Appended to a bullet when hashes are enabled
    #[serde(default = "default_hash_suffix")]
    pub hash_suffix: String,

    /// Heading of the comments section
    #[serde(default = "default_comments_title")]
    pub comments_title: String,
}

fn default_bullet() -> String {
    "- {description}".to_string()
}

fn default_scoped_bullet() -> String {
    "- **{scope}:** {description}".to_string()
}

fn default_hash_suffix() -> String {
    " ({short_hash})".to_string()
}

fn default_comments_title() -> String {
    "Comments".to_string()
}

impl Default for ChangesTemplate {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ChangesTemplate {
    /// The built-in template
    pub fn builtin() -> Self {
        BUILTIN_TEMPLATE.clone()
    }

    /// Load a template file
    #[instrument(fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self, ChangelogError> {
        if !path.exists() {
            return Err(ChangelogError::TemplateNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        let template = Self::parse(&content)?;
        debug!(sections = template.sections.len(), "template loaded");
        Ok(template)
    }

    /// Parse template TOML
    pub fn parse(content: &str) -> Result<Self, ChangelogError> {
        let template: Self =
            toml::from_str(content).map_err(|e| ChangelogError::TemplateInvalid(e.to_string()))?;
        template.validate()?;
        Ok(template)
    }

    /// The given file, or the built-in template when `path` is `None`
    pub fn load_or_builtin(path: Option<&Path>) -> Result<Self, ChangelogError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::builtin()),
        }
    }

    fn validate(&self) -> Result<(), ChangelogError> {
        for section in &self.sections {
            if section.title.trim().is_empty() {
                return Err(ChangelogError::TemplateInvalid(
                    "section title cannot be empty".to_string(),
                ));
            }
            if section.categories.is_empty() {
                return Err(ChangelogError::TemplateInvalid(format!(
                    "section '{}' has no categories",
                    section.title
                )));
            }
        }
        if self.other.enabled && self.other.title.trim().is_empty() {
            return Err(ChangelogError::TemplateInvalid(
                "other section title cannot be empty".to_string(),
            ));
        }
        if self.comments_title.trim().is_empty() {
            return Err(ChangelogError::TemplateInvalid(
                "comments_title cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Index of the first section claiming `category`
    pub fn section_for(&self, category: &str) -> Option<usize> {
        self.sections
            .iter()
            .position(|s| s.categories.iter().any(|c| c == category))
    }

    /// Render one commit as a bullet line
    pub fn bullet(&self, commit: &Commit, include_hash: bool) -> String {
        let format = match commit.scope() {
            Some(_) => &self.scoped_bullet,
            None => &self.bullet,
        };
        let mut line = substitute(format, commit);
        if include_hash {
            line.push_str(&substitute(&self.hash_suffix, commit));
        }
        line
    }
}

/// Single-pass `{name}` substitution; unknown names are left as written
fn substitute(format: &str, commit: &Commit) -> String {
    PLACEHOLDER_REGEX
        .replace_all(format, |caps: &Captures<'_>| {
            let value = match &caps[1] {
                "description" => commit.description(),
                "scope" => commit.scope().unwrap_or_default(),
                "category" => commit.category().unwrap_or_default(),
                "hash" => commit.hash.as_str(),
                "short_hash" => commit.short_hash.as_str(),
                "subject" => commit.subject.as_str(),
                _ => return caps[0].to_string(),
            };
            value.to_string()
        })
        .into_owned()
}
