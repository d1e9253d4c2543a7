//! Changes text generation

use std::path::Path;

use logsmith_core::config::ChangelogConfig;
use logsmith_core::error::ChangelogError;
use tracing::{debug, info, instrument};

use crate::collection::CommitCollection;
use crate::formatter::{ChangelogFormatter, MarkdownFormatter, RenderContext};
use crate::markdown;
use crate::template::ChangesTemplate;

/// Renders a commit collection into normalized changes text
pub struct ChangelogGenerator {
    template: ChangesTemplate,
    formatter: Box<dyn ChangelogFormatter>,
    placeholder: String,
    title: Option<String>,
}

impl ChangelogGenerator {
    /// Create a generator with the markdown formatter
    pub fn new(template: ChangesTemplate) -> Self {
        Self {
            formatter: Box::new(MarkdownFormatter::new(template.clone())),
            template,
            placeholder: ChangelogConfig::default().placeholder,
            title: None,
        }
    }

    /// Create a generator from configuration.
    ///
    /// A configured template path is resolved against `workdir`; a missing
    /// or malformed template is an error.
    pub fn from_config(config: &ChangelogConfig, workdir: &Path) -> Result<Self, ChangelogError> {
        let template_path = config.template.as_ref().map(|p| workdir.join(p));
        let template = ChangesTemplate::load_or_builtin(template_path.as_deref())?;

        Ok(Self {
            formatter: Box::new(
                MarkdownFormatter::new(template.clone()).with_hashes(config.include_hashes),
            ),
            template,
            placeholder: config.placeholder.clone(),
            title: None,
        })
    }

    /// Use a custom formatter
    pub fn with_formatter<F: ChangelogFormatter + 'static>(mut self, formatter: F) -> Self {
        self.formatter = Box::new(formatter);
        self
    }

    /// Text used when nothing renders
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Title heading rendered above the sections
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// The template in use
    pub fn template(&self) -> &ChangesTemplate {
        &self.template
    }

    /// The placeholder text
    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Render `collection`; never returns an empty string
    #[instrument(skip(self, collection), fields(commit_count = collection.len()))]
    pub fn render(&self, collection: &CommitCollection, include_comments: bool) -> String {
        let context = RenderContext::build(
            &self.template,
            collection,
            self.title.as_deref(),
            include_comments,
        );
        let raw = self.formatter.format(&context);
        let text = markdown::normalize_or(&raw, &self.placeholder);

        if context.is_empty() {
            info!(placeholder = %self.placeholder, "no classified commits, using placeholder");
        }
        debug!(
            sections = context.sections.len(),
            output_len = text.len(),
            "changes rendered"
        );
        text
    }
}
