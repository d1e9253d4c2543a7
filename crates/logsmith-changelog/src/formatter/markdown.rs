//! Markdown changelog formatter

use tracing::{debug, instrument};

use super::{ChangelogFormatter, RenderContext};
use crate::template::ChangesTemplate;

/// Markdown changelog formatter
pub struct MarkdownFormatter {
    template: ChangesTemplate,
    /// Append the short hash to every bullet
    pub include_hashes: bool,
}

impl MarkdownFormatter {
    /// Create a formatter using the template's bullet formats
    pub fn new(template: ChangesTemplate) -> Self {
        Self {
            template,
            include_hashes: false,
        }
    }

    /// Append short hashes to bullets
    pub fn with_hashes(mut self, include_hashes: bool) -> Self {
        self.include_hashes = include_hashes;
        self
    }
}

impl Default for MarkdownFormatter {
    fn default() -> Self {
        Self::new(ChangesTemplate::builtin())
    }
}

impl ChangelogFormatter for MarkdownFormatter {
    #[instrument(skip(self, context), fields(section_count = context.sections.len()))]
    fn format(&self, context: &RenderContext<'_>) -> String {
        let mut output = String::new();

        // Sections sit one level below the title when there is one
        let heading = match context.title {
            Some(title) => {
                output.push_str(&format!("# {}\n\n", title));
                "##"
            }
            None => "#",
        };

        for section in &context.sections {
            output.push_str(&format!("{} {}\n\n", heading, section.title));
            for commit in &section.commits {
                output.push_str(&self.template.bullet(commit, self.include_hashes));
                output.push('\n');
            }
            output.push('\n');
        }

        if !context.comments.is_empty() {
            output.push_str(&format!("{} {}\n\n", heading, self.template.comments_title));
            for comment in context.comments {
                output.push_str(comment);
                output.push_str("\n\n");
            }
        }

        debug!(output_len = output.len(), "markdown changes formatted");
        output
    }
}
