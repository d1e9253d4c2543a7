//! Changes command

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use tracing::info;

use logsmith_changelog::{
    write_changes, write_version, Changes, ChangelogBuilder, ReleaseContext,
};
use logsmith_core::Config;
use logsmith_git::GitRepo;

use crate::cli::output;
use crate::cli::{Cli, OutputFormat};

/// Render the changes since a reference
#[derive(Debug, Args)]
pub struct ChangesCommand {
    /// Git reference to collect changes from (tag, branch or commit)
    #[arg(long = "ref", value_name = "REF")]
    pub reference: String,

    /// Leave out the comments section
    #[arg(long)]
    pub no_comments: bool,

    /// Write the changes to a file instead of printing them
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,

    /// Releases repository (owner/repo) used for links
    #[arg(long, value_name = "OWNER/REPO")]
    pub releases: Option<String>,

    /// Changelog file to update, the configured one when no path is given
    #[arg(long, value_name = "PATH", num_args = 0..=1)]
    pub log: Option<Option<PathBuf>>,

    /// Title used in the changelog entry heading
    #[arg(long)]
    pub title: Option<String>,

    /// Version X.Y[.Z] instead of the one derived from tags
    #[arg(long, value_name = "VERSION")]
    pub ver: Option<String>,

    /// File to write the bare version to
    #[arg(long, value_name = "PATH")]
    pub mkver: Option<PathBuf>,
}

/// JSON form of the command result
#[derive(Debug, Serialize)]
struct ChangesReport<'a> {
    #[serde(flatten)]
    context: &'a ReleaseContext,
    from: &'a str,
    from_commit: Option<&'a str>,
    changes: &'a str,
}

impl ChangesCommand {
    /// Execute the changes command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(
            reference = %self.reference,
            comments = !self.no_comments,
            log = ?self.log,
            "executing changes command"
        );
        let cwd = std::env::current_dir()?;
        let config = cli.load_config(&cwd)?;

        let repo = GitRepo::discover(&cwd)?;
        let workdir = repo.workdir()?.to_path_buf();
        let releases = self
            .releases
            .clone()
            .or_else(|| config.releases.repo.clone());
        let include_comments = !self.no_comments && config.changelog.include_comments;

        let context = ReleaseContext::resolve(&repo, &config, self.ver.as_deref())?;
        if cli.chatty() {
            output::info(&format!(
                "Collecting changelog for '{}'...",
                context.repository
            ));
            println!("{}", output::key_value("Branch", &context.branch));
            println!("{}", output::key_value("Commit", &context.commit));
            println!(
                "{}",
                output::key_value(
                    "Date",
                    &context
                        .date
                        .format(&config.changelog.datetime_format)
                        .to_string()
                )
            );
            println!(
                "{}",
                output::key_value(
                    "Version",
                    &output::version_style()
                        .apply_to(&context.version)
                        .to_string()
                )
            );
        }

        let builder = ChangelogBuilder::new(config, context, &workdir)?;
        let changes = builder.collect(
            &repo,
            &self.reference,
            include_comments,
            releases.as_deref(),
        )?;

        match (&self.out, cli.format) {
            (Some(path), _) => {
                write_changes(path, &changes)?;
                if cli.chatty() {
                    output::success(&format!(
                        "Changes written to {}",
                        output::path_style().apply_to(path.display())
                    ));
                }
            }
            (None, OutputFormat::Json) => print_json(builder.context(), &changes)?,
            (None, OutputFormat::Text) => {
                println!("Changes since {}:\n----\n{}\n----", changes.from_label, changes.text);
            }
        }

        if let Some(log) = self.log_path(builder.config()) {
            if cli.chatty() {
                output::info(&format!(
                    "Updating changelog: {}",
                    output::path_style().apply_to(log.display())
                ));
            }
            let entry = builder.entry(&changes, self.title.as_deref(), releases.as_deref());
            builder.update_log(&log, &entry, &workdir)?;
        }

        if let Some(path) = &self.mkver {
            write_version(path, &builder.context().version)?;
            if cli.chatty() {
                output::success(&format!(
                    "Version {} written to {}",
                    builder.context().version.bare(),
                    output::path_style().apply_to(path.display())
                ));
            }
        }

        Ok(())
    }

    /// Changelog to update, relative paths resolve against the current directory
    fn log_path(&self, config: &Config) -> Option<PathBuf> {
        self.log
            .as_ref()
            .map(|path| path.clone().unwrap_or_else(|| config.changelog.file.clone()))
    }
}

fn print_json(context: &ReleaseContext, changes: &Changes) -> anyhow::Result<()> {
    let report = ChangesReport {
        context,
        from: &changes.from_label,
        from_commit: changes.from_hash.as_deref(),
        changes: &changes.text,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use clap::Parser;
    use logsmith_changelog::ReleaseVersion;

    use crate::cli::Commands;

    fn changes(args: &[&str]) -> ChangesCommand {
        let cli = Cli::try_parse_from(["logsmith", "changes", "--ref", "v1"].iter().chain(args))
            .unwrap();
        match cli.command {
            Commands::Changes(cmd) => cmd,
            _ => panic!("expected changes command"),
        }
    }

    #[test]
    fn test_log_path_defaults_to_configured_file() {
        let config = Config::default();

        assert_eq!(changes(&[]).log_path(&config), None);
        assert_eq!(
            changes(&["--log"]).log_path(&config),
            Some(PathBuf::from("CHANGELOG.md"))
        );
        assert_eq!(
            changes(&["--log", "docs/HISTORY.md"]).log_path(&config),
            Some(PathBuf::from("docs/HISTORY.md"))
        );
    }

    #[test]
    fn test_report_json_shape() {
        let context = ReleaseContext {
            repository: "acme/widgets".to_string(),
            branch: "main".to_string(),
            commit: "f".repeat(40),
            date: Utc.timestamp_opt(0, 0).unwrap(),
            version: ReleaseVersion::from_override("1.0"),
        };
        let report = ChangesReport {
            context: &context,
            from: "v0.9",
            from_commit: None,
            changes: "Security updates",
        };

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["repository"], "acme/widgets");
        assert_eq!(value["version"], "v1.0");
        assert_eq!(value["from"], "v0.9");
        assert_eq!(value["changes"], "Security updates");
        assert!(value["from_commit"].is_null());
    }
}
