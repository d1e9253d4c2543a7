//! CLI definition and command handling

pub mod commands;
pub mod output;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::debug;

use logsmith_core::config::{load_config, load_config_or_default};
use logsmith_core::Config;

use commands::{ChangesCommand, CompletionsCommand, DeployCommand};

/// logsmith - changelog generator for git repositories
#[derive(Debug, Parser)]
#[command(name = "logsmith")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Working directory
    #[arg(short = 'C', long, global = true)]
    pub directory: Option<PathBuf>,

    /// Configuration file (discovered from the working directory by default)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Render the changes since a reference and optionally update a changelog
    Changes(ChangesCommand),

    /// Publish release notes to the releases repository
    Deploy(DeployCommand),

    /// Generate shell completions
    Completions(CompletionsCommand),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> anyhow::Result<()> {
        // Change to specified directory if provided
        if let Some(dir) = &self.directory {
            std::env::set_current_dir(dir)?;
        }

        match self.command {
            Commands::Changes(ref cmd) => cmd.execute(&self),
            Commands::Deploy(ref cmd) => cmd.execute(&self),
            Commands::Completions(ref cmd) => cmd.execute(&self),
        }
    }

    /// Load `--config` when given, otherwise discover one from `dir`
    pub fn load_config(&self, dir: &Path) -> logsmith_core::Result<Config> {
        let (config, path) = match &self.config {
            Some(path) => (load_config(path)?, Some(path.clone())),
            None => load_config_or_default(dir)?,
        };
        debug!(path = ?path, "configuration loaded");
        Ok(config)
    }

    /// Whether human-readable progress should be printed
    pub fn chatty(&self) -> bool {
        !self.quiet && self.format == OutputFormat::Text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_changes() {
        let cli = Cli::try_parse_from([
            "logsmith",
            "changes",
            "--ref",
            "v1.0",
            "--no-comments",
            "--log",
            "CHANGELOG.md",
            "--ver",
            "1.2.3",
        ])
        .unwrap();

        let Commands::Changes(cmd) = &cli.command else {
            panic!("expected changes command");
        };
        assert_eq!(cmd.reference, "v1.0");
        assert!(cmd.no_comments);
        assert_eq!(cmd.log, Some(Some(PathBuf::from("CHANGELOG.md"))));
        assert_eq!(cmd.ver.as_deref(), Some("1.2.3"));
        assert!(cmd.out.is_none());
    }

    #[test]
    fn test_changes_requires_ref() {
        assert!(Cli::try_parse_from(["logsmith", "changes"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "logsmith", "changes", "--ref", "HEAD~1", "-q", "--format", "json", "-C", "/tmp",
        ])
        .unwrap();
        assert!(cli.quiet);
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.directory.as_deref(), Some(Path::new("/tmp")));
        assert!(!cli.chatty());
    }

    #[test]
    fn test_parse_deploy() {
        let cli = Cli::try_parse_from([
            "logsmith",
            "deploy",
            "--releases",
            "acme/releases",
            "--token",
            "secret",
            "--no-sign",
            "--dry-run",
        ])
        .unwrap();

        let Commands::Deploy(cmd) = &cli.command else {
            panic!("expected deploy command");
        };
        assert_eq!(cmd.releases.as_deref(), Some("acme/releases"));
        assert_eq!(cmd.token.as_deref(), Some("secret"));
        assert!(cmd.no_sign);
        assert!(!cmd.no_push);
        assert!(cmd.dry_run);
    }

    #[test]
    fn test_load_explicit_config() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("custom.toml");
        std::fs::write(&path, "[changelog]\ntitle = \"Version\"\n").unwrap();

        let cli = Cli::try_parse_from([
            "logsmith",
            "--config",
            path.to_str().unwrap(),
            "changes",
            "--ref",
            "v1",
        ])
        .unwrap();
        let config = cli.load_config(temp.path()).unwrap();
        assert_eq!(config.changelog.title, "Version");
    }

    #[test]
    fn test_load_missing_explicit_config() {
        let temp = TempDir::new().unwrap();
        let cli = Cli::try_parse_from([
            "logsmith",
            "--config",
            "/nonexistent/logsmith.toml",
            "changes",
            "--ref",
            "v1",
        ])
        .unwrap();
        assert!(cli.load_config(temp.path()).is_err());
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
