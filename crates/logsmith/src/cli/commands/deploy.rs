//! Deploy command

use clap::Args;
use serde::Serialize;
use tracing::info;

use logsmith_changelog::{ChangelogBuilder, Deployment, PublishOutcome, ReleaseContext, ReleasesRepo};
use logsmith_core::Config;
use logsmith_git::GitRepo;

use crate::cli::output;
use crate::cli::{Cli, OutputFormat};

/// Publish release notes for HEAD to the releases repository
#[derive(Debug, Args)]
pub struct DeployCommand {
    /// Releases repository (owner/repo), defaults to the configured one
    #[arg(long, value_name = "OWNER/REPO")]
    pub releases: Option<String>,

    /// Access token used when cloning the releases repository
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Title used in the changelog entry heading
    #[arg(long)]
    pub title: Option<String>,

    /// Version X.Y[.Z] instead of the one derived from tags
    #[arg(long, value_name = "VERSION")]
    pub ver: Option<String>,

    /// Pull an existing releases checkout before preparing
    #[arg(long)]
    pub pull: bool,

    /// Don't sign the commit and tags
    #[arg(long)]
    pub no_sign: bool,

    /// Don't push the releases repository
    #[arg(long)]
    pub no_push: bool,

    /// Prepare the notes without committing, tagging or pushing
    #[arg(long)]
    pub dry_run: bool,
}

/// JSON form of the command result
#[derive(Debug, Serialize)]
struct DeployReport<'a> {
    releases: &'a str,
    #[serde(flatten)]
    deployment: &'a Deployment,
    #[serde(skip_serializing_if = "Option::is_none")]
    outcome: Option<PublishOutcome>,
}

impl DeployCommand {
    /// Execute the deploy command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(
            releases = ?self.releases,
            dry_run = self.dry_run,
            "executing deploy command"
        );
        let cwd = std::env::current_dir()?;
        let config = cli.load_config(&cwd)?;

        let source = GitRepo::discover(&cwd)?;
        let workdir = source.workdir()?.to_path_buf();
        let context = ReleaseContext::resolve(&source, &config, self.ver.as_deref())?;
        let slug = self.slug(&config, &context);

        let dir = ReleasesRepo::default_path(&workdir, &slug);
        if cli.chatty() {
            output::info(&format!(
                "Preparing {} for '{}' in {}",
                output::version_style().apply_to(&context.version),
                slug,
                output::path_style().apply_to(dir.display())
            ));
        }
        let releases = ReleasesRepo::open_or_clone(
            &dir,
            &slug,
            &config.links.host,
            self.token.as_deref(),
            self.pull,
        )?;

        let (sign, push) = self.publish_flags(&config);
        let remote = config.git.remote.clone();
        let marker = config.releases.marker_tag.clone();

        let builder = ChangelogBuilder::new(config, context, &workdir)?;
        let deployment = Deployment::prepare(&builder, &source, &releases, self.title.as_deref())?;

        if cli.chatty() {
            if deployment.is_already_published() {
                output::warning("HEAD is already published, notes were left untouched");
            }
            println!(
                "{}",
                output::key_value("Notes", &deployment.notes_path().display().to_string())
            );
            println!(
                "{}",
                output::key_value("Changelog", &deployment.changelog_path().display().to_string())
            );
            println!("----\n{}\n----", deployment.notes());
        }

        let outcome = if self.dry_run {
            if cli.chatty() {
                output::warning("Dry run, nothing committed");
            }
            None
        } else {
            let outcome = deployment.publish(&releases, &remote, &marker, sign, push)?;
            if cli.chatty() {
                output::success(&format!(
                    "Published {} to {}{}",
                    output::version_style().apply_to(deployment.version()),
                    slug,
                    if outcome.pushed { "" } else { " (not pushed)" }
                ));
            }
            Some(outcome)
        };

        if cli.format == OutputFormat::Json {
            let report = DeployReport {
                releases: &slug,
                deployment: &deployment,
                outcome,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }

        Ok(())
    }

    /// `--releases`, then the configured repository, then the source
    /// repository itself
    fn slug(&self, config: &Config, context: &ReleaseContext) -> String {
        self.releases
            .clone()
            .or_else(|| config.releases.repo.clone())
            .unwrap_or_else(|| context.repository.clone())
    }

    /// Configured signing and pushing, narrowed by the command flags
    fn publish_flags(&self, config: &Config) -> (bool, bool) {
        (
            config.releases.sign && !self.no_sign,
            config.releases.push && !self.no_push,
        )
    }
}
