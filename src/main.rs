//! schisma - CLI entry point.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use schisma::config::{RawConfig, load_config};
use schisma::execute::{DialoguerReviewer, Execution, Executor};
use schisma::git::GitRepository;
use schisma::partition::partition;
use schisma::PartitionError;

/// Split staged changes into coherent conventional commits.
#[derive(Parser, Debug)]
#[command(name = "schisma")]
#[command(about = "Split staged changes into coherent conventional commits")]
#[command(version)]
struct Cli {
    /// Run mode: analyze (report only), auto, or interactive
    #[arg(long)]
    mode: Option<String>,

    /// Maximum number of feature groups (a misc group may be added)
    #[arg(long, allow_hyphen_values = true)]
    max_groups: Option<i64>,

    /// Candidate strategy: path, content, or hybrid
    #[arg(long)]
    strategy: Option<String>,

    /// What to do after a failed commit: continue or abort
    #[arg(long)]
    on_failure: Option<String>,

    /// Path to a TOML config file (defaults to .schisma.toml in the repository)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Repository to operate on
    #[arg(long, default_value = ".")]
    repo: PathBuf,

    /// Print the report or run result as JSON
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Flags that override the config file; unset flags leave it alone.
    fn overrides(&self) -> RawConfig {
        RawConfig {
            mode: self.mode.clone(),
            max_groups: self.max_groups,
            strategy: self.strategy.clone(),
            on_failure: self.on_failure.clone(),
            ..RawConfig::default()
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    // Step 1: Open git repository
    let repo = GitRepository::open(&cli.repo).context(
        "Not a git repository. Run schisma from within a git repository or pass --repo.",
    )?;

    // Step 2: Resolve configuration
    let config = load_config(cli.config.as_deref(), repo.workdir())
        .context("Failed to load configuration")?
        .merge(cli.overrides())
        .resolve();

    // Step 3: Partition staged changes
    let groups = match partition(&repo, &config) {
        Ok(groups) => groups,
        Err(PartitionError::NoStagedChanges) => {
            println!("No staged changes found. Stage changes with 'git add' first.");
            return Ok(());
        }
        Err(e) => return Err(e).context("Failed to partition staged changes"),
    };

    // Step 4: Report or commit
    let executor = Executor::new(&repo, config.failure_policy);
    let mut reviewer = DialoguerReviewer::new();

    match executor.execute(config.mode, &groups, &mut reviewer) {
        Execution::Analysis(report) => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", report.render_text());
            }
        }
        Execution::Run(result) => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print!("{}", result.render_text());
            }

            if !result.is_success() {
                bail!("{} of {} groups failed to commit", result.failed(), result.groups.len());
            }
        }
    }

    Ok(())
}

/// Log to stderr so stdout stays clean for `--json`.
fn init_tracing(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::from_default_env().add_directive("schisma=debug".parse()?)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("schisma=info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    Ok(())
}
