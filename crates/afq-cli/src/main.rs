//! `afq-upload` — push AFQ-Browser scan results into the data vault.
//!
//! # Usage
//!
//! ```text
//! DB_SECRET=... afq-upload alice study1
//! DB_SECRET=... afq-upload --manifest manifest.csv --patch
//! ```
//!
//! Settings other than the secret can be given in `afq-upload.toml` (or the
//! file passed with `--config`) and overridden with `AFQ_*` variables.

mod settings;

use std::{path::PathBuf, process::ExitCode};

use afq_core::source::RepoRef;
use afq_source::GitHubSource;
use afq_sync::{Orchestrator, sync_manifest};
use afq_vault::VaultClient;
use anyhow::Context as _;
use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Put AFQ data into the vault")]
struct Cli {
  /// GitHub username owning the repository.
  #[arg(required_unless_present = "manifest")]
  username: Option<String>,

  /// Repository name on GitHub.
  #[arg(required_unless_present = "manifest")]
  repository_name: Option<String>,

  /// CSV manifest with `username` and `repository_name` columns; every
  /// listed repository is synced and failures do not stop the batch.
  #[arg(long, value_name = "FILE", conflicts_with_all = ["username", "repository_name"])]
  manifest: Option<PathBuf>,

  /// Patch records that already exist instead of leaving them untouched.
  #[arg(long)]
  patch: bool,

  /// Session identifier stored on every subject record.
  #[arg(long, value_name = "ID")]
  session_id: Option<String>,

  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "afq-upload.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Fails before any network activity when the secret is missing.
  let mut cfg = settings::load(&cli.config).context("failed to load configuration")?;
  if cli.patch {
    cfg.settings.patch = true;
  }
  if let Some(session_id) = cli.session_id {
    cfg.settings.session_id = session_id;
  }

  let vault = VaultClient::new(&cfg.vault()).context("failed to build vault client")?;
  let source = GitHubSource::new(&cfg.source()).context("failed to build GitHub client")?;
  let options = cfg.sync_options();
  let orchestrator = Orchestrator::new(&vault, &source, &options);

  if let Some(path) = cli.manifest {
    let repos = afq_csv::read_manifest(&path)
      .with_context(|| format!("failed to read manifest {}", path.display()))?;
    tracing::info!(count = repos.len(), "syncing manifest");

    let report = sync_manifest(&orchestrator, &repos).await;
    println!("{report}");
    return Ok(if report.is_success() {
      ExitCode::SUCCESS
    } else {
      ExitCode::FAILURE
    });
  }

  let (Some(username), Some(repository_name)) = (cli.username, cli.repository_name) else {
    anyhow::bail!("USERNAME and REPOSITORY_NAME are required unless --manifest is given");
  };
  let repo = RepoRef::new(username, repository_name);
  let report = orchestrator
    .sync_repository(&repo)
    .await
    .with_context(|| format!("sync failed for {repo}"))?;
  println!("{report}");

  Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
  use clap::CommandFactory;

  use super::*;

  #[test]
  fn cli_definition_is_valid() { Cli::command().debug_assert(); }

  #[test]
  fn positional_repository() {
    let cli = Cli::try_parse_from(["afq-upload", "alice", "study1", "--patch"]).unwrap();
    assert_eq!(cli.username.as_deref(), Some("alice"));
    assert_eq!(cli.repository_name.as_deref(), Some("study1"));
    assert!(cli.patch);
    assert!(cli.manifest.is_none());
  }

  #[test]
  fn manifest_replaces_positionals() {
    let cli = Cli::try_parse_from(["afq-upload", "--manifest", "manifest.csv"]).unwrap();
    assert_eq!(cli.manifest, Some(PathBuf::from("manifest.csv")));
    assert!(Cli::try_parse_from(["afq-upload", "alice", "study1", "--manifest", "m.csv"]).is_err());
  }

  #[test]
  fn repository_is_required_without_manifest() {
    assert!(Cli::try_parse_from(["afq-upload", "alice"]).is_err());
    assert!(Cli::try_parse_from(["afq-upload"]).is_err());
  }
}
