//! Uploader configuration.
//!
//! Layered with the `config` crate, lowest precedence first: built-in
//! defaults, the optional TOML file, then `AFQ_*` environment variables.
//! The vault secret is taken from `DB_SECRET` (or `AFQ_SECRET` / `secret`)
//! and is mandatory.

use std::{path::Path, time::Duration};

use afq_source::SourceConfig;
use afq_sync::{
  SessionScope, SyncOptions,
  orchestrator::{DEFAULT_BRANCH, DEFAULT_PAGES_URL},
  subject::DEFAULT_SESSION_ID,
};
use afq_vault::VaultConfig;
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;

pub const SECRET_VAR: &str = "DB_SECRET";

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("no vault secret configured; set DB_SECRET (or AFQ_SECRET)")]
  MissingSecret,

  #[error("invalid configuration: {0}")]
  Invalid(#[from] config::ConfigError),
}

/// Settings as deserialised from the layered sources.
#[derive(Deserialize, Clone)]
pub struct Settings {
  /// Vault root; requests go to `{endpoint}/api/v1/...`.
  pub endpoint:       String,
  pub branch:         String,
  pub github_api:     String,
  pub pages_url:      String,
  pub session_id:     String,
  pub patch:          bool,
  pub subject_lookup: SessionScope,
  /// Unset means requests never time out.
  #[serde(default)]
  pub timeout_secs:   Option<u64>,
  #[serde(default)]
  secret:             Option<String>,
}

/// Resolved configuration, handed to each component at startup.
#[derive(Clone)]
pub struct UploaderConfig {
  pub settings: Settings,
  secret:       String,
}

/// Load configuration from `path` (optional) and the environment.
pub fn load(path: &Path) -> Result<UploaderConfig, ConfigError> {
  build(File::from(path).required(false), std::env::var(SECRET_VAR).ok())
}

fn build<F>(file: F, db_secret: Option<String>) -> Result<UploaderConfig, ConfigError>
where
  F: config::Source + Send + Sync + 'static,
{
  let settings: Settings = Config::builder()
    .set_default("endpoint", "http://localhost")?
    .set_default("branch", DEFAULT_BRANCH)?
    .set_default("github_api", "https://api.github.com")?
    .set_default("pages_url", DEFAULT_PAGES_URL)?
    .set_default("session_id", DEFAULT_SESSION_ID)?
    .set_default("patch", false)?
    .set_default("subject_lookup", "subject")?
    .add_source(file)
    .add_source(Environment::with_prefix("AFQ"))
    .build()?
    .try_deserialize()?;

  let secret = db_secret
    .filter(|s| !s.is_empty())
    .or_else(|| settings.secret.clone())
    .filter(|s| !s.is_empty())
    .ok_or(ConfigError::MissingSecret)?;

  Ok(UploaderConfig { settings, secret })
}

impl UploaderConfig {
  fn timeout(&self) -> Option<Duration> { self.settings.timeout_secs.map(Duration::from_secs) }

  pub fn vault(&self) -> VaultConfig {
    VaultConfig {
      endpoint: self.settings.endpoint.clone(),
      secret:   self.secret.clone(),
      timeout:  self.timeout(),
    }
  }

  pub fn source(&self) -> SourceConfig {
    SourceConfig {
      github_api: self.settings.github_api.clone(),
      timeout:    self.timeout(),
    }
  }

  pub fn sync_options(&self) -> SyncOptions {
    SyncOptions {
      branch:     self.settings.branch.clone(),
      pages_url:  self.settings.pages_url.clone(),
      session_id: self.settings.session_id.clone(),
      scope:      self.settings.subject_lookup,
      patch:      self.settings.patch,
    }
  }
}

#[cfg(test)]
mod tests {
  use config::FileFormat;

  use super::*;

  fn toml(s: &str) -> impl config::Source + Send + Sync + 'static {
    File::from_str(s, FileFormat::Toml)
  }

  #[test]
  fn defaults_apply_without_file() {
    let cfg = build(toml(""), Some("s3cret".into())).unwrap();

    assert_eq!(cfg.settings.endpoint, "http://localhost");
    assert_eq!(cfg.settings.branch, "gh-pages");
    assert_eq!(cfg.settings.session_id, "0");
    assert!(!cfg.settings.patch);
    assert_eq!(cfg.settings.subject_lookup, SessionScope::Ignore);
    assert!(cfg.vault().timeout.is_none());
    assert_eq!(cfg.vault().secret, "s3cret");
  }

  #[test]
  fn file_values_override_defaults() {
    let cfg = build(
      toml(
        r#"
        endpoint       = "https://vault.example.org"
        patch          = true
        session_id     = "2"
        subject_lookup = "subject_session"
        timeout_secs   = 30
        "#,
      ),
      Some("s3cret".into()),
    )
    .unwrap();

    let options = cfg.sync_options();
    assert!(options.patch);
    assert_eq!(options.session_id, "2");
    assert_eq!(options.scope, SessionScope::Include);
    assert_eq!(cfg.vault().endpoint, "https://vault.example.org");
    assert_eq!(cfg.source().timeout, Some(Duration::from_secs(30)));
  }

  #[test]
  fn secret_may_come_from_file() {
    let cfg = build(toml(r#"secret = "from-file""#), None).unwrap();
    assert_eq!(cfg.vault().secret, "from-file");
  }

  #[test]
  fn env_secret_wins_over_file() {
    let cfg = build(toml(r#"secret = "from-file""#), Some("from-env".into())).unwrap();
    assert_eq!(cfg.vault().secret, "from-env");
  }

  #[test]
  fn missing_secret_fails_fast() {
    let err = build(toml(""), None).err().unwrap();
    assert!(matches!(err, ConfigError::MissingSecret));
  }

  #[test]
  fn empty_env_secret_falls_back_to_file() {
    let cfg = build(toml(r#"secret = "from-file""#), Some(String::new())).unwrap();
    assert_eq!(cfg.vault().secret, "from-file");

    let err = build(toml(""), Some(String::new())).err().unwrap();
    assert!(matches!(err, ConfigError::MissingSecret));
  }
}
