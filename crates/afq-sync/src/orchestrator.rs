//! Repository orchestration: resolve a repository to a commit SHA and its
//! published tables, then upload the project followed by its subjects.

use std::fmt;

use afq_core::{
  source::{RepoRef, RepoSource},
  vault::Vault,
};
use serde_json::Map;

use crate::{
  Error, Result,
  project::sync_project,
  subject::{DEFAULT_SESSION_ID, SessionScope, SubjectOptions, SubjectOutcome, sync_subjects},
  upsert::UpsertOutcome,
};

/// Published tables, relative to a repository's content root.
pub const SUBJECTS_CSV: &str = "data/subjects.csv";
pub const NODES_CSV: &str = "data/nodes.csv";

pub const DEFAULT_BRANCH: &str = "gh-pages";
pub const DEFAULT_PAGES_URL: &str = "https://{username}.github.io/{repository}";

// ─── Options ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct SyncOptions {
  /// Branch whose head commit versions the upload.
  pub branch:     String,
  /// Content root template; `{username}` and `{repository}` are substituted.
  pub pages_url:  String,
  pub session_id: String,
  pub scope:      SessionScope,
  /// Patch records that already exist instead of leaving them untouched.
  pub patch:      bool,
}

impl Default for SyncOptions {
  fn default() -> Self {
    Self {
      branch:     DEFAULT_BRANCH.to_owned(),
      pages_url:  DEFAULT_PAGES_URL.to_owned(),
      session_id: DEFAULT_SESSION_ID.to_owned(),
      scope:      SessionScope::default(),
      patch:      false,
    }
  }
}

impl SyncOptions {
  /// The repository's public content root, without a trailing slash.
  pub fn content_root(&self, repo: &RepoRef) -> String {
    self
      .pages_url
      .replace("{username}", &repo.username)
      .replace("{repository}", &repo.repository_name)
      .trim_end_matches('/')
      .to_owned()
  }

  fn subject_options(&self) -> SubjectOptions {
    SubjectOptions {
      session_id: self.session_id.clone(),
      scope:      self.scope,
      patch:      self.patch,
    }
  }
}

// ─── Report ──────────────────────────────────────────────────────────────────

/// What a repository sync did.
#[derive(Debug, Clone, PartialEq)]
pub struct RepoReport {
  pub repo:     RepoRef,
  pub sha:      String,
  pub url:      String,
  pub project:  UpsertOutcome,
  /// Empty when the project already existed and was left untouched.
  pub subjects: Vec<SubjectOutcome>,
}

impl RepoReport {
  /// Count of subjects per outcome: `(created, updated, unchanged)`.
  pub fn subject_counts(&self) -> (usize, usize, usize) {
    self
      .subjects
      .iter()
      .fold((0, 0, 0), |(c, u, n), s| match s.outcome {
        UpsertOutcome::Created(_) => (c + 1, u, n),
        UpsertOutcome::Updated(_) => (c, u + 1, n),
        UpsertOutcome::Unchanged(_) => (c, u, n + 1),
      })
  }
}

impl fmt::Display for RepoReport {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "{} @ {}: project {} ({})",
      self.repo,
      self.sha,
      self.project.label(),
      self.project.document().id
    )?;
    if self.project.written().is_some() {
      let (created, updated, unchanged) = self.subject_counts();
      write!(
        f,
        "; subjects: {created} created, {updated} updated, {unchanged} unchanged"
      )?;
    }
    Ok(())
  }
}

// ─── Orchestrator ────────────────────────────────────────────────────────────

/// Drives repository syncs against a vault and a repository source.
pub struct Orchestrator<'a, V, S> {
  vault:   &'a V,
  source:  &'a S,
  options: &'a SyncOptions,
}

impl<'a, V, S> Orchestrator<'a, V, S>
where
  V: Vault,
  S: RepoSource,
{
  pub fn new(vault: &'a V, source: &'a S, options: &'a SyncOptions) -> Self {
    Self { vault, source, options }
  }

  pub fn options(&self) -> &SyncOptions { self.options }

  /// Upload one repository.
  ///
  /// The project is upserted first, keyed by the branch head's SHA. Subjects
  /// are uploaded only if the project was created or patched; an untouched
  /// project means this SHA's data is already in the vault.
  pub async fn sync_repository(&self, repo: &RepoRef) -> Result<RepoReport> {
    let root = self.options.content_root(repo);
    let branch = self.options.branch.as_str();

    let sha = self
      .source
      .commit_sha(repo, branch)
      .await
      .map_err(Error::fetch)?
      .ok_or_else(|| Error::Resolution {
        owner:  repo.username.clone(),
        repo:   repo.repository_name.clone(),
        branch: branch.to_owned(),
      })?;
    tracing::info!(%repo, %sha, "resolved branch head");

    let subjects = self
      .source
      .fetch_table(&format!("{root}/{SUBJECTS_CSV}"))
      .await
      .map_err(Error::fetch)?;
    let nodes = self
      .source
      .fetch_table(&format!("{root}/{NODES_CSV}"))
      .await
      .map_err(Error::fetch)?;

    let project = sync_project(self.vault, &sha, &root, Map::new(), self.options.patch).await?;

    let subjects = match project.written() {
      Some(doc) => {
        sync_subjects(
          self.vault,
          &subjects,
          &nodes,
          &doc.id,
          &self.options.subject_options(),
        )
        .await?
      }
      None => {
        tracing::info!(%repo, %sha, "project already uploaded; skipping subjects");
        Vec::new()
      }
    };

    Ok(RepoReport {
      repo: repo.clone(),
      sha,
      url: root,
      project,
      subjects,
    })
  }
}
