//! Manifest-driven batches. Each repository is synced independently: a
//! failure is recorded and the batch moves on to the next entry.

use std::fmt;

use afq_core::{
  source::{RepoRef, RepoSource},
  vault::Vault,
};

use crate::{Error, Result, orchestrator::{Orchestrator, RepoReport}};

#[derive(Debug, Default)]
pub struct BatchReport {
  /// One entry per manifest row, in manifest order.
  pub entries: Vec<(RepoRef, Result<RepoReport>)>,
}

impl BatchReport {
  pub fn succeeded(&self) -> impl Iterator<Item = &RepoReport> {
    self.entries.iter().filter_map(|(_, r)| r.as_ref().ok())
  }

  pub fn failures(&self) -> impl Iterator<Item = (&RepoRef, &Error)> {
    self
      .entries
      .iter()
      .filter_map(|(repo, r)| r.as_ref().err().map(|e| (repo, e)))
  }

  pub fn is_success(&self) -> bool { self.failures().next().is_none() }
}

impl fmt::Display for BatchReport {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (repo, result) in &self.entries {
      match result {
        Ok(report) => writeln!(f, "ok      {report}")?,
        Err(e) => writeln!(f, "FAILED  {repo}: {e}")?,
      }
    }
    write!(
      f,
      "{} repositories, {} failed",
      self.entries.len(),
      self.failures().count()
    )
  }
}

/// Sync every repository in `repos`, in order.
pub async fn sync_manifest<V, S>(
  orchestrator: &Orchestrator<'_, V, S>,
  repos: &[RepoRef],
) -> BatchReport
where
  V: Vault,
  S: RepoSource,
{
  let mut report = BatchReport::default();
  for repo in repos {
    let result = orchestrator.sync_repository(repo).await;
    if let Err(e) = &result {
      tracing::error!(%repo, error = %e, "repository sync failed; continuing");
    }
    report.entries.push((repo.clone(), result));
  }
  report
}
