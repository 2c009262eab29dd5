//! Error type for `afq-sync`.

use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum Error {
  /// A vault request failed. Never retried.
  #[error("vault request failed: {0}")]
  Transport(#[source] BoxError),

  /// Fetching repository data (CSV, commit metadata) failed.
  #[error("repository source failed: {0}")]
  Source(#[source] BoxError),

  #[error("no commit sha found for {owner}/{repo} on branch {branch}")]
  Resolution {
    owner:  String,
    repo:   String,
    branch: String,
  },

  #[error("{resource} record {id} has no _etag and cannot be patched")]
  MissingEtag { resource: &'static str, id: String },

  #[error("data error: {0}")]
  Data(#[from] afq_core::Error),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

/// A create the vault rejected as a duplicate when no duplicate could be read
/// back. Surfaced through [`Error::Transport`].
#[derive(Debug, Error)]
#[error("create on {resource} rejected ({status}) with no matching record: {body}")]
pub struct RejectedCreate {
  pub resource: &'static str,
  pub status:   u16,
  pub body:     String,
}

impl Error {
  pub(crate) fn transport(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Error::Transport(Box::new(e))
  }

  pub(crate) fn fetch(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Error::Source(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
