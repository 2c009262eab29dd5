//! The `RepoSource` trait: read-only access to a published repository.

use std::{fmt, future::Future};

use serde::{Deserialize, Serialize};

use crate::table::Table;

/// A hosted repository, as listed in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoRef {
  pub username:        String,
  pub repository_name: String,
}

impl RepoRef {
  pub fn new(username: impl Into<String>, repository_name: impl Into<String>) -> Self {
    Self {
      username:        username.into(),
      repository_name: repository_name.into(),
    }
  }
}

impl fmt::Display for RepoRef {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}/{}", self.username, self.repository_name)
  }
}

/// Where repository data comes from: commit metadata and published CSVs.
pub trait RepoSource: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// SHA of the latest commit on `branch`, or `None` when the hosting
  /// platform's response carries no `sha`.
  fn commit_sha<'a>(
    &'a self,
    repo: &'a RepoRef,
    branch: &'a str,
  ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send + 'a;

  /// Fetch and decode the CSV published at `url`.
  fn fetch_table<'a>(
    &'a self,
    url: &'a str,
  ) -> impl Future<Output = Result<Table, Self::Error>> + Send + 'a;
}
