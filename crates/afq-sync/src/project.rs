//! Project synchronisation: one `projects` record per commit SHA.

use afq_core::{
  record::ProjectPayload,
  resource::{LookupFilter, Resource},
  vault::Vault,
};
use serde_json::{Map, Value};

use crate::{Result, upsert::{UpsertOutcome, upsert}};

/// Projects are looked up by `sha` alone.
pub fn project_filter(sha: &str) -> LookupFilter { LookupFilter::new().eq("sha", sha) }

/// Upsert the project for `sha`.
///
/// An [`UpsertOutcome::Unchanged`] result means the SHA was already uploaded
/// and patch mode is off; callers should not go on to upload subjects.
pub async fn sync_project<V: Vault>(
  vault: &V,
  sha: &str,
  url: &str,
  scan_parameters: Map<String, Value>,
  patch: bool,
) -> Result<UpsertOutcome> {
  let payload = ProjectPayload {
    sha: sha.to_owned(),
    url: url.to_owned(),
    scan_parameters,
  };
  let body = serde_json::to_value(&payload)?;
  upsert(vault, Resource::PROJECTS, &project_filter(sha), &body, patch).await
}
