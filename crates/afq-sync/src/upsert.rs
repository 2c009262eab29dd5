//! The record upsert primitive.
//!
//! `find → create | patch | nothing`. The read and the write are separate
//! requests, so a concurrent uploader can create the same record in between.
//! The vault's unique index on the lookup key catches that case: a create
//! rejected as a duplicate is re-read and handled as if the first read had
//! found the record.

use afq_core::{
  record::Document,
  resource::{LookupFilter, Resource},
  vault::{CreateOutcome, Vault},
};
use serde_json::Value;

use crate::{Error, Result, error::RejectedCreate};

/// What an [`upsert`] did.
#[derive(Debug, Clone, PartialEq)]
pub enum UpsertOutcome {
  /// No record matched; the payload was created.
  Created(Document),
  /// A record matched and was patched.
  Updated(Document),
  /// A record matched and patch mode is off; nothing was written.
  Unchanged(Document),
}

impl UpsertOutcome {
  pub fn document(&self) -> &Document {
    match self {
      UpsertOutcome::Created(doc)
      | UpsertOutcome::Updated(doc)
      | UpsertOutcome::Unchanged(doc) => doc,
    }
  }

  /// The record that was written, or `None` if the upsert left it untouched.
  pub fn written(&self) -> Option<&Document> {
    match self {
      UpsertOutcome::Unchanged(_) => None,
      other => Some(other.document()),
    }
  }

  pub fn label(&self) -> &'static str {
    match self {
      UpsertOutcome::Created(_) => "created",
      UpsertOutcome::Updated(_) => "updated",
      UpsertOutcome::Unchanged(_) => "already exists",
    }
  }
}

/// Create `payload` in `resource` unless a record matches `filter`; if one
/// does, patch it when `patch` is set and leave it alone otherwise.
///
/// The patch targets the first matching record and carries its `_etag` as
/// the `if-match` precondition. Every vault failure is returned as
/// [`Error::Transport`] without retrying.
pub async fn upsert<V: Vault>(
  vault: &V,
  resource: Resource,
  filter: &LookupFilter,
  payload: &Value,
  patch: bool,
) -> Result<UpsertOutcome> {
  tracing::debug!(%resource, %filter, "looking up record");
  let existing = vault
    .find(resource, filter)
    .await
    .map_err(Error::transport)?;

  if let Some(doc) = existing.into_iter().next() {
    return apply_to_existing(vault, resource, doc, payload, patch).await;
  }

  match vault
    .create(resource, payload)
    .await
    .map_err(Error::transport)?
  {
    CreateOutcome::Created(doc) => {
      tracing::info!(%resource, id = %doc.id, "created record");
      Ok(UpsertOutcome::Created(doc))
    }
    CreateOutcome::Conflict { status, body } => {
      tracing::warn!(%resource, %filter, status, "create conflicted; re-reading");
      let existing = vault
        .find(resource, filter)
        .await
        .map_err(Error::transport)?;
      match existing.into_iter().next() {
        Some(doc) => apply_to_existing(vault, resource, doc, payload, patch).await,
        None => Err(Error::transport(RejectedCreate {
          resource: resource.name,
          status,
          body,
        })),
      }
    }
  }
}

async fn apply_to_existing<V: Vault>(
  vault: &V,
  resource: Resource,
  doc: Document,
  payload: &Value,
  patch: bool,
) -> Result<UpsertOutcome> {
  if !patch {
    tracing::info!(%resource, id = %doc.id, "record already exists; nothing to do");
    return Ok(UpsertOutcome::Unchanged(doc));
  }

  let etag = doc.etag.as_deref().ok_or_else(|| Error::MissingEtag {
    resource: resource.name,
    id:       doc.id.clone(),
  })?;

  tracing::info!(%resource, id = %doc.id, "patching existing record");
  let updated = vault
    .patch(resource, &doc.id, etag, payload)
    .await
    .map_err(Error::transport)?;
  Ok(UpsertOutcome::Updated(updated))
}
