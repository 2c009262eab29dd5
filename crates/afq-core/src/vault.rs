//! The `Vault` trait: the three REST operations the upsert needs.
//!
//! Implemented over HTTP by `afq-vault` and in memory by the `afq-sync`
//! tests. Everything above this seam works against the trait only.

use std::future::Future;

use serde_json::Value;

use crate::{record::Document, resource::{LookupFilter, Resource}};

/// Result of a create request.
#[derive(Debug, Clone, PartialEq)]
pub enum CreateOutcome {
  Created(Document),
  /// The vault refused the create because a record with the same unique key
  /// already exists (for instance written by a concurrent uploader).
  Conflict { status: u16, body: String },
}

/// Abstraction over the remote data vault.
///
/// All methods return `Send` futures so implementations can be driven from a
/// multi-threaded runtime.
pub trait Vault: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Filtered read; returns every record matching `filter`.
  fn find<'a>(
    &'a self,
    resource: Resource,
    filter: &'a LookupFilter,
  ) -> impl Future<Output = Result<Vec<Document>, Self::Error>> + Send + 'a;

  /// Create a record from `payload`.
  fn create<'a>(
    &'a self,
    resource: Resource,
    payload: &'a Value,
  ) -> impl Future<Output = Result<CreateOutcome, Self::Error>> + Send + 'a;

  /// Update record `id`, guarded by the precondition token `etag`.
  fn patch<'a>(
    &'a self,
    resource: Resource,
    id: &'a str,
    etag: &'a str,
    payload: &'a Value,
  ) -> impl Future<Output = Result<Document, Self::Error>> + Send + 'a;
}
