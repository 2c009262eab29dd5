//! Payloads sent to the vault and the documents it returns.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::node::NodeRecord;

/// Body of a `projects` create or patch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectPayload {
  /// Commit SHA of the published data; the project's natural key.
  pub sha:             String,
  pub url:             String,
  #[serde(default)]
  pub scan_parameters: Map<String, Value>,
}

/// Body of a `subjects` create or patch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectPayload {
  pub project_id: String,
  #[serde(rename = "sessionID")]
  pub session_id: String,
  #[serde(rename = "subjectID")]
  pub subject_id: String,
  pub metadata:   Map<String, Value>,
  pub nodes:      Vec<NodeRecord>,
}

/// A resource representation as returned by the vault.
///
/// Only `_id` is required. `_etag` is the optimistic-concurrency token; a
/// document without one cannot be patched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
  #[serde(rename = "_id")]
  pub id:     String,
  #[serde(rename = "_etag", default, skip_serializing_if = "Option::is_none")]
  pub etag:   Option<String>,
  #[serde(flatten)]
  pub fields: Map<String, Value>,
}

impl Document {
  pub fn field(&self, name: &str) -> Option<&Value> { self.fields.get(name) }
}
