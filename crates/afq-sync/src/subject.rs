//! Subject synchronisation: one `subjects` record per row of the subjects
//! table, with that subject's node rows embedded.

use std::collections::HashMap;

use afq_core::{
  node::{SUBJECT_ID, format_nodes},
  record::SubjectPayload,
  resource::{LookupFilter, Resource},
  table::{CellKey, Row, Table},
  vault::Vault,
};
use serde::{Deserialize, Serialize};

use crate::{Result, upsert::{UpsertOutcome, upsert}};

pub const DEFAULT_SESSION_ID: &str = "0";

// ─── Options ─────────────────────────────────────────────────────────────────

/// Which fields identify an existing subject record.
///
/// Subject records store a `sessionID`, but historically the lookup only used
/// `project_id` and `subjectID`, so a second session of the same subject
/// overwrites (or is skipped as) the first. `Include` keeps sessions apart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionScope {
  #[default]
  #[serde(rename = "subject")]
  Ignore,
  #[serde(rename = "subject_session")]
  Include,
}

#[derive(Debug, Clone)]
pub struct SubjectOptions {
  pub session_id: String,
  pub scope:      SessionScope,
  pub patch:      bool,
}

impl Default for SubjectOptions {
  fn default() -> Self {
    Self {
      session_id: DEFAULT_SESSION_ID.to_owned(),
      scope:      SessionScope::default(),
      patch:      false,
    }
  }
}

// ─── Results ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct SubjectOutcome {
  pub subject_id: String,
  pub outcome:    UpsertOutcome,
}

// ─── Payloads ────────────────────────────────────────────────────────────────

pub fn subject_filter(payload: &SubjectPayload, scope: SessionScope) -> LookupFilter {
  let filter = LookupFilter::new()
    .eq("project_id", payload.project_id.as_str())
    .eq("subjectID", payload.subject_id.as_str());
  match scope {
    SessionScope::Ignore => filter,
    SessionScope::Include => filter.eq("sessionID", payload.session_id.as_str()),
  }
}

/// Build one payload per subject row without touching the vault.
///
/// `metadata` holds the row's non-null columns other than `subjectID`;
/// `nodes` holds the formatted node rows whose `subjectID` matches, in
/// table order. Identifiers match by value, so a node row's `1.0` belongs to
/// subject `1`. Node rows for subjects absent from `subjects` are ignored.
pub fn subject_payloads(
  subjects: &Table,
  nodes: &Table,
  project_id: &str,
  session_id: &str,
) -> Result<Vec<SubjectPayload>> {
  subjects.require_columns(&[SUBJECT_ID])?;

  let mut by_subject: HashMap<CellKey, Vec<&Row>> = HashMap::new();
  for row in nodes.iter() {
    by_subject.entry(row.identifier_key(SUBJECT_ID)?).or_default().push(row);
  }

  subjects
    .iter()
    .map(|row| {
      let subject_id = row.identifier(SUBJECT_ID)?;
      let key = row.identifier_key(SUBJECT_ID)?;
      let rows: &[&Row] = by_subject.get(&key).map(Vec::as_slice).unwrap_or(&[]);
      let nodes = format_nodes(rows.iter().copied()).collect::<afq_core::Result<Vec<_>>>()?;
      Ok(SubjectPayload {
        project_id: project_id.to_owned(),
        session_id: session_id.to_owned(),
        metadata: row.non_null_map(&[SUBJECT_ID]),
        subject_id,
        nodes,
      })
    })
    .collect()
}

// ─── Sync ────────────────────────────────────────────────────────────────────

/// Upsert every subject of `subjects` under `project_id`.
///
/// All payloads are built before the first request, so a malformed table
/// fails without partial writes. A vault failure stops the run and is
/// returned; outcomes already recorded for earlier subjects are discarded.
pub async fn sync_subjects<V: Vault>(
  vault: &V,
  subjects: &Table,
  nodes: &Table,
  project_id: &str,
  options: &SubjectOptions,
) -> Result<Vec<SubjectOutcome>> {
  let payloads = subject_payloads(subjects, nodes, project_id, &options.session_id)?;

  let mut outcomes = Vec::with_capacity(payloads.len());
  for payload in payloads {
    let filter = subject_filter(&payload, options.scope);
    let body = serde_json::to_value(&payload)?;
    let outcome = upsert(vault, Resource::SUBJECTS, &filter, &body, options.patch).await?;
    outcomes.push(SubjectOutcome {
      subject_id: payload.subject_id,
      outcome,
    });
  }
  Ok(outcomes)
}
