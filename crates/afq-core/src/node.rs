//! Per-node metric records and the formatter that builds them from rows.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Result, table::Row};

/// Column holding the subject identifier, in both the subjects and nodes
/// tables.
pub const SUBJECT_ID: &str = "subjectID";
pub const TRACT_ID: &str = "tractID";
pub const NODE_ID: &str = "nodeID";

/// One measurement point along a tract. Always embedded in its subject's
/// payload; never addressed on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
  #[serde(rename = "subjectID")]
  pub subject_id: String,
  #[serde(rename = "tractID")]
  pub tract_id:   String,
  #[serde(rename = "nodeID")]
  pub node_id:    String,
  /// Remaining non-null columns, keyed by column name.
  pub metrics:    Map<String, Value>,
}

impl NodeRecord {
  pub fn from_row(row: &Row) -> Result<Self> {
    Ok(Self {
      subject_id: row.identifier(SUBJECT_ID)?,
      tract_id:   row.identifier(TRACT_ID)?,
      node_id:    row.identifier(NODE_ID)?,
      metrics:    row.non_null_map(&[SUBJECT_ID, TRACT_ID, NODE_ID]),
    })
  }
}

/// Format node rows into [`NodeRecord`]s, lazily and in input order.
///
/// The returned iterator is `Clone`, so it can be restarted by cloning it
/// before consumption.
pub fn format_nodes<'a, I>(
  rows: I,
) -> impl Iterator<Item = Result<NodeRecord>> + Clone
where
  I: IntoIterator<Item = &'a Row>,
  I::IntoIter: Clone,
{
  rows.into_iter().map(NodeRecord::from_row)
}
