//! Vault collections and the equality filters used to look records up.
//!
//! The vault accepts `where` clauses in two dialects: a Python-style
//! expression (`sha=='abc'`) and a JSON object (`{"subjectID":"S01"}`).
//! Each [`Resource`] knows which one it is queried with, so callers build a
//! single [`LookupFilter`] and never format the clause themselves.

use std::fmt;

use serde_json::{Map, Value};

// ─── Resources ───────────────────────────────────────────────────────────────

/// The `where` dialect a collection is queried with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterSyntax {
  Expression,
  Json,
}

/// A vault collection, e.g. `/api/v1/projects`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resource {
  pub name:   &'static str,
  pub syntax: FilterSyntax,
}

impl Resource {
  pub const PROJECTS: Resource = Resource {
    name:   "projects",
    syntax: FilterSyntax::Expression,
  };
  pub const SUBJECTS: Resource = Resource {
    name:   "subjects",
    syntax: FilterSyntax::Json,
  };
}

impl fmt::Display for Resource {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name) }
}

// ─── Lookup filter ───────────────────────────────────────────────────────────

/// A conjunction of `field == value` terms, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupFilter {
  terms: Vec<(String, String)>,
}

impl LookupFilter {
  pub fn new() -> Self { Self::default() }

  pub fn eq(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
    self.terms.push((field.into(), value.into()));
    self
  }

  pub fn terms(&self) -> &[(String, String)] { &self.terms }

  /// Render the filter in the given dialect.
  pub fn render(&self, syntax: FilterSyntax) -> String {
    match syntax {
      FilterSyntax::Expression => self
        .terms
        .iter()
        .map(|(field, value)| {
          let escaped = value.replace('\\', "\\\\").replace('\'', "\\'");
          format!("{field}=='{escaped}'")
        })
        .collect::<Vec<_>>()
        .join(" and "),
      FilterSyntax::Json => {
        let body = self
          .terms
          .iter()
          .map(|(field, value)| {
            format!("{}:{}", Value::from(field.as_str()), Value::from(value.as_str()))
          })
          .collect::<Vec<_>>()
          .join(",");
        format!("{{{body}}}")
      }
    }
  }

  /// Whether a document body satisfies every term. Numbers compare by their
  /// printed form.
  pub fn matches(&self, fields: &Map<String, Value>) -> bool {
    self.terms.iter().all(|(field, expected)| match fields.get(field) {
      Some(Value::String(s)) => s == expected,
      Some(Value::Number(n)) => n.to_string() == *expected,
      _ => false,
    })
  }
}

impl fmt::Display for LookupFilter {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.render(FilterSyntax::Json))
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn expression_dialect() {
    let filter = LookupFilter::new().eq("sha", "abc123");
    assert_eq!(filter.render(FilterSyntax::Expression), "sha=='abc123'");
  }

  #[test]
  fn expression_dialect_escapes_quotes_and_joins_terms() {
    let filter = LookupFilter::new().eq("a", "it's").eq("b", "2");
    assert_eq!(
      filter.render(FilterSyntax::Expression),
      r"a=='it\'s' and b=='2'"
    );
  }

  #[test]
  fn json_dialect_keeps_term_order() {
    let filter = LookupFilter::new()
      .eq("project_id", "p1")
      .eq("subjectID", "S\"01");
    assert_eq!(
      filter.render(FilterSyntax::Json),
      r#"{"project_id":"p1","subjectID":"S\"01"}"#
    );
  }

  #[test]
  fn matches_requires_every_term() {
    let filter = LookupFilter::new().eq("project_id", "p1").eq("subjectID", "S01");
    let hit = json!({ "project_id": "p1", "subjectID": "S01", "x": 1 });
    let miss = json!({ "project_id": "p2", "subjectID": "S01" });
    assert!(filter.matches(hit.as_object().unwrap()));
    assert!(!filter.matches(miss.as_object().unwrap()));
  }
}
