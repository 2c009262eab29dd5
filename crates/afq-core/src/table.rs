//! Tabular data as decoded from CSV: header-ordered rows of scalar cells.
//!
//! A [`Row`] keeps its columns in file order so that anything derived from
//! it (metadata, metrics) is produced deterministically.

use std::fmt;

use serde_json::{Map, Value};

use crate::{Error, Result};

// ─── Cell ────────────────────────────────────────────────────────────────────

/// A single scalar value. `Null` marks a missing cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
  Null,
  Int(i64),
  Float(f64),
  Text(String),
}

impl Cell {
  pub fn is_null(&self) -> bool { matches!(self, Cell::Null) }

  /// JSON form of the cell, or `None` when there is nothing to send.
  ///
  /// Non-finite floats have no JSON representation and count as null.
  pub fn to_json(&self) -> Option<Value> {
    match self {
      Cell::Null => None,
      Cell::Int(i) => Some(Value::from(*i)),
      Cell::Float(f) => serde_json::Number::from_f64(*f).map(Value::Number),
      Cell::Text(s) => Some(Value::String(s.clone())),
    }
  }

  /// Equality key under which numerically equal cells coincide, so `1` and
  /// `1.0` match while text never matches a number.
  pub fn key(&self) -> Option<CellKey> {
    match self {
      Cell::Null => None,
      Cell::Int(i) => Some(CellKey::Int(*i)),
      Cell::Float(x) if x.fract() == 0.0 && x.abs() < i64::MAX as f64 => {
        Some(CellKey::Int(*x as i64))
      }
      Cell::Float(x) => Some(CellKey::Float(x.to_bits())),
      Cell::Text(s) => Some(CellKey::Text(s.clone())),
    }
  }
}

/// See [`Cell::key`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CellKey {
  Int(i64),
  Float(u64),
  Text(String),
}

/// Identifier coercion: integers print plainly, floats as Python prints
/// them (`1.0`, `1e-05`, `1e+16`).
impl fmt::Display for Cell {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Cell::Null => f.write_str("nan"),
      Cell::Int(i) => write!(f, "{i}"),
      Cell::Float(x) => write_float(f, *x),
      Cell::Text(s) => f.write_str(s),
    }
  }
}

// `{:?}` already picks the shortest round-trip digits and switches to
// exponent form at the same magnitudes; only the exponent spelling differs.
fn write_float(f: &mut fmt::Formatter<'_>, x: f64) -> fmt::Result {
  if x.is_nan() {
    return f.write_str("nan");
  }
  let repr = format!("{x:?}");
  match repr.split_once('e') {
    Some((mantissa, exp)) => {
      let (sign, digits) = match exp.strip_prefix('-') {
        Some(digits) => ('-', digits),
        None => ('+', exp),
      };
      write!(f, "{mantissa}e{sign}{digits:0>2}")
    }
    None => f.write_str(&repr),
  }
}

// ─── Row ─────────────────────────────────────────────────────────────────────

/// One record of a table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
  cells: Vec<(String, Cell)>,
}

impl Row {
  pub fn new(cells: Vec<(String, Cell)>) -> Self { Self { cells } }

  pub fn get(&self, column: &str) -> Option<&Cell> {
    self
      .cells
      .iter()
      .find(|(name, _)| name == column)
      .map(|(_, cell)| cell)
  }

  /// Look up a column that must be present and non-null, returning its
  /// string form.
  pub fn identifier(&self, column: &str) -> Result<String> {
    match self.get(column) {
      None => Err(Error::MissingColumn { column: column.to_owned() }),
      Some(Cell::Null) => Err(Error::NullIdentifier { column: column.to_owned() }),
      Some(cell) => Ok(cell.to_string()),
    }
  }

  /// Like [`Row::identifier`], but returns the cell's [`CellKey`].
  pub fn identifier_key(&self, column: &str) -> Result<CellKey> {
    self
      .get(column)
      .ok_or_else(|| Error::MissingColumn { column: column.to_owned() })?
      .key()
      .ok_or_else(|| Error::NullIdentifier { column: column.to_owned() })
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &Cell)> {
    self.cells.iter().map(|(name, cell)| (name.as_str(), cell))
  }

  /// Every non-null cell as a JSON object, skipping the `exclude` columns.
  pub fn non_null_map(&self, exclude: &[&str]) -> Map<String, Value> {
    self
      .iter()
      .filter(|(name, _)| !exclude.contains(name))
      .filter_map(|(name, cell)| cell.to_json().map(|v| (name.to_owned(), v)))
      .collect()
  }
}

impl FromIterator<(String, Cell)> for Row {
  fn from_iter<T: IntoIterator<Item = (String, Cell)>>(iter: T) -> Self {
    Self { cells: iter.into_iter().collect() }
  }
}

// ─── Table ───────────────────────────────────────────────────────────────────

/// A decoded CSV file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
  pub columns: Vec<String>,
  pub rows:    Vec<Row>,
}

impl Table {
  pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self { Self { columns, rows } }

  pub fn has_column(&self, column: &str) -> bool {
    self.columns.iter().any(|c| c == column)
  }

  /// Fail with [`Error::MissingColumn`] unless every named column exists.
  pub fn require_columns(&self, columns: &[&str]) -> Result<()> {
    match columns.iter().find(|c| !self.has_column(c)) {
      Some(missing) => Err(Error::MissingColumn { column: (*missing).to_owned() }),
      None => Ok(()),
    }
  }

  pub fn len(&self) -> usize { self.rows.len() }

  pub fn is_empty(&self) -> bool { self.rows.is_empty() }

  pub fn iter(&self) -> std::slice::Iter<'_, Row> { self.rows.iter() }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn row() -> Row {
    Row::new(vec![
      ("subjectID".into(), Cell::Text("S01".into())),
      ("age".into(), Cell::Int(34)),
      ("handedness".into(), Cell::Null),
      ("score".into(), Cell::Float(0.25)),
    ])
  }

  #[test]
  fn non_null_map_drops_nulls_and_excluded_columns() {
    let map = row().non_null_map(&["subjectID"]);
    assert_eq!(serde_json::Value::Object(map), json!({ "age": 34, "score": 0.25 }));
  }

  #[test]
  fn identifier_coerces_numbers_to_strings() {
    let r = Row::new(vec![
      ("nodeID".into(), Cell::Int(0)),
      ("tractID".into(), Cell::Float(3.0)),
    ]);
    assert_eq!(r.identifier("nodeID").unwrap(), "0");
    assert_eq!(r.identifier("tractID").unwrap(), "3.0");
  }

  #[test]
  fn floats_print_like_python() {
    let cases = [
      (1.0, "1.0"),
      (0.5, "0.5"),
      (0.0001, "0.0001"),
      (1e-5, "1e-05"),
      (1.5e-7, "1.5e-07"),
      (1e15, "1000000000000000.0"),
      (1e16, "1e+16"),
      (-2.5e100, "-2.5e+100"),
    ];
    for (x, expected) in cases {
      assert_eq!(Cell::Float(x).to_string(), expected, "{x}");
    }
  }

  #[test]
  fn keys_compare_numbers_by_value() {
    assert_eq!(Cell::Int(1).key(), Cell::Float(1.0).key());
    assert_ne!(Cell::Int(1).key(), Cell::Float(1.5).key());
    assert_ne!(Cell::Int(1).key(), Cell::Text("1".into()).key());
    assert_eq!(Cell::Null.key(), None);
  }

  #[test]
  fn identifier_rejects_missing_and_null_columns() {
    assert!(matches!(
      row().identifier("tractID"),
      Err(Error::MissingColumn { column }) if column == "tractID"
    ));
    assert!(matches!(
      row().identifier("handedness"),
      Err(Error::NullIdentifier { .. })
    ));
    assert!(matches!(
      row().identifier_key("handedness"),
      Err(Error::NullIdentifier { .. })
    ));
  }

  #[test]
  fn non_finite_floats_are_treated_as_null() {
    assert_eq!(Cell::Float(f64::NAN).to_json(), None);
    assert_eq!(Cell::Float(1.5).to_json(), Some(json!(1.5)));
  }

  #[test]
  fn require_columns_names_the_first_missing_one() {
    let table = Table::new(vec!["subjectID".into(), "age".into()], vec![]);
    assert!(table.require_columns(&["subjectID"]).is_ok());
    assert!(matches!(
      table.require_columns(&["subjectID", "nodeID"]),
      Err(Error::MissingColumn { column }) if column == "nodeID"
    ));
  }
}
