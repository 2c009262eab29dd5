//! `Table` decoding.

use afq_core::table::{Cell, Row, Table};

use crate::{Error, Result};

/// Cell contents read as missing values (pandas' default `na_values`).
pub const NA_VALUES: &[&str] = &[
  "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan",
  "1.#IND", "1.#QNAN", "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a",
  "nan", "null",
];

/// Infer the scalar type of a raw CSV field.
pub fn parse_cell(raw: &str) -> Cell {
  if NA_VALUES.contains(&raw) {
    return Cell::Null;
  }
  let trimmed = raw.trim();
  if let Ok(i) = trimmed.parse::<i64>() {
    return Cell::Int(i);
  }
  if let Ok(f) = trimmed.parse::<f64>()
    && f.is_finite()
  {
    return Cell::Float(f);
  }
  Cell::Text(raw.to_owned())
}

/// Decode a CSV document whose first line is the header.
///
/// A leading column with an empty header is an index column written by
/// pandas' `to_csv`; it is dropped.
pub fn parse_table(input: &str) -> Result<Table> {
  let input = input.strip_prefix('\u{feff}').unwrap_or(input);
  let mut reader = csv::ReaderBuilder::new()
    .has_headers(true)
    .from_reader(input.as_bytes());

  let headers = reader.headers()?.clone();
  if headers.is_empty() {
    return Err(Error::MissingHeader);
  }
  let skip = usize::from(headers.get(0).is_some_and(|h| h.trim().is_empty()));
  let columns: Vec<String> = headers.iter().skip(skip).map(str::to_owned).collect();

  let mut rows = Vec::new();
  for record in reader.records() {
    let record = record?;
    let row: Row = columns
      .iter()
      .cloned()
      .zip(record.iter().skip(skip).map(parse_cell))
      .collect();
    rows.push(row);
  }

  Ok(Table::new(columns, rows))
}
