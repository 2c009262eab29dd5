//! Manifest decoding: one `(username, repository_name)` row per repository.

use std::path::Path;

use afq_core::source::RepoRef;

use crate::{Error, Result};

/// Decode a manifest CSV. Columns other than `username` and
/// `repository_name` are ignored; a missing one is an error.
pub fn parse_manifest(input: &str) -> Result<Vec<RepoRef>> {
  let input = input.strip_prefix('\u{feff}').unwrap_or(input);
  let mut reader = csv::ReaderBuilder::new()
    .has_headers(true)
    .trim(csv::Trim::All)
    .from_reader(input.as_bytes());

  reader
    .deserialize::<RepoRef>()
    .map(|entry| entry.map_err(Error::from))
    .collect()
}

/// Read and decode the manifest at `path`.
pub fn read_manifest(path: impl AsRef<Path>) -> Result<Vec<RepoRef>> {
  let path = path.as_ref();
  let raw = std::fs::read_to_string(path).map_err(|source| Error::Io {
    path: path.to_path_buf(),
    source,
  })?;
  parse_manifest(&raw)
}
