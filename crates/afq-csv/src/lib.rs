//! CSV codec for the AFQ uploader.
//!
//! Decodes published `subjects.csv` / `nodes.csv` files into
//! [`afq_core::table::Table`]s and reads the repository manifest. Pure
//! synchronous; no HTTP dependencies.
//!
//! Null detection and scalar inference follow pandas' `read_csv` defaults,
//! since the files are produced and were historically consumed by pandas.

pub mod error;
pub mod manifest;
mod parse;

pub use error::{Error, Result};
pub use manifest::{parse_manifest, read_manifest};
pub use parse::{NA_VALUES, parse_cell, parse_table};
