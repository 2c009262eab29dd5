//! Core types and trait definitions for the AFQ vault uploader.
//!
//! This crate is deliberately free of HTTP and file I/O. Transport crates
//! (`afq-vault`, `afq-source`) implement the traits defined here and the
//! synchronisation logic in `afq-sync` is written against them.

pub mod error;
pub mod node;
pub mod record;
pub mod resource;
pub mod source;
pub mod table;
pub mod vault;

pub use error::{Error, Result};
