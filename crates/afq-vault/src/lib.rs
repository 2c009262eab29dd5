//! HTTP client for the data vault's REST API.
//!
//! Implements [`afq_core::vault::Vault`] against an Eve-style service rooted
//! at `{endpoint}/api/v1/`. Authentication, content type and cache control
//! are sent as default headers on every request.

mod client;
pub mod error;

pub use client::{VaultClient, VaultConfig};
pub use error::{Error, Result};
