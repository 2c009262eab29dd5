//! Read-only access to repositories published on GitHub Pages.
//!
//! Implements [`afq_core::source::RepoSource`]: commit SHAs come from the
//! GitHub REST API, CSV tables are fetched from the Pages site.

mod github;
pub mod error;

pub use error::{Error, Result};
pub use github::{GitHubSource, SourceConfig};
