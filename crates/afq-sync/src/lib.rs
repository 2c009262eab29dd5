//! Synchronisation of published AFQ data into the vault.
//!
//! The building block is [`upsert::upsert`]: look a record up by an equality
//! filter, create it when absent, and patch it (guarded by its `_etag`) only
//! when patch mode is on. [`project`] and [`subject`] apply it to the two
//! vault collections; [`orchestrator`] drives a whole repository and
//! [`batch`] a manifest of them.
//!
//! Everything is generic over [`afq_core::vault::Vault`] and
//! [`afq_core::source::RepoSource`].

pub mod batch;
pub mod error;
pub mod orchestrator;
pub mod project;
pub mod subject;
pub mod upsert;

pub use batch::{BatchReport, sync_manifest};
pub use error::{Error, Result};
pub use orchestrator::{Orchestrator, RepoReport, SyncOptions};
pub use subject::{SessionScope, SubjectOptions, SubjectOutcome};
pub use upsert::{UpsertOutcome, upsert};
