//! booktag library interface
//!
//! Tags a personal library export with language-model generated tags and
//! stores one row per (book, tag) in SQLite.
//!
//! Exposes public APIs for the binary and for integration testing.

pub mod config;
pub mod db;
pub mod services;
pub mod types;
pub mod workflow;

pub use crate::config::{CliOverrides, Settings};
pub use crate::types::{ProviderError, TaggingProvider};
pub use booktag_common::{BookRecord, TaggedRecord};
