//! # booktag Common Library
//!
//! Shared code for the booktag crates including:
//! - Book and tagged-book models
//! - Configuration loading and setting resolution
//! - Database schema creation
//! - Common error type

pub mod config;
pub mod db;
pub mod error;
pub mod models;

pub use error::{Error, Result};
pub use models::{BookRecord, TaggedRecord};
