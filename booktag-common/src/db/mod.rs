//! Database schema for the tagged-book store

pub mod init;

pub use init::*;
