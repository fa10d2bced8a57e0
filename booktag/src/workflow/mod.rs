//! End-to-end tagging workflow
//!
//! Runs the stages in order, stopping at the first fatal error:
//! 1. Build the tagging provider (fails fast on a missing credential)
//! 2. Extract books from the library export
//! 3. Open the store
//! 4. Optionally drop books that are already tagged
//! 5. Enrich books with tags
//! 6. Persist all tagged records in one transaction

pub mod pipeline;

pub use pipeline::{build_provider, extract_json, run_pipeline, PipelineSummary};
