//! Service modules for the book tagging pipeline
//!
//! Extract → Tag (provider) → Flatten. Persistence lives in `crate::db`.

pub mod csv_extractor;
pub mod enrichment_orchestrator;
pub mod gemini_client;
pub mod ollama_client;
pub mod untagged_filter;

pub use crate::types::{ProviderError, TaggingProvider};
pub use csv_extractor::{extract_books, extract_books_from_path};
pub use enrichment_orchestrator::{
    parse_tags, EnrichmentOrchestrator, FAILED_TAG, MAX_CONCURRENT_REQUESTS,
};
pub use gemini_client::GeminiClient;
pub use ollama_client::OllamaClient;
pub use untagged_filter::filter_untagged;
