//! Tagging provider trait and per-book error type
//!
//! Both upstream services (hosted API and local model) implement
//! [`TaggingProvider`]; the orchestrator only ever sees the trait object.

use async_trait::async_trait;
use booktag_common::BookRecord;
use thiserror::Error;

/// Per-book failure from a tagging provider.
///
/// Never fatal to a batch: the orchestrator isolates it to the one book.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Credential missing from the environment and config
    #[error("Missing credential: {0}")]
    MissingCredential(String),

    /// Connection, timeout or other transport failure
    #[error("Network error: {0}")]
    Network(String),

    /// Provider answered with a non-success status
    #[error("API error {0}: {1}")]
    Api(u16, String),

    /// Response body could not be decoded
    #[error("Parse error: {0}")]
    Parse(String),
}

/// A text-generation service that returns raw, loosely comma-separated tag
/// text for one book.
///
/// Implementations do not clean up the text; splitting and trimming happen
/// in the orchestrator.
///
/// # Example
/// ```rust,ignore
/// use booktag::types::{TaggingProvider, ProviderError};
///
/// struct Fixed;
///
/// #[async_trait::async_trait]
/// impl TaggingProvider for Fixed {
///     fn name(&self) -> &'static str { "fixed" }
///
///     async fn tag(&self, _book: &BookRecord) -> Result<String, ProviderError> {
///         Ok("Fiction, War, Drama".to_string())
///     }
/// }
/// ```
#[async_trait]
pub trait TaggingProvider: Send + Sync {
    /// Provider name for logging
    fn name(&self) -> &'static str;

    /// Ask the provider for tags describing `book`
    ///
    /// # Errors
    /// Returns `ProviderError` if the request or decoding fails
    async fn tag(&self, book: &BookRecord) -> Result<String, ProviderError>;
}
