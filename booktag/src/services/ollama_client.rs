//! Local model client (Ollama `/api/generate`)
//!
//! One non-streaming generate request per book. Every failure mode
//! (connection, non-200 status, undecodable body) is reported as a
//! per-book [`ProviderError`].

use crate::types::{ProviderError, TaggingProvider};
use async_trait::async_trait;
use booktag_common::BookRecord;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const USER_AGENT: &str = concat!("booktag/", env!("CARGO_PKG_VERSION"));

/// Request body for `/api/generate`
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    /// Always false: one complete response per request
    pub stream: bool,
}

/// Relevant fields of the `/api/generate` response
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateResponse {
    /// Generated text holding the tags
    pub response: String,
}

/// Build the instruction prompt for the local model
pub fn build_prompt(book: &BookRecord) -> String {
    format!(
        "Analyze the following book and return a comma-separated list of 3-5 descriptive tags \
         (e.g., 'Historical Fiction,War,Coming-of-Age'). DO NOT include any other text, quotes, \
         or explanations.\nTitle: {}\nAuthor(s): {} ({})\nAdditional Authors: {}",
        book.title, book.author, book.author_sort_key, book.co_authors
    )
}

/// Client for a locally hosted model
pub struct OllamaClient {
    http_client: reqwest::Client,
    endpoint: String,
    model: String,
}

impl OllamaClient {
    /// Create a client posting to `<base_url>/api/generate`
    pub fn new(
        base_url: &str,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            endpoint: format!("{}/api/generate", base_url.trim_end_matches('/')),
            model: model.into(),
        })
    }

    /// Send one prompt and return the raw generated text
    pub async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let body = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };

        let response = self
            .http_client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                ProviderError::Network(format!(
                    "failed to reach local model API at {} (is the server running and model '{}' pulled?): {}",
                    self.endpoint, self.model, e
                ))
            })?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api(status.as_u16(), error_text));
        }

        let generated: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        Ok(generated.response)
    }
}

#[async_trait]
impl TaggingProvider for OllamaClient {
    fn name(&self) -> &'static str {
        "ollama"
    }

    async fn tag(&self, book: &BookRecord) -> Result<String, ProviderError> {
        let prompt = build_prompt(book);

        tracing::debug!(
            title = %book.title,
            model = %self.model,
            "Requesting tags from local model"
        );

        self.generate(&prompt).await
    }
}
