//! Hosted Gemini API client
//!
//! Requires an API key; construction fails before any request is issued if
//! the key is missing or blank.

use crate::types::{ProviderError, TaggingProvider};
use async_trait::async_trait;
use booktag_common::config::is_valid_key;
use booktag_common::BookRecord;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const USER_AGENT: &str = concat!("booktag/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

/// `generateContent` response (only the fields used here)
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponsePart {
    #[serde(default)]
    pub text: String,
}

impl GenerateContentResponse {
    /// Text of the first part of the first candidate, or "" if there is none
    pub fn first_text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .and_then(|c| c.parts.first())
            .map(|p| p.text.clone())
            .unwrap_or_default()
    }
}

/// Build the instruction prompt for the hosted model
pub fn build_prompt(book: &BookRecord) -> String {
    format!(
        "Analyze the following book details and determine a concise list of primary, single-word \
         genre or subject tags.\n\
         Return ONLY the comma-separated list of tags (e.g., \"Programming,InterviewPrep,Dystopian\"). \
         DO NOT include any other text, quotes, or formatting.\n\n\
         Title: {}\nAuthor: {}\nAdditional Authors: {}",
        book.title, book.author, book.co_authors
    )
}

/// Gemini API client
pub struct GeminiClient {
    http_client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    /// Create a client.
    ///
    /// # Errors
    /// `ProviderError::MissingCredential` if `api_key` is absent or blank.
    pub fn new(
        api_key: Option<String>,
        base_url: &str,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let api_key = api_key.filter(|k| is_valid_key(k)).ok_or_else(|| {
            ProviderError::MissingCredential(
                "GEMINI_API_KEY is not set. Cannot call the API.".to_string(),
            )
        })?;

        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.into(),
            api_key,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    /// Send one prompt and return the text of the first candidate
    pub async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let response = self
            .http_client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api(status.as_u16(), error_text));
        }

        let generated: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        Ok(generated.first_text())
    }
}

#[async_trait]
impl TaggingProvider for GeminiClient {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn tag(&self, book: &BookRecord) -> Result<String, ProviderError> {
        tracing::debug!(
            title = %book.title,
            model = %self.model,
            "Requesting tags from Gemini"
        );

        self.generate(&build_prompt(book)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_fails_fast() {
        let result = GeminiClient::new(
            None,
            "https://generativelanguage.googleapis.com",
            "gemini-2.5-flash",
            Duration::from_secs(5),
        );
        assert!(matches!(result, Err(ProviderError::MissingCredential(_))));

        let result = GeminiClient::new(
            Some("   ".to_string()),
            "https://generativelanguage.googleapis.com",
            "gemini-2.5-flash",
            Duration::from_secs(5),
        );
        assert!(matches!(result, Err(ProviderError::MissingCredential(_))));
    }

    #[test]
    fn test_endpoint_includes_model() {
        let client = GeminiClient::new(
            Some("key".to_string()),
            "https://generativelanguage.googleapis.com/",
            "gemini-2.5-flash",
            Duration::from_secs(5),
        )
        .unwrap();

        assert_eq!(
            client.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_prompt_embeds_book_fields() {
        let book = BookRecord::new("Neuromancer", "William Gibson", "Gibson, William", "");
        let prompt = build_prompt(&book);

        assert!(prompt.contains("single-word"));
        assert!(prompt.contains("Title: Neuromancer"));
        assert!(prompt.contains("Author: William Gibson"));
        assert!(prompt.ends_with("Additional Authors: "));
    }

    #[test]
    fn test_first_text_of_response() {
        let parsed: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"Cyberpunk,SciFi"}],"role":"model"}}]}"#,
        )
        .unwrap();
        assert_eq!(parsed.first_text(), "Cyberpunk,SciFi");

        let empty: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.first_text(), "");
    }
}
