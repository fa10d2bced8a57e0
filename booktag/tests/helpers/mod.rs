//! Test Helper Utilities
//!
//! Shared utilities for testing booktag

#![allow(dead_code)]

use async_trait::async_trait;
use booktag::config::Settings;
use booktag::types::{ProviderError, TaggingProvider};
use booktag_common::config::{OrchestrationMode, ProviderKind};
use booktag_common::BookRecord;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Header line of a Goodreads library export
pub const EXPORT_HEADER: &str =
    "Book Id,Title,Author,Author l-f,Additional Authors,ISBN,ISBN13,My Rating";

/// Provider answering from a fixed table; titles not in the table fail
pub struct MockProvider {
    answers: Vec<(String, String)>,
    pub calls: AtomicUsize,
}

impl MockProvider {
    pub fn new(answers: &[(&str, &str)]) -> Self {
        Self {
            answers: answers
                .iter()
                .map(|(title, tags)| (title.to_string(), tags.to_string()))
                .collect(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TaggingProvider for MockProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn tag(&self, book: &BookRecord) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answers
            .iter()
            .find(|(title, _)| *title == book.title)
            .map(|(_, tags)| tags.clone())
            .ok_or_else(|| ProviderError::Api(503, format!("no answer for {}", book.title)))
    }
}

/// Write `rows` below the export header and return the file path
pub fn write_export(dir: &Path, rows: &[&str]) -> PathBuf {
    let path = dir.join("goodreads_library_export.csv");
    let mut contents = String::from(EXPORT_HEADER);
    for row in rows {
        contents.push('\n');
        contents.push_str(row);
    }
    contents.push('\n');
    std::fs::write(&path, contents).expect("Failed to write test export");
    path
}

/// Settings pointing at a temp export and database
pub fn test_settings(input_path: PathBuf, database_path: PathBuf) -> Settings {
    Settings {
        input_path,
        database_path,
        provider: ProviderKind::Ollama,
        model: "test-model".to_string(),
        mode: OrchestrationMode::Concurrent,
        skip_tagged: false,
        ollama_base_url: "http://127.0.0.1:9".to_string(),
        ollama_timeout: Duration::from_secs(5),
        gemini_base_url: "http://127.0.0.1:9".to_string(),
        gemini_timeout: Duration::from_secs(5),
        gemini_api_key: None,
    }
}

/// Serve `app` on an ephemeral local port and return its base URL
pub async fn spawn_server(app: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("No local address");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Test server failed");
    });

    format!("http://{}", addr)
}
