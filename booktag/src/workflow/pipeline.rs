//! Pipeline orchestrator
//!
//! Wires extractor, provider, orchestrator and store together. Per-book
//! provider failures are absorbed by the orchestrator; everything that
//! reaches this level is fatal to the run.
//!
//! # Example
//! ```rust,ignore
//! let provider = build_provider(&settings)?;
//! let summary = run_pipeline(&settings, provider).await?;
//! ```

use crate::config::Settings;
use crate::db;
use crate::services::{
    extract_books_from_path, filter_untagged, EnrichmentOrchestrator, GeminiClient, OllamaClient,
};
use crate::types::{ProviderError, TaggingProvider};
use anyhow::{Context, Result};
use booktag_common::config::ProviderKind;
use booktag_common::BookRecord;
use sqlx::SqlitePool;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Counts reported at the end of a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineSummary {
    /// Books read from the export
    pub books_extracted: usize,
    /// Books sent to the provider (after the optional already-tagged filter)
    pub books_submitted: usize,
    /// (book, tag) records produced by enrichment
    pub tag_entries: usize,
    /// Rows inserted by this run
    pub rows_inserted: u64,
    /// Rows in the store after this run
    pub total_rows: i64,
}

/// Create the provider selected in `settings`
pub fn build_provider(
    settings: &Settings,
) -> std::result::Result<Arc<dyn TaggingProvider>, ProviderError> {
    match settings.provider {
        ProviderKind::Ollama => Ok(Arc::new(OllamaClient::new(
            &settings.ollama_base_url,
            settings.model.clone(),
            settings.ollama_timeout,
        )?)),
        ProviderKind::Gemini => Ok(Arc::new(GeminiClient::new(
            settings.gemini_api_key.clone(),
            &settings.gemini_base_url,
            settings.model.clone(),
            settings.gemini_timeout,
        )?)),
    }
}

/// Extract books from `input_path` and render them as pretty-printed JSON
pub fn extract_json(input_path: &Path) -> Result<String> {
    let books = extract_books_from_path(input_path)
        .with_context(|| format!("Failed to extract books from {}", input_path.display()))?;

    serde_json::to_string_pretty(&books).context("Failed to encode books")
}

/// Run extract → enrich → persist with an already-built provider
pub async fn run_pipeline(
    settings: &Settings,
    provider: Arc<dyn TaggingProvider>,
) -> Result<PipelineSummary> {
    let books = extract_books_from_path(&settings.input_path).with_context(|| {
        format!(
            "Failed to extract books from {}",
            settings.input_path.display()
        )
    })?;

    let pool = db::init_database_pool(&settings.database_path)
        .await
        .with_context(|| {
            format!(
                "Failed to open database {}",
                settings.database_path.display()
            )
        })?;

    let result = tag_and_store(settings, provider, &pool, books).await;

    pool.close().await;

    result
}

/// Stages that run against an open store; the caller owns and closes the pool
async fn tag_and_store(
    settings: &Settings,
    provider: Arc<dyn TaggingProvider>,
    pool: &SqlitePool,
    books: Vec<BookRecord>,
) -> Result<PipelineSummary> {
    let mut summary = PipelineSummary {
        books_extracted: books.len(),
        ..Default::default()
    };

    let books = if settings.skip_tagged {
        let tagged = db::load_tagged_books(pool)
            .await
            .context("Failed to load already-tagged books")?;
        let untagged = filter_untagged(books, &tagged);
        if untagged.is_empty() {
            info!("Every book in the export is already tagged; nothing to do");
            summary.total_rows = db::count_rows(pool).await?;
            return Ok(summary);
        }
        untagged
    } else {
        books
    };
    summary.books_submitted = books.len();

    let orchestrator = EnrichmentOrchestrator::new(provider);
    let tagged = orchestrator
        .run(settings.mode, books)
        .await
        .context("Tag enrichment failed")?;
    summary.tag_entries = tagged.len();

    summary.rows_inserted = db::persist_tagged_records(pool, &tagged)
        .await
        .context("Failed to persist tagged books")?;
    summary.total_rows = db::count_rows(pool).await?;

    info!(
        books = summary.books_submitted,
        tag_entries = summary.tag_entries,
        inserted = summary.rows_inserted,
        total_rows = summary.total_rows,
        database = %settings.database_path.display(),
        "Tagging run complete"
    );

    Ok(summary)
}
