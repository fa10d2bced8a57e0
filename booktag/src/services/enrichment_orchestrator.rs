//! Tag enrichment orchestration
//!
//! Fans books out to a [`TaggingProvider`] and flattens each response into one
//! [`TaggedRecord`] per tag.
//!
//! # Concurrent path
//! - One task per book, admitted through a semaphore of
//!   [`MAX_CONCURRENT_REQUESTS`] permits
//! - The permit is held for the provider call and dropped on every exit path
//! - A failed book yields exactly one record tagged [`FAILED_TAG`]
//! - Each task returns its own records; they are merged after all tasks join
//!
//! # Sequential path
//! - One book at a time, no concurrency bound
//! - A failed book is logged and dropped from the output

use crate::types::TaggingProvider;
use booktag_common::config::OrchestrationMode;
use booktag_common::{BookRecord, Error, Result, TaggedRecord};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

/// Upper bound on provider calls in flight for one `enrich` call
pub const MAX_CONCURRENT_REQUESTS: usize = 10;

/// Tag recorded for a book whose provider call failed
pub const FAILED_TAG: &str = "Error: Could not retrieve tags";

/// Split raw provider text into tags.
///
/// Splits on ',', trims each segment and drops empty ones. Order is kept.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Result of tagging one book
struct BookOutcome {
    index: usize,
    records: Vec<TaggedRecord>,
    failed: bool,
}

/// Drives a tagging provider over a batch of books
pub struct EnrichmentOrchestrator {
    provider: Arc<dyn TaggingProvider>,
}

impl EnrichmentOrchestrator {
    pub fn new(provider: Arc<dyn TaggingProvider>) -> Self {
        Self { provider }
    }

    /// Run the path selected by `mode`
    pub async fn run(
        &self,
        mode: OrchestrationMode,
        books: Vec<BookRecord>,
    ) -> Result<Vec<TaggedRecord>> {
        match mode {
            OrchestrationMode::Concurrent => self.enrich(books).await,
            OrchestrationMode::Sequential => self.enrich_sequential(books).await,
        }
    }

    /// Tag all books concurrently, at most [`MAX_CONCURRENT_REQUESTS`] at a time.
    ///
    /// Returns only after every task has finished. Records for one book keep
    /// the order the provider listed the tags in.
    ///
    /// # Errors
    /// - `Error::InvalidInput` if `books` is empty (no provider call is made)
    /// - `Error::Internal` if a task panicked
    pub async fn enrich(&self, books: Vec<BookRecord>) -> Result<Vec<TaggedRecord>> {
        if books.is_empty() {
            return Err(Error::InvalidInput("input book list is empty".to_string()));
        }

        let total_books = books.len();
        let start_time = Instant::now();

        info!(
            books = total_books,
            provider = self.provider.name(),
            max_concurrent = MAX_CONCURRENT_REQUESTS,
            "Starting concurrent tagging"
        );

        let semaphore = Arc::new(Semaphore::new(MAX_CONCURRENT_REQUESTS));
        let mut join_set = JoinSet::new();

        for (index, book) in books.into_iter().enumerate() {
            // Wait for a free slot before the task may start its call
            let permit = Arc::clone(&semaphore)
                .acquire_owned()
                .await
                .map_err(|e| Error::Internal(format!("concurrency gate closed: {}", e)))?;
            let provider = Arc::clone(&self.provider);

            join_set.spawn(async move {
                let _permit = permit;
                tag_book(provider.as_ref(), index, book).await
            });
        }

        let mut slots: Vec<Option<Vec<TaggedRecord>>> = vec![None; total_books];
        let mut failed_books = 0usize;
        let mut task_error = None;

        // Drain every task even after a panic; dropping the set would abort the rest
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok(outcome) => {
                    if outcome.failed {
                        failed_books += 1;
                    }
                    slots[outcome.index] = Some(outcome.records);
                }
                Err(e) => {
                    error!(error = %e, "Tagging task panicked");
                    if task_error.is_none() {
                        task_error = Some(e);
                    }
                }
            }
        }

        if let Some(e) = task_error {
            return Err(Error::Internal(format!("tagging task failed: {}", e)));
        }

        let tagged: Vec<TaggedRecord> = slots.into_iter().flatten().flatten().collect();

        info!(
            books = total_books,
            failed = failed_books,
            tag_entries = tagged.len(),
            elapsed = ?start_time.elapsed(),
            "Finished concurrent tagging"
        );

        Ok(tagged)
    }

    /// Tag books one at a time; failed books are dropped from the output
    pub async fn enrich_sequential(&self, books: Vec<BookRecord>) -> Result<Vec<TaggedRecord>> {
        let total_books = books.len();
        let start_time = Instant::now();
        let mut tagged = Vec::new();
        let mut dropped = 0usize;

        info!(
            books = total_books,
            provider = self.provider.name(),
            "Starting sequential tagging"
        );

        for book in books {
            match self.provider.tag(&book).await {
                Ok(raw) => {
                    tagged.extend(
                        parse_tags(&raw)
                            .into_iter()
                            .map(|tag| TaggedRecord::new(book.clone(), tag)),
                    );
                }
                Err(e) => {
                    error!(
                        title = %book.title,
                        error = %e,
                        "Error generating tags, skipping book"
                    );
                    dropped += 1;
                }
            }
        }

        info!(
            books = total_books,
            dropped,
            tag_entries = tagged.len(),
            elapsed = ?start_time.elapsed(),
            "Finished sequential tagging"
        );

        Ok(tagged)
    }
}

/// Call the provider for one book and flatten the response
async fn tag_book(provider: &dyn TaggingProvider, index: usize, book: BookRecord) -> BookOutcome {
    match provider.tag(&book).await {
        Ok(raw) => {
            let tags = parse_tags(&raw);
            debug!(title = %book.title, tags = tags.len(), "Tagged book");

            let records = tags
                .into_iter()
                .map(|tag| TaggedRecord::new(book.clone(), tag))
                .collect();

            BookOutcome {
                index,
                records,
                failed: false,
            }
        }
        Err(e) => {
            warn!(
                title = %book.title,
                error = %e,
                "Error tagging book, recording failure tag"
            );

            BookOutcome {
                index,
                records: vec![TaggedRecord::new(book, FAILED_TAG)],
                failed: true,
            }
        }
    }
}
