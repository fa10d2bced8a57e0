//! Library export extractor
//!
//! Reads a Goodreads-style CSV export and pulls the four book columns
//! (title, author, author l-f, additional authors) out of every data row.

use booktag_common::{BookRecord, Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

// 0-based column indices; column 0 is the book id
const TITLE_COLUMN: usize = 1;
const AUTHOR_COLUMN: usize = 2;
const AUTHOR_SORT_COLUMN: usize = 3;
const CO_AUTHORS_COLUMN: usize = 4;

/// Extract books from CSV text.
///
/// The first row is the header and is discarded. Rows that stop before the
/// additional-authors column are skipped. Field values are kept verbatim.
///
/// # Errors
/// - `Error::InvalidInput` if the source has no rows at all
/// - `Error::Csv` if any row cannot be decoded
pub fn extract_books<R: Read>(source: R) -> Result<Vec<BookRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::None)
        .from_reader(source);

    let mut records = reader.records();

    match records.next() {
        None => return Err(Error::InvalidInput("CSV source is empty".to_string())),
        Some(header) => {
            header?;
        }
    }

    let mut books = Vec::new();
    let mut skipped = 0usize;

    for (row, record) in records.enumerate() {
        let record = record?;

        if record.len() <= CO_AUTHORS_COLUMN {
            debug!(
                row = row + 2,
                fields = record.len(),
                "Skipping short row"
            );
            skipped += 1;
            continue;
        }

        books.push(BookRecord::new(
            &record[TITLE_COLUMN],
            &record[AUTHOR_COLUMN],
            &record[AUTHOR_SORT_COLUMN],
            &record[CO_AUTHORS_COLUMN],
        ));
    }

    info!(books = books.len(), skipped, "Extracted books from library export");

    Ok(books)
}

/// Open `path` and extract books from it
pub fn extract_books_from_path(path: &Path) -> Result<Vec<BookRecord>> {
    let file = File::open(path).map_err(|e| {
        Error::Io(std::io::Error::new(
            e.kind(),
            format!("failed to open {}: {}", path.display(), e),
        ))
    })?;

    extract_books(file)
}
