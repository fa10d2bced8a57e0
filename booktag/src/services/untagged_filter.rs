//! Skip books that already have rows in the store
//!
//! Opt-in only: the default pipeline tags and inserts every extracted book,
//! duplicates included.

use booktag_common::BookRecord;
use std::collections::HashSet;

/// Keep books (in input order) whose four fields are not in `tagged`
pub fn filter_untagged(books: Vec<BookRecord>, tagged: &HashSet<BookRecord>) -> Vec<BookRecord> {
    let before = books.len();
    let untagged: Vec<BookRecord> = books
        .into_iter()
        .filter(|book| !tagged.contains(book))
        .collect();

    tracing::info!(
        total = before,
        already_tagged = before - untagged.len(),
        remaining = untagged.len(),
        "Filtered already-tagged books"
    );

    untagged
}
