//! Tagged book persistence
//!
//! One row per (book, tag) pair, tag stored lowercase.

use booktag_common::{BookRecord, Error, Result, TaggedRecord};
use sqlx::SqlitePool;
use std::collections::HashSet;

const INSERT_TAGGED_BOOK: &str = r#"
    INSERT INTO BOOK (title, author, authorLF, additionalAuthors, tag)
    VALUES (?, ?, ?, ?, lower(?))
"#;

/// Insert all records in one transaction.
///
/// Either every record is committed or none is: the first failing insert
/// rolls the transaction back and its error is returned. No check is made
/// against rows already in the table.
///
/// # Returns
/// Number of rows inserted
pub async fn persist_tagged_records(pool: &SqlitePool, records: &[TaggedRecord]) -> Result<u64> {
    tracing::debug!(records = records.len(), "Persisting tagged books");

    let mut tx = pool.begin().await?;
    let mut inserted: u64 = 0;

    for record in records {
        let result = sqlx::query(INSERT_TAGGED_BOOK)
            .bind(&record.book.title)
            .bind(&record.book.author)
            .bind(&record.book.author_sort_key)
            .bind(&record.book.co_authors)
            .bind(&record.tag)
            .execute(&mut *tx)
            .await;

        if let Err(source) = result {
            if let Err(rollback_err) = tx.rollback().await {
                tracing::error!(error = %rollback_err, "Rollback failed");
            }
            return Err(Error::Insert {
                title: record.book.title.clone(),
                source,
            });
        }

        inserted += 1;
    }

    tx.commit().await?;

    tracing::info!(inserted, "Inserted tagged books into BOOK table");

    Ok(inserted)
}

/// Distinct books that already have at least one row in the store
pub async fn load_tagged_books(pool: &SqlitePool) -> Result<HashSet<BookRecord>> {
    let rows = sqlx::query_as::<_, (String, String, String, String)>(
        "SELECT DISTINCT title, author, authorLF, additionalAuthors FROM BOOK",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(title, author, author_sort_key, co_authors)| {
            BookRecord::new(title, author, author_sort_key, co_authors)
        })
        .collect())
}

/// Total number of (book, tag) rows
pub async fn count_rows(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM BOOK")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Tags stored for a title, in insertion order
pub async fn tags_for_title(pool: &SqlitePool, title: &str) -> Result<Vec<String>> {
    let tags = sqlx::query_scalar::<_, String>(
        "SELECT tag FROM BOOK WHERE title = ? ORDER BY rowid",
    )
    .bind(title)
    .fetch_all(pool)
    .await?;
    Ok(tags)
}
