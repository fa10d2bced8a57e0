//! Database initialization
//!
//! Opens (creating when missing) the single-file SQLite store and makes sure
//! the `BOOK` table exists. Table creation is idempotent; there is no
//! migration tooling.

use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Open the store at `db_path`, creating the directory, file and table if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    // Path goes through as a filename, never as a URL, so '%' and '?' are literal
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    create_book_table(&pool).await?;

    Ok(pool)
}

/// Create the BOOK table. No uniqueness constraint: re-running the pipeline
/// over the same export appends duplicate rows.
pub async fn create_book_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS BOOK (
            title TEXT NOT NULL,
            author TEXT NOT NULL,
            authorLF TEXT NOT NULL,
            additionalAuthors TEXT NOT NULL,
            tag TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
