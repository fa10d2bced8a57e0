//! Database access for booktag
//!
//! The store is a single SQLite file holding the `BOOK` table.

pub mod books;

pub use books::{count_rows, load_tagged_books, persist_tagged_records, tags_for_title};

use booktag_common::Result;
use sqlx::SqlitePool;
use std::path::Path;

/// Open (creating if necessary) the store at `db_path`.
///
/// The containing directory is created first when it does not exist.
pub async fn init_database_pool(db_path: &Path) -> Result<SqlitePool> {
    tracing::debug!("Opening database: {}", db_path.display());
    booktag_common::db::init_database(db_path).await
}
