//! Unit tests for database initialization
//!
//! The store directory and file are created on demand; opening an existing
//! store is a no-op for the schema.

use booktag_common::db::init::init_database;
use tempfile::TempDir;

#[tokio::test]
async fn test_database_creation_when_missing() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("nested").join("db").join("taggedbooks.db");

    assert!(!db_path.parent().unwrap().exists());

    let result = init_database(&db_path).await;

    assert!(result.is_ok(), "Database initialization failed: {:?}", result.err());
    assert!(db_path.exists(), "Database file was not created");
}

#[tokio::test]
async fn test_database_opens_existing() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("taggedbooks.db");

    let pool1 = init_database(&db_path).await;
    assert!(pool1.is_ok());

    sqlx::query("INSERT INTO BOOK VALUES ('Dune', 'Frank Herbert', 'Herbert, Frank', '', 'scifi')")
        .execute(pool1.as_ref().unwrap())
        .await
        .unwrap();
    pool1.unwrap().close().await;

    let pool2 = init_database(&db_path).await;
    assert!(pool2.is_ok(), "Failed to open existing database: {:?}", pool2.err());

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM BOOK")
        .fetch_one(&pool2.unwrap())
        .await
        .unwrap();
    assert_eq!(count, 1, "Reopening must not recreate the table");
}

#[tokio::test]
async fn test_book_table_columns() {
    let temp_dir = TempDir::new().unwrap();
    let pool = init_database(&temp_dir.path().join("schema.db")).await.unwrap();

    let columns: Vec<String> = sqlx::query_scalar("SELECT name FROM pragma_table_info('BOOK')")
        .fetch_all(&pool)
        .await
        .unwrap();

    assert_eq!(
        columns,
        vec!["title", "author", "authorLF", "additionalAuthors", "tag"]
    );
}

#[tokio::test]
async fn test_path_with_percent_opens_that_exact_file() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("books%20v2.db");

    let pool = init_database(&db_path).await.unwrap();
    sqlx::query("INSERT INTO BOOK VALUES ('Dune', 'Frank Herbert', 'Herbert, Frank', '', 'scifi')")
        .execute(&pool)
        .await
        .unwrap();
    pool.close().await;

    assert!(db_path.exists(), "Configured file was not created");
    assert!(
        !temp_dir.path().join("books v2.db").exists(),
        "Path must not be percent-decoded"
    );

    let entries: Vec<_> = std::fs::read_dir(temp_dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| !name.ends_with("-wal") && !name.ends_with("-shm") && !name.ends_with("-journal"))
        .collect();
    assert_eq!(entries, vec!["books%20v2.db"]);
}

#[tokio::test]
async fn test_path_with_question_mark_opens() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("what?.db");

    let result = init_database(&db_path).await;

    assert!(result.is_ok(), "Database initialization failed: {:?}", result.err());
    assert!(db_path.exists(), "Configured file was not created");
}

#[tokio::test]
async fn test_busy_timeout_on_every_connection() {
    let temp_dir = TempDir::new().unwrap();
    let pool = init_database(&temp_dir.path().join("timeout.db")).await.unwrap();

    // Hold several connections at once so each is a distinct pooled connection
    let mut held = Vec::new();
    for _ in 0..3 {
        let mut conn = pool.acquire().await.unwrap();
        let timeout: i64 = sqlx::query_scalar("PRAGMA busy_timeout")
            .fetch_one(&mut *conn)
            .await
            .unwrap();
        assert_eq!(timeout, 5000);
        held.push(conn);
    }
}
