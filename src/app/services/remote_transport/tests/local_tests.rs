//! Local SQLite and dry-run transports

use std::time::Duration;

use rusqlite::Connection;

use crate::Error;

use crate::app::services::remote_transport::{
    DryRunTransport, SqliteTransport, Transport, TransportFailure,
};

const TIMEOUT: Duration = Duration::from_secs(1);

fn transport_with_table() -> SqliteTransport {
    let connection = Connection::open_in_memory().unwrap();
    connection
        .execute_batch("CREATE TABLE facilities (id INTEGER PRIMARY KEY, name TEXT NOT NULL)")
        .unwrap();
    SqliteTransport::from_connection(connection)
}

fn row_count(transport: &SqliteTransport) -> i64 {
    transport.with_connection(|c| {
        c.query_row("SELECT COUNT(*) FROM facilities", [], |row| row.get(0))
            .unwrap()
    })
}

#[tokio::test]
async fn test_sqlite_applies_statements() {
    let transport = transport_with_table();

    let outcome = transport
        .submit("INSERT INTO facilities (name) VALUES ('a'), ('b')", TIMEOUT)
        .await;

    assert_eq!(outcome, Ok(()));
    assert_eq!(row_count(&transport), 2);

    transport.submit("DELETE FROM facilities", TIMEOUT).await.unwrap();
    assert_eq!(row_count(&transport), 0);
}

#[tokio::test]
async fn test_sqlite_failure_is_local_and_batch_atomic() {
    let transport = transport_with_table();

    // Second row violates NOT NULL, so the whole statement is rejected
    let outcome = transport
        .submit("INSERT INTO facilities (name) VALUES ('a'), (NULL)", TIMEOUT)
        .await;

    assert!(matches!(outcome, Err(TransportFailure::Local { .. })));
    assert_eq!(row_count(&transport), 0);
}

#[tokio::test]
async fn test_sqlite_open_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("local.sqlite");

    let transport = SqliteTransport::open(&path).unwrap();
    transport
        .submit("CREATE TABLE facilities (name TEXT)", TIMEOUT)
        .await
        .unwrap();

    assert!(path.exists());
}

#[test]
fn test_sqlite_open_failure_is_local_database_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("missing").join("local.sqlite");

    let result = SqliteTransport::open(&path);

    assert!(matches!(result, Err(Error::LocalDatabase { .. })));
}

#[tokio::test]
async fn test_dry_run_counts_statements_and_bytes() {
    let transport = DryRunTransport::new();

    transport.submit("DELETE FROM facilities", TIMEOUT).await.unwrap();
    transport.submit("SELECT 1", TIMEOUT).await.unwrap();

    assert_eq!(transport.statements(), 2);
    assert_eq!(transport.bytes(), "DELETE FROM facilities".len() + 8);
}
