//! Test utilities and fixtures for family-shelf tests.
//!
//! # Example
//!
//! ```ignore
//! use family_shelf::test_utils::{insert_account, steam_id, temp_db};
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let (pool, _dir) = temp_db().await;
//!     let mut conn = pool.acquire().await.unwrap();
//!     let id = insert_account(&mut conn, "alice", &steam_id(1)).await;
//!     // ... test logic
//! }
//! ```

use sqlx::sqlite::SqlitePool;
use sqlx::SqliteConnection;
use tempfile::TempDir;

use crate::db::accounts::{self, NewAccount};
use crate::model::SteamId;

/// Creates a temporary database for testing.
///
/// The database is created in a temporary directory that is automatically
/// cleaned up when the returned `TempDir` is dropped. Migrations are run
/// automatically. Keep the TempDir alive for the duration of your test.
pub async fn temp_db() -> (SqlitePool, TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    let db_path = dir.path().join("test.db");
    let db_url = format!("sqlite:{}", db_path.display());

    let pool = crate::db::init_db(&db_url)
        .await
        .expect("Failed to initialize test database");

    (pool, dir)
}

/// A distinct, valid Steam id for each `n`.
pub fn steam_id(n: u64) -> SteamId {
    SteamId::parse(&format!("7656119800{:07}", n)).expect("fixture steam id is valid")
}

/// Registers an account with a dummy credential and returns its id.
pub async fn insert_account(conn: &mut SqliteConnection, username: &str, steam_id: &SteamId) -> i64 {
    accounts::create_account(
        conn,
        &NewAccount {
            username,
            credential_hash: "test-hash",
            steam_id,
            profile: None,
        },
    )
    .await
    .expect("Failed to insert test account")
}

/// Serve every request with the same canned HTTP response.
///
/// Returns the base URL (`http://127.0.0.1:<port>`). The server runs until
/// the test's runtime shuts down.
pub async fn http_stub(status: u16, body: &'static str) -> String {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub server");
    let addr = listener.local_addr().expect("Stub server has no address");

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            // Read the request head; bodies are never sent by our clients.
            let mut buf = vec![0u8; 8192];
            let mut read = 0;
            while read < buf.len() {
                match socket.read(&mut buf[read..]).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => read += n,
                }
                if buf[..read].windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }

            let response = format!(
                "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\n\
                 Content-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });

    format!("http://{}", addr)
}

/// Accept connections and never answer, to exercise client timeouts.
pub async fn silent_stub() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub server");
    let addr = listener.local_addr().expect("Stub server has no address");

    tokio::spawn(async move {
        let mut open = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            open.push(socket);
        }
    });

    format!("http://{}", addr)
}
