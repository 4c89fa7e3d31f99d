//! Database module for accounts, titles, ownership, and playtime.
//!
//! Uses SQLx with SQLite for lightweight, embedded database storage.
//! Every accessor takes an explicit `&mut SqliteConnection` so callers
//! decide the unit of work: pass a pooled connection for single
//! statements, or `&mut *tx` to group several writes in a transaction.
//!
//! # Example
//!
//! ```ignore
//! use family_shelf::db::{self, init_db};
//!
//! let pool = init_db("sqlite:family_shelf.db").await?;
//! let mut conn = pool.acquire().await?;
//! let members = db::accounts::list_accounts(&mut conn).await?;
//! ```

pub mod accounts;
pub mod entries;
pub mod library;
pub mod titles;

use sqlx::migrate::MigrateDatabase;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

/// Default database filename.
pub const DEFAULT_DB_NAME: &str = "family_shelf.db";

/// Build a SQLite database URL from an optional path.
///
/// If no path is provided, uses [`DEFAULT_DB_NAME`] in the current directory.
pub fn db_url(path: Option<&std::path::Path>) -> String {
    match path {
        Some(p) => format!("sqlite:{}", p.display()),
        None => format!("sqlite:{}", DEFAULT_DB_NAME),
    }
}

/// Initialize the database connection pool and run migrations.
///
/// Creates the database file if it doesn't exist, establishes a connection
/// pool with up to 5 connections, and runs all pending migrations.
///
/// # Errors
///
/// Returns an error if:
/// - Database creation fails
/// - Connection cannot be established
/// - Migration fails
pub async fn init_db(db_url: &str) -> crate::error::Result<SqlitePool> {
    if !sqlx::Sqlite::database_exists(db_url).await.unwrap_or(false) {
        sqlx::Sqlite::create_database(db_url).await?;
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(db_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

/// Current time in the format stored in timestamp columns.
pub(crate) fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}
