//! Global title metadata.
//!
//! Title rows are shared by every account. Synchronization only ever
//! inserts stubs and merges fetched metadata with COALESCE semantics; the
//! custom cover column is written exclusively by [`set_custom_cover`] and
//! [`reset_custom_cover`].

use std::collections::HashSet;

use sqlx::SqliteConnection;

use crate::enrichment::TitleMetadata;
use crate::error::{Error, Result};
use crate::model::{AppId, Title};

const TITLE_COLUMNS: &str =
    "appid, title, cover_url, custom_cover_url, description, genres, release_year, tags";

/// Insert a title row carrying only its name, unless one already exists.
///
/// Never modifies an existing row. Returns whether a row was inserted.
pub async fn ensure_title_stub(
    conn: &mut SqliteConnection,
    appid: AppId,
    name: Option<&str>,
) -> sqlx::Result<bool> {
    let result = sqlx::query("INSERT OR IGNORE INTO titles (appid, title) VALUES (?, ?)")
        .bind(appid)
        .bind(name.filter(|n| !n.trim().is_empty()))
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Ids of every title whose metadata has already been fetched.
///
/// A title counts as enriched once any of its cover, tags, or description
/// is set; a bare stub does not.
pub async fn enriched_app_ids(conn: &mut SqliteConnection) -> sqlx::Result<HashSet<AppId>> {
    let rows: Vec<(AppId,)> = sqlx::query_as(
        r#"
        SELECT appid FROM titles
        WHERE cover_url IS NOT NULL
           OR tags IS NOT NULL
           OR description IS NOT NULL
        "#,
    )
    .fetch_all(&mut *conn)
    .await?;
    Ok(rows.into_iter().map(|(id,)| id).collect())
}

/// Merge fetched metadata into a title row.
///
/// Empty or missing values never overwrite what is stored. The row is
/// created if it does not exist yet. `custom_cover_url` is not touched.
pub async fn merge_metadata(
    conn: &mut SqliteConnection,
    appid: AppId,
    meta: &TitleMetadata,
) -> sqlx::Result<()> {
    let tags = (!meta.tags.is_empty()).then(|| meta.tags.join(","));

    sqlx::query(
        r#"
        INSERT INTO titles (appid, title, cover_url, description, genres, release_year, tags)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(appid) DO UPDATE SET
            title        = COALESCE(excluded.title, titles.title),
            cover_url    = COALESCE(excluded.cover_url, titles.cover_url),
            description  = COALESCE(excluded.description, titles.description),
            genres       = COALESCE(excluded.genres, titles.genres),
            release_year = COALESCE(excluded.release_year, titles.release_year),
            tags         = COALESCE(excluded.tags, titles.tags)
        "#,
    )
    .bind(appid)
    .bind(non_empty(meta.name.as_deref()))
    .bind(non_empty(meta.cover_url.as_deref()))
    .bind(non_empty(meta.description.as_deref()))
    .bind(non_empty(meta.genres.as_deref()))
    .bind(meta.release_year.map(i64::from))
    .bind(tags)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

pub async fn get_title(conn: &mut SqliteConnection, appid: AppId) -> sqlx::Result<Option<Title>> {
    sqlx::query_as::<_, Title>(&format!("SELECT {TITLE_COLUMNS} FROM titles WHERE appid = ?"))
        .bind(appid)
        .fetch_optional(&mut *conn)
        .await
}

/// Set the user-chosen cover for a title.
pub async fn set_custom_cover(conn: &mut SqliteConnection, appid: AppId, url: &str) -> Result<()> {
    let url = url.trim();
    if url.is_empty() {
        return Err(Error::validation("cover url", "must not be empty"));
    }
    if !(url.starts_with("https://") || url.starts_with("http://")) {
        return Err(Error::validation("cover url", "must be an http(s) URL"));
    }

    let result = sqlx::query("UPDATE titles SET custom_cover_url = ? WHERE appid = ?")
        .bind(url)
        .bind(appid)
        .execute(&mut *conn)
        .await?;
    if result.rows_affected() == 0 {
        return Err(Error::not_found("title", appid.to_string()));
    }
    Ok(())
}

/// Drop the user-chosen cover so the primary one shows again.
pub async fn reset_custom_cover(conn: &mut SqliteConnection, appid: AppId) -> Result<()> {
    let result = sqlx::query("UPDATE titles SET custom_cover_url = NULL WHERE appid = ?")
        .bind(appid)
        .execute(&mut *conn)
        .await?;
    if result.rows_affected() == 0 {
        return Err(Error::not_found("title", appid.to_string()));
    }
    Ok(())
}
