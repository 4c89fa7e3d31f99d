//! Ownership and playtime rows, plus the per-account library view.

use std::collections::HashSet;

use sqlx::SqliteConnection;

use crate::model::{Account, AppId, PlaytimeRecord, SortOrder, SteamId};

/// Record that an account owns a title, unless it already does.
///
/// Returns whether a row was inserted.
pub async fn ensure_ownership(
    conn: &mut SqliteConnection,
    steam_id: &SteamId,
    appid: AppId,
) -> sqlx::Result<bool> {
    let result = sqlx::query("INSERT OR IGNORE INTO owned_titles (steamid, appid) VALUES (?, ?)")
        .bind(steam_id.as_str())
        .bind(appid)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Every title id currently owned by an account.
pub async fn owned_app_ids(
    conn: &mut SqliteConnection,
    steam_id: &SteamId,
) -> sqlx::Result<HashSet<AppId>> {
    let rows: Vec<(AppId,)> = sqlx::query_as("SELECT appid FROM owned_titles WHERE steamid = ?")
        .bind(steam_id.as_str())
        .fetch_all(&mut *conn)
        .await?;
    Ok(rows.into_iter().map(|(id,)| id).collect())
}

/// Delete ownership and playtime for one (account, title) pair.
pub async fn remove_ownership(
    conn: &mut SqliteConnection,
    steam_id: &SteamId,
    appid: AppId,
) -> sqlx::Result<()> {
    sqlx::query("DELETE FROM owned_titles WHERE steamid = ? AND appid = ?")
        .bind(steam_id.as_str())
        .bind(appid)
        .execute(&mut *conn)
        .await?;
    sqlx::query("DELETE FROM playtime WHERE steamid = ? AND appid = ?")
        .bind(steam_id.as_str())
        .bind(appid)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Replace the cumulative hours for an (account, title) pair.
///
/// The source reports lifetime totals, so the stored value is overwritten,
/// never accumulated.
pub async fn upsert_playtime(
    conn: &mut SqliteConnection,
    steam_id: &SteamId,
    appid: AppId,
    hours: f64,
    synced_at: &str,
) -> sqlx::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO playtime (steamid, appid, hours, last_synced)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(steamid, appid) DO UPDATE SET
            hours = excluded.hours,
            last_synced = excluded.last_synced
        "#,
    )
    .bind(steam_id.as_str())
    .bind(appid)
    .bind(hours)
    .bind(synced_at)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

/// Every playtime row for an account, ordered by title id.
pub async fn playtime_for(
    conn: &mut SqliteConnection,
    steam_id: &SteamId,
) -> sqlx::Result<Vec<PlaytimeRecord>> {
    sqlx::query_as::<_, PlaytimeRecord>(
        "SELECT steamid, appid, hours, last_synced FROM playtime WHERE steamid = ? ORDER BY appid",
    )
    .bind(steam_id.as_str())
    .fetch_all(&mut *conn)
    .await
}

/// One row of an account's library listing.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LibraryEntry {
    pub appid: AppId,
    /// Title name (or "Unknown title")
    pub title: String,
    /// Effective cover: the custom cover when set, else the primary
    pub cover_url: Option<String>,
    pub hours: f64,
    /// The account's own rating
    pub rating: Option<i64>,
}

/// An account's owned titles with hours and personal rating.
pub async fn library_for_account(
    conn: &mut SqliteConnection,
    account: &Account,
    sort: SortOrder,
) -> sqlx::Result<Vec<LibraryEntry>> {
    let order_by = match sort {
        SortOrder::Name => "title COLLATE NOCASE ASC",
        SortOrder::Hours => "hours DESC, title COLLATE NOCASE ASC",
        SortOrder::Rating => "COALESCE(rating, -1) DESC, title COLLATE NOCASE ASC",
    };

    sqlx::query_as::<_, LibraryEntry>(&format!(
        r#"
        SELECT
            o.appid,
            COALESCE(t.title, 'Unknown title') AS title,
            COALESCE(t.custom_cover_url, t.cover_url) AS cover_url,
            COALESCE(p.hours, 0.0) AS hours,
            e.rating
        FROM owned_titles o
        LEFT JOIN titles t ON t.appid = o.appid
        LEFT JOIN playtime p ON p.appid = o.appid AND p.steamid = o.steamid
        LEFT JOIN user_game_entries e ON e.appid = o.appid AND e.account_id = ?
        WHERE o.steamid = ?
        ORDER BY {order_by}
        "#
    ))
    .bind(account.id)
    .bind(&account.steamid)
    .fetch_all(&mut *conn)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{insert_account, steam_id, temp_db};

    #[tokio::test]
    async fn test_ownership_is_unique() {
        let (pool, _dir) = temp_db().await;
        let mut conn = pool.acquire().await.unwrap();
        let sid = steam_id(1);

        assert!(ensure_ownership(&mut conn, &sid, 440).await.unwrap());
        assert!(!ensure_ownership(&mut conn, &sid, 440).await.unwrap());

        let owned = owned_app_ids(&mut conn, &sid).await.unwrap();
        assert_eq!(owned, HashSet::from([440]));
    }

    #[tokio::test]
    async fn test_playtime_is_replaced_not_accumulated() {
        let (pool, _dir) = temp_db().await;
        let mut conn = pool.acquire().await.unwrap();
        let sid = steam_id(1);

        upsert_playtime(&mut conn, &sid, 440, 2.0, "2025-01-01T00:00:00+00:00")
            .await
            .unwrap();
        upsert_playtime(&mut conn, &sid, 440, 3.5, "2025-01-02T00:00:00+00:00")
            .await
            .unwrap();

        let rows = playtime_for(&mut conn, &sid).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].hours, 3.5);
        assert_eq!(rows[0].last_synced, "2025-01-02T00:00:00+00:00");
    }

    #[tokio::test]
    async fn test_remove_ownership_clears_playtime() {
        let (pool, _dir) = temp_db().await;
        let mut conn = pool.acquire().await.unwrap();
        let sid = steam_id(1);

        ensure_ownership(&mut conn, &sid, 440).await.unwrap();
        upsert_playtime(&mut conn, &sid, 440, 1.0, "t").await.unwrap();
        remove_ownership(&mut conn, &sid, 440).await.unwrap();

        assert!(owned_app_ids(&mut conn, &sid).await.unwrap().is_empty());
        assert!(playtime_for(&mut conn, &sid).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_library_sorting() {
        let (pool, _dir) = temp_db().await;
        let mut conn = pool.acquire().await.unwrap();
        let sid = steam_id(1);
        let account_id = insert_account(&mut conn, "alice", &sid).await;
        let account = crate::db::accounts::get_by_id(&mut conn, account_id)
            .await
            .unwrap()
            .unwrap();

        for (appid, name, hours) in [(1, "Zeta", 1.0), (2, "alpha", 9.0), (3, "Mid", 4.0)] {
            crate::db::titles::ensure_title_stub(&mut conn, appid, Some(name))
                .await
                .unwrap();
            ensure_ownership(&mut conn, &sid, appid).await.unwrap();
            upsert_playtime(&mut conn, &sid, appid, hours, "t").await.unwrap();
        }
        crate::db::entries::rate_title(&mut conn, account_id, 1, 8)
            .await
            .unwrap();

        let by_name = library_for_account(&mut conn, &account, SortOrder::Name)
            .await
            .unwrap();
        let names: Vec<_> = by_name.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(names, vec!["alpha", "Mid", "Zeta"]);

        let by_hours = library_for_account(&mut conn, &account, SortOrder::Hours)
            .await
            .unwrap();
        assert_eq!(by_hours[0].appid, 2);

        let by_rating = library_for_account(&mut conn, &account, SortOrder::Rating)
            .await
            .unwrap();
        assert_eq!(by_rating[0].appid, 1);
        assert_eq!(by_rating[0].rating, Some(8));
    }
}
