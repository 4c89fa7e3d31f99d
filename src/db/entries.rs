//! Personal ratings, notes, and play order.
//!
//! These rows belong to the account owner; synchronization never reads or
//! writes them.

use sqlx::SqliteConnection;

use crate::error::Result;
use crate::model::{AppId, UserGameEntry};

pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 10;

/// Clamp a rating into the accepted range.
pub fn clamp_rating(rating: i64) -> i64 {
    rating.clamp(MIN_RATING, MAX_RATING)
}

/// Set a member's rating for a title, creating the entry if needed.
///
/// Out-of-range ratings are clamped. Existing notes and play order are
/// kept.
pub async fn rate_title(
    conn: &mut SqliteConnection,
    account_id: i64,
    appid: AppId,
    rating: i64,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO user_game_entries (account_id, appid, rating, notes, play_order, created_at)
        VALUES (?, ?, ?, '', NULL, ?)
        ON CONFLICT(account_id, appid) DO UPDATE SET rating = excluded.rating
        "#,
    )
    .bind(account_id)
    .bind(appid)
    .bind(clamp_rating(rating))
    .bind(crate::db::now_rfc3339())
    .execute(&mut *conn)
    .await?;
    Ok(())
}

/// Full replacement of a member's entry for a title.
#[derive(Debug, Clone, Default)]
pub struct EntryUpdate {
    /// `None` clears the rating
    pub rating: Option<i64>,
    pub notes: String,
    pub play_order: Option<i64>,
}

/// Save rating, notes, and play order together.
pub async fn save_entry(
    conn: &mut SqliteConnection,
    account_id: i64,
    appid: AppId,
    update: &EntryUpdate,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO user_game_entries (account_id, appid, rating, notes, play_order, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        ON CONFLICT(account_id, appid) DO UPDATE SET
            rating = excluded.rating,
            notes = excluded.notes,
            play_order = excluded.play_order
        "#,
    )
    .bind(account_id)
    .bind(appid)
    .bind(update.rating.map(clamp_rating))
    .bind(&update.notes)
    .bind(update.play_order)
    .bind(crate::db::now_rfc3339())
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn get_entry(
    conn: &mut SqliteConnection,
    account_id: i64,
    appid: AppId,
) -> sqlx::Result<Option<UserGameEntry>> {
    sqlx::query_as::<_, UserGameEntry>(
        r#"
        SELECT id, account_id, appid, rating, notes, play_order, created_at
        FROM user_game_entries
        WHERE account_id = ? AND appid = ?
        "#,
    )
    .bind(account_id)
    .bind(appid)
    .fetch_optional(&mut *conn)
    .await
}

/// A family member's take on a title.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FamilyEntry {
    pub display_name: String,
    pub rating: Option<i64>,
    pub notes: String,
}

/// Every member's rating and notes for one title.
pub async fn family_entries(
    conn: &mut SqliteConnection,
    appid: AppId,
) -> sqlx::Result<Vec<FamilyEntry>> {
    sqlx::query_as::<_, FamilyEntry>(
        r#"
        SELECT COALESCE(a.display_name, a.username) AS display_name, e.rating, e.notes
        FROM user_game_entries e
        JOIN accounts a ON a.id = e.account_id
        WHERE e.appid = ?
        ORDER BY display_name COLLATE NOCASE
        "#,
    )
    .bind(appid)
    .fetch_all(&mut *conn)
    .await
}
