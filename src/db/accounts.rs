//! Account persistence.

use sqlx::SqliteConnection;

use crate::error::{Error, Result};
use crate::model::{Account, SteamId};
use crate::platform::PlayerProfile;

const ACCOUNT_COLUMNS: &str =
    "id, username, credential_hash, steamid, display_name, avatar_url, is_admin";

/// Fields needed to register a family member.
#[derive(Debug, Clone)]
pub struct NewAccount<'a> {
    pub username: &'a str,
    /// Opaque hash produced by the authentication layer
    pub credential_hash: &'a str,
    pub steam_id: &'a SteamId,
    /// Profile fetched at registration time, if any
    pub profile: Option<&'a PlayerProfile>,
}

/// Register a new account.
///
/// Fails with a validation error if the username or Steam id is already
/// taken.
pub async fn create_account(conn: &mut SqliteConnection, new: &NewAccount<'_>) -> Result<i64> {
    let username = new.username.trim();
    if username.is_empty() {
        return Err(Error::validation("username", "must not be empty"));
    }

    let taken: Option<(String,)> = sqlx::query_as(
        "SELECT username FROM accounts WHERE username = ? OR steamid = ?",
    )
    .bind(username)
    .bind(new.steam_id.as_str())
    .fetch_optional(&mut *conn)
    .await?;

    if let Some((existing,)) = taken {
        let field = if existing == username { "username" } else { "steam id" };
        return Err(Error::validation(field, "already registered"));
    }

    let result = sqlx::query(
        r#"
        INSERT INTO accounts (username, credential_hash, steamid, display_name, avatar_url)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(username)
    .bind(new.credential_hash)
    .bind(new.steam_id.as_str())
    .bind(new.profile.map(|p| p.display_name.as_str()))
    .bind(new.profile.and_then(|p| p.avatar_url.as_deref()))
    .execute(&mut *conn)
    .await?;

    Ok(result.last_insert_rowid())
}

pub async fn get_by_username(
    conn: &mut SqliteConnection,
    username: &str,
) -> sqlx::Result<Option<Account>> {
    sqlx::query_as::<_, Account>(&format!(
        "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE username = ?"
    ))
    .bind(username)
    .fetch_optional(&mut *conn)
    .await
}

pub async fn get_by_id(conn: &mut SqliteConnection, id: i64) -> sqlx::Result<Option<Account>> {
    sqlx::query_as::<_, Account>(&format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = ?"))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
}

pub async fn get_by_steam_id(
    conn: &mut SqliteConnection,
    steam_id: &SteamId,
) -> sqlx::Result<Option<Account>> {
    sqlx::query_as::<_, Account>(&format!(
        "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE steamid = ?"
    ))
    .bind(steam_id.as_str())
    .fetch_optional(&mut *conn)
    .await
}

/// All accounts, ordered by display name (falling back to username).
pub async fn list_accounts(conn: &mut SqliteConnection) -> sqlx::Result<Vec<Account>> {
    sqlx::query_as::<_, Account>(&format!(
        "SELECT {ACCOUNT_COLUMNS} FROM accounts \
         ORDER BY COALESCE(display_name, username) COLLATE NOCASE"
    ))
    .fetch_all(&mut *conn)
    .await
}

/// Overwrite the cached display name and avatar for a Steam id.
///
/// A profile without an avatar keeps the stored one. Returns `false` when no account is linked to the id.
pub async fn update_profile(
    conn: &mut SqliteConnection,
    steam_id: &SteamId,
    profile: &PlayerProfile,
) -> sqlx::Result<bool> {
    let result = sqlx::query("UPDATE accounts SET display_name = ?, avatar_url = COALESCE(?, avatar_url) WHERE steamid = ?")
        .bind(&profile.display_name)
        .bind(&profile.avatar_url)
        .bind(steam_id.as_str())
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected() > 0)
}
