//! Library listing, personal entries, and cover override commands.

use tokio::runtime::Runtime;

use family_shelf::db::{accounts, entries, library, titles};
use family_shelf::model::SortOrder;

use super::{fmt_hours, require_account, Context};

/// List registered family members
pub fn cmd_accounts(rt: &Runtime, ctx: &Context) -> anyhow::Result<()> {
    rt.block_on(async {
        let pool = ctx.pool().await?;
        let mut conn = pool.acquire().await?;
        let members = accounts::list_accounts(&mut conn).await?;

        if members.is_empty() {
            println!("No members registered.");
            return Ok(());
        }

        println!("{:<4} {:<16} {:<24} {}", "ID", "Username", "Display name", "Steam id");
        println!("{}", "-".repeat(64));
        for m in &members {
            let admin = if m.is_admin { " (admin)" } else { "" };
            println!(
                "{:<4} {:<16} {:<24} {}{}",
                m.id,
                m.username,
                m.display_name.as_deref().unwrap_or("-"),
                m.steamid,
                admin
            );
        }
        Ok(())
    })
}

/// Show one member's library
pub fn cmd_library(rt: &Runtime, ctx: &Context, username: &str, sort: SortOrder) -> anyhow::Result<()> {
    rt.block_on(async {
        let pool = ctx.pool().await?;
        let account = require_account(&pool, username).await?;
        let mut conn = pool.acquire().await?;
        let rows = library::library_for_account(&mut conn, &account, sort).await?;

        if rows.is_empty() {
            println!("{} has no titles yet. Run `sync {}` first.", username, account.steamid);
            return Ok(());
        }

        println!("{:<8} {:<40} {:>9} {:>6}", "App", "Title", "Played", "Rating");
        println!("{}", "-".repeat(66));
        for row in &rows {
            let rating = row.rating.map(|r| r.to_string()).unwrap_or_else(|| "-".into());
            println!(
                "{:<8} {:<40} {:>9} {:>6}",
                row.appid,
                truncate(&row.title, 40),
                fmt_hours(row.hours),
                rating
            );
        }
        println!();
        println!("{} titles", rows.len());
        Ok(())
    })
}

/// Rate a title
pub fn cmd_rate(rt: &Runtime, ctx: &Context, username: &str, appid: i64, rating: i64) -> anyhow::Result<()> {
    rt.block_on(async {
        let pool = ctx.pool().await?;
        let account = require_account(&pool, username).await?;
        let mut conn = pool.acquire().await?;

        let clamped = entries::clamp_rating(rating);
        if clamped != rating {
            println!("Rating clamped to {}", clamped);
        }
        entries::rate_title(&mut conn, account.id, appid, rating).await?;
        println!("✓ {} rated {} at {}/{}", username, appid, clamped, entries::MAX_RATING);
        Ok(())
    })
}

/// Replace notes and play order, keeping the rating
pub fn cmd_notes(
    rt: &Runtime,
    ctx: &Context,
    username: &str,
    appid: i64,
    notes: &str,
    order: Option<i64>,
) -> anyhow::Result<()> {
    rt.block_on(async {
        let pool = ctx.pool().await?;
        let account = require_account(&pool, username).await?;
        let mut conn = pool.acquire().await?;

        let current = entries::get_entry(&mut conn, account.id, appid).await?;
        let update = entries::EntryUpdate {
            rating: current.as_ref().and_then(|e| e.rating),
            notes: notes.trim().to_string(),
            play_order: order.or_else(|| current.as_ref().and_then(|e| e.play_order)),
        };
        entries::save_entry(&mut conn, account.id, appid, &update).await?;
        println!("✓ Notes saved");
        Ok(())
    })
}

/// Override a title's cover
pub fn cmd_cover_set(rt: &Runtime, ctx: &Context, appid: i64, url: &str) -> anyhow::Result<()> {
    rt.block_on(async {
        let pool = ctx.pool().await?;
        let mut conn = pool.acquire().await?;
        titles::set_custom_cover(&mut conn, appid, url).await?;
        println!("✓ Custom cover set for {}", appid);
        Ok(())
    })
}

/// Drop a title's cover override
pub fn cmd_cover_reset(rt: &Runtime, ctx: &Context, appid: i64) -> anyhow::Result<()> {
    rt.block_on(async {
        let pool = ctx.pool().await?;
        let mut conn = pool.acquire().await?;
        titles::reset_custom_cover(&mut conn, appid).await?;
        println!("✓ Cover restored for {}", appid);
        Ok(())
    })
}

/// Show a title and the family's take on it
pub fn cmd_title(rt: &Runtime, ctx: &Context, appid: i64) -> anyhow::Result<()> {
    rt.block_on(async {
        let pool = ctx.pool().await?;
        let mut conn = pool.acquire().await?;
        let Some(title) = titles::get_title(&mut conn, appid).await? else {
            anyhow::bail!("Unknown title {}", appid);
        };

        println!("{}", title.title.as_deref().unwrap_or("Unknown title"));
        println!("{}", "=".repeat(40));
        if let Some(year) = title.release_year {
            println!("Released: {}", year);
        }
        let genres = title.genre_list();
        if !genres.is_empty() {
            println!("Genres:   {}", genres.join(", "));
        }
        let tags = title.tag_list();
        if !tags.is_empty() {
            println!("Tags:     {}", tags.join(", "));
        }
        if let Some(cover) = title.effective_cover() {
            let marker = if title.custom_cover_url.is_some() { " (custom)" } else { "" };
            println!("Cover:    {}{}", cover, marker);
        }
        if let Some(desc) = &title.description {
            println!();
            println!("{}", desc);
        }

        let family = entries::family_entries(&mut conn, appid).await?;
        if !family.is_empty() {
            println!();
            println!("Family:");
            for entry in &family {
                let rating = entry
                    .rating
                    .map(|r| format!("{}/{}", r, entries::MAX_RATING))
                    .unwrap_or_else(|| "unrated".into());
                println!("  {:<20} {}", entry.display_name, rating);
                if !entry.notes.is_empty() {
                    println!("    \"{}\"", entry.notes);
                }
            }
        }
        Ok(())
    })
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}
