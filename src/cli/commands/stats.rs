//! Family rankings and statistics commands.

use tokio::runtime::Runtime;

use std::collections::HashMap;

use family_shelf::db::accounts;
use family_shelf::model::{SortOrder, SteamId};
use family_shelf::stats;

use super::{fmt_hours, require_account, Context};

/// Rank every title the family owns
pub fn cmd_family(rt: &Runtime, ctx: &Context, sort: SortOrder) -> anyhow::Result<()> {
    rt.block_on(async {
        let pool = ctx.pool().await?;
        let mut conn = pool.acquire().await?;
        let rankings = stats::family_rankings(&mut conn, sort).await?;

        if rankings.is_empty() {
            println!("The family library is empty.");
            return Ok(());
        }

        println!("{:<8} {:<40} {:>7} {:>7} {:>10}", "App", "Title", "Avg", "Spread", "Hours");
        println!("{}", "-".repeat(76));
        for r in &rankings {
            let avg = r.average_rating.map(|a| format!("{:.1}", a)).unwrap_or_else(|| "-".into());
            let spread = r.rating_spread.map(|s| format!("{:.2}", s)).unwrap_or_else(|| "-".into());
            println!(
                "{:<8} {:<40} {:>7} {:>7} {:>10}",
                r.appid,
                r.title.chars().take(40).collect::<String>(),
                avg,
                spread,
                fmt_hours(r.total_hours)
            );
        }
        Ok(())
    })
}

const AFFINITY_SHOWN: usize = 5;

/// Show one member's totals
pub fn cmd_stats(rt: &Runtime, ctx: &Context, username: &str) -> anyhow::Result<()> {
    rt.block_on(async {
        let pool = ctx.pool().await?;
        let account = require_account(&pool, username).await?;
        let mut conn = pool.acquire().await?;
        let summary = stats::account_summary(&mut conn, &account).await?;

        println!("{}", account.display_name.as_deref().unwrap_or(&account.username));
        println!("{}", "=".repeat(30));
        println!("Titles owned:   {}", summary.titles_owned);
        println!("Titles played:  {}", summary.titles_played);
        println!("Total played:   {}", fmt_hours(summary.total_hours));
        println!("Titles rated:   {}", summary.titles_rated);
        match summary.average_rating {
            Some(avg) => println!("Average rating: {:.1}", avg),
            None => println!("Average rating: -"),
        }
        match &summary.most_played {
            Some(top) => println!("Most played:    {} ({})", top.title, fmt_hours(top.hours)),
            None => println!("Most played:    -"),
        }

        let affinity = stats::tag_affinity(&mut conn, &account).await?;
        if !affinity.is_empty() {
            println!();
            println!("Favourite tags:");
            for a in affinity.iter().take(AFFINITY_SHOWN) {
                println!("  {:<24} {:>4.1} ({} rated)", a.tag, a.average_rating, a.ratings);
            }
        }
        Ok(())
    })
}

/// Show the most common tags
pub fn cmd_tags(rt: &Runtime, ctx: &Context, user: Option<&str>, limit: usize) -> anyhow::Result<()> {
    rt.block_on(async {
        let pool = ctx.pool().await?;
        let steam_id = match user {
            Some(username) => {
                let account = require_account(&pool, username).await?;
                Some(SteamId::parse(&account.steamid)?)
            }
            None => None,
        };

        let mut conn = pool.acquire().await?;
        let tags = stats::top_tags(&mut conn, steam_id.as_ref(), limit).await?;
        if tags.is_empty() {
            println!("No tagged titles yet.");
            return Ok(());
        }

        for (i, t) in tags.iter().enumerate() {
            println!("{:>2}. {:<24} {:>4} titles  {:>10}", i + 1, t.tag, t.titles, fmt_hours(t.hours));
        }
        Ok(())
    })
}

/// Show rating agreement between members
pub fn cmd_similarity(rt: &Runtime, ctx: &Context) -> anyhow::Result<()> {
    rt.block_on(async {
        let pool = ctx.pool().await?;
        let mut conn = pool.acquire().await?;
        let names: HashMap<i64, String> = accounts::list_accounts(&mut conn)
            .await?
            .into_iter()
            .map(|a| (a.id, a.display_name.unwrap_or(a.username)))
            .collect();
        let pairs = stats::member_similarity(&mut conn).await?;

        if pairs.is_empty() {
            println!("Need at least two members.");
            return Ok(());
        }

        let name = |id: i64| names.get(&id).map(String::as_str).unwrap_or("?").to_string();
        for p in &pairs {
            let score = p
                .similarity
                .map(|s| format!("{:>3.0}%", s * 100.0))
                .unwrap_or_else(|| "   -".into());
            println!(
                "{:<20} {:<20} {}  ({} shared)",
                name(p.first),
                name(p.second),
                score,
                p.shared_ratings
            );
        }
        Ok(())
    })
}
