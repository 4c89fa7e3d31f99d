//! Synchronization and registration commands.

use anyhow::Context as _;
use tokio::runtime::Runtime;

use family_shelf::db::accounts::{self, NewAccount};
use family_shelf::model::SteamId;
use family_shelf::platform::SteamClient;
use family_shelf::sync::{SyncEngine, SyncReport, SyncStatus};

use super::Context;

/// Sync one account
pub fn cmd_sync(rt: &Runtime, ctx: &Context, steam_id: &str) -> anyhow::Result<()> {
    rt.block_on(async {
        let pool = ctx.pool().await?;
        let engine = SyncEngine::from_config(pool, &ctx.config)?;

        let report = engine.synchronize(steam_id).await?;
        print_report(&report);
        Ok(())
    })
}

/// Sync every registered account
pub fn cmd_sync_all(rt: &Runtime, ctx: &Context) -> anyhow::Result<()> {
    rt.block_on(async {
        let pool = ctx.pool().await?;
        let engine = SyncEngine::from_config(pool, &ctx.config)?;

        let results = engine.synchronize_all().await?;
        if results.is_empty() {
            println!("No members registered. Use `register` first.");
            return Ok(());
        }

        let mut failures = 0;
        for entry in &results {
            print!("{:<16} ", entry.username);
            match &entry.result {
                Ok(report) => print_report(report),
                Err(e) => {
                    failures += 1;
                    println!("✗ {}", e);
                }
            }
        }

        println!();
        println!("Synced {} of {} members", results.len() - failures, results.len());
        Ok(())
    })
}

fn print_report(report: &SyncReport) {
    match &report.status {
        SyncStatus::Complete => {
            println!("✓ {}", report);
            if report.pinned_added > 0 {
                println!("  {} pinned titles granted", report.pinned_added);
            }
            if report.enrichment_deferred > 0 {
                println!(
                    "  {} titles were being enriched by another sync",
                    report.enrichment_deferred
                );
            }
        }
        SyncStatus::LibraryUnavailable { .. } => {
            println!("⚠ {}", report);
            println!("  Existing library kept; pinned titles were still applied.");
        }
    }
}

/// Register a family member
pub fn cmd_register(
    rt: &Runtime,
    ctx: &Context,
    username: &str,
    steam_id: &str,
    credential_hash: &str,
    offline: bool,
) -> anyhow::Result<()> {
    rt.block_on(async {
        let steam_id = SteamId::parse(steam_id)?;

        let profile = if offline {
            None
        } else {
            let api_key = ctx.config.steam_api_key()?;
            let client = SteamClient::new(api_key, ctx.config.http.timeout());
            match client.fetch_profile(steam_id.as_str()).await {
                Ok(profile) => profile,
                Err(e) => {
                    tracing::warn!("Profile lookup failed, registering without it: {}", e);
                    None
                }
            }
        };

        let pool = ctx.pool().await?;
        let mut conn = pool.acquire().await?;
        let id = accounts::create_account(
            &mut conn,
            &NewAccount {
                username,
                credential_hash,
                steam_id: &steam_id,
                profile: profile.as_ref(),
            },
        )
        .await
        .with_context(|| format!("Could not register '{}'", username))?;

        match &profile {
            Some(p) => println!("✓ Registered {} (#{}) as {}", username, id, p.display_name),
            None => println!("✓ Registered {} (#{})", username, id),
        }
        println!("Run `sync {}` to import the library.", steam_id);
        Ok(())
    })
}
