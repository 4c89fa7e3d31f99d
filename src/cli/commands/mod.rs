//! CLI command definitions and dispatch.
//!
//! Each group of subcommands is implemented in its own submodule:
//! - `sync`: Library synchronization and member registration
//! - `library`: Listings, ratings, notes, and cover overrides
//! - `stats`: Family rankings and per-member statistics

mod library;
mod stats;
mod sync;

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use sqlx::SqlitePool;
use tokio::runtime::Runtime;

use family_shelf::config::{self, Config};
use family_shelf::db;
use family_shelf::model::{Account, SortOrder};

pub use library::{cmd_accounts, cmd_cover_reset, cmd_cover_set, cmd_library, cmd_notes, cmd_rate, cmd_title};
pub use stats::{cmd_family, cmd_similarity, cmd_stats, cmd_tags};
pub use sync::{cmd_register, cmd_sync, cmd_sync_all};

/// Family Shelf CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file (default: the OS config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Database file (overrides the config)
    #[arg(long, global = true, env = "FAMILY_SHELF_DB")]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Sync one account's profile, library, and playtime from Steam
    Sync {
        /// 17-digit Steam id
        steam_id: String,
    },
    /// Sync every registered account
    SyncAll,
    /// Register a family member
    Register {
        #[arg(short, long)]
        username: String,
        /// 17-digit Steam id
        #[arg(short, long)]
        steam_id: String,
        /// Credential hash produced by the login frontend
        #[arg(long)]
        credential_hash: String,
        /// Skip fetching the Steam profile
        #[arg(long)]
        offline: bool,
    },
    /// List registered family members
    Accounts,
    /// Show a member's library
    Library {
        username: String,
        /// Sort by: name, hours, rating
        #[arg(long, default_value = "name")]
        sort: SortOrder,
    },
    /// Rate a title (1-10)
    Rate {
        username: String,
        appid: i64,
        rating: i64,
    },
    /// Set a member's notes and play order for a title
    Notes {
        username: String,
        appid: i64,
        notes: String,
        /// Position in the member's play queue
        #[arg(long)]
        order: Option<i64>,
    },
    /// Override or restore a title's cover art
    Cover {
        #[command(subcommand)]
        action: CoverAction,
    },
    /// Show a title with every member's rating and notes
    Title { appid: i64 },
    /// Rank every title the family owns
    Family {
        /// Sort by: name, hours, rating
        #[arg(long, default_value = "rating")]
        sort: SortOrder,
    },
    /// Show a member's totals and favourite tags
    Stats { username: String },
    /// Show how closely each pair of members agrees on ratings
    Similarity,
    /// Show the most common tags
    Tags {
        /// Limit to one member's library
        #[arg(long)]
        user: Option<String>,
        #[arg(long, default_value_t = family_shelf::stats::TOP_TAG_LIMIT)]
        limit: usize,
    },
    /// Write a config file with the current settings
    InitConfig,
}

#[derive(Subcommand)]
pub enum CoverAction {
    /// Use a custom cover URL
    Set { appid: i64, url: String },
    /// Go back to the fetched cover
    Reset { appid: i64 },
}

/// Settings shared by every command
pub struct Context {
    pub config: Config,
    pub config_path: Option<PathBuf>,
    pub db_path: PathBuf,
}

impl Context {
    fn from_cli(cli: &Cli) -> Self {
        let mut config = match &cli.config {
            Some(path) => config::load_from(path),
            None => config::load(),
        };
        config.apply_env();
        let db_path = cli.db.clone().unwrap_or_else(|| config.database.path.clone());

        Self {
            config,
            config_path: cli.config.clone().or_else(config::config_path),
            db_path,
        }
    }

    pub async fn pool(&self) -> anyhow::Result<SqlitePool> {
        open_db(&self.db_path).await
    }
}

async fn open_db(path: &Path) -> anyhow::Result<SqlitePool> {
    db::init_db(&db::db_url(Some(path)))
        .await
        .with_context(|| format!("Failed to open database {:?}", path))
}

/// Look up a member by username or fail with a readable message.
pub(crate) async fn require_account(pool: &SqlitePool, username: &str) -> anyhow::Result<Account> {
    let mut conn = pool.acquire().await?;
    db::accounts::get_by_username(&mut conn, username)
        .await?
        .with_context(|| format!("No member named '{}'", username))
}

/// Run the specified CLI command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let rt = Runtime::new()?;
    let ctx = Context::from_cli(cli);

    match &cli.command {
        Commands::Sync { steam_id } => cmd_sync(&rt, &ctx, steam_id),
        Commands::SyncAll => cmd_sync_all(&rt, &ctx),
        Commands::Register {
            username,
            steam_id,
            credential_hash,
            offline,
        } => cmd_register(&rt, &ctx, username, steam_id, credential_hash, *offline),
        Commands::Accounts => cmd_accounts(&rt, &ctx),
        Commands::Library { username, sort } => cmd_library(&rt, &ctx, username, *sort),
        Commands::Rate {
            username,
            appid,
            rating,
        } => cmd_rate(&rt, &ctx, username, *appid, *rating),
        Commands::Notes {
            username,
            appid,
            notes,
            order,
        } => cmd_notes(&rt, &ctx, username, *appid, notes, *order),
        Commands::Cover { action } => match action {
            CoverAction::Set { appid, url } => cmd_cover_set(&rt, &ctx, *appid, url),
            CoverAction::Reset { appid } => cmd_cover_reset(&rt, &ctx, *appid),
        },
        Commands::Title { appid } => cmd_title(&rt, &ctx, *appid),
        Commands::Family { sort } => cmd_family(&rt, &ctx, *sort),
        Commands::Stats { username } => cmd_stats(&rt, &ctx, username),
        Commands::Similarity => cmd_similarity(&rt, &ctx),
        Commands::Tags { user, limit } => cmd_tags(&rt, &ctx, user.as_deref(), *limit),
        Commands::InitConfig => cmd_init_config(&ctx),
    }
}

/// Write the file configuration (with defaults filled in) for hand editing.
///
/// Keys that only come from the environment are not written.
fn cmd_init_config(ctx: &Context) -> anyhow::Result<()> {
    let path = ctx
        .config_path
        .as_ref()
        .context("Could not determine config directory; pass --config")?;
    config::save_to(&config::load_from(path), path)?;
    println!("Wrote {}", path.display());
    Ok(())
}

/// Format hours the way every listing shows them
pub(crate) fn fmt_hours(hours: f64) -> String {
    format!("{:.1} h", hours)
}
