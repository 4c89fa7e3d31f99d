//! The reconciliation engine.
//!
//! One run for one account:
//! 1. Refresh the cached profile (skipped on any failure)
//! 2. Grant pinned titles (committed before anything can fail)
//! 3. Fetch the library once; abort the run if that fails
//! 4. Diff stored ownership against the fetched library
//! 5. Prune titles the account no longer owns
//! 6. Upsert ownership, playtime, and title stubs
//! 7. Fetch metadata for titles that have none, a few at a time
//!
//! Every step commits independently, so a failure late in the run never
//! undoes earlier progress.

use std::collections::HashSet;
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use parking_lot::Mutex;
use sqlx::{Connection, SqliteConnection, SqlitePool};

use super::diff::LibraryDiff;
use super::locks::AccountLocks;
use super::pinned::PinnedTitles;
use super::report::{SyncReport, SyncStatus};
use crate::config::Config;
use crate::db::{self, accounts, library, titles};
use crate::enrichment::{enrich_title, EnrichmentService, MetadataApi};
use crate::error::{Result, ResultExt};
use crate::model::{AppId, SteamId};
use crate::platform::{OwnedTitle, PlatformApi, SteamClient};

/// Metadata lookups allowed in flight per run unless configured otherwise.
pub const DEFAULT_METADATA_CONCURRENCY: usize = 4;

/// Result of syncing one registered account as part of a batch
#[derive(Debug)]
pub struct AccountSync {
    pub username: String,
    pub result: Result<SyncReport>,
}

/// Synchronizes accounts against the platform.
///
/// Cheap to share behind an `Arc`; concurrent runs for the same account
/// queue up behind each other.
pub struct SyncEngine {
    pool: SqlitePool,
    platform: Arc<dyn PlatformApi>,
    metadata: Arc<dyn MetadataApi>,
    pinned: PinnedTitles,
    locks: AccountLocks,
    /// Titles some run is currently enriching
    in_flight: Mutex<HashSet<AppId>>,
    metadata_concurrency: usize,
}

impl SyncEngine {
    pub fn new(
        pool: SqlitePool,
        platform: Arc<dyn PlatformApi>,
        metadata: Arc<dyn MetadataApi>,
    ) -> Self {
        Self {
            pool,
            platform,
            metadata,
            pinned: PinnedTitles::builtin(),
            locks: AccountLocks::new(),
            in_flight: Mutex::new(HashSet::new()),
            metadata_concurrency: DEFAULT_METADATA_CONCURRENCY,
        }
    }

    /// Build the production engine: Steam for libraries, the public
    /// metadata services for enrichment.
    pub fn from_config(pool: SqlitePool, config: &Config) -> Result<Self> {
        let timeout = config.http.timeout();
        let platform = SteamClient::new(config.steam_api_key()?, timeout);
        let metadata = EnrichmentService::from_config(config);

        Ok(Self::new(pool, Arc::new(platform), Arc::new(metadata))
            .with_pinned(PinnedTitles::from_config(config))
            .with_metadata_concurrency(config.sync.metadata_concurrency))
    }

    pub fn with_pinned(mut self, pinned: PinnedTitles) -> Self {
        self.pinned = pinned;
        self
    }

    pub fn with_metadata_concurrency(mut self, limit: usize) -> Self {
        self.metadata_concurrency = limit.max(1);
        self
    }

    pub fn pinned(&self) -> &PinnedTitles {
        &self.pinned
    }

    /// Sync one account on a connection from the engine's pool.
    pub async fn synchronize(&self, steam_id: &str) -> Result<SyncReport> {
        let steam_id = SteamId::parse(steam_id)?;
        let _guard = self.locks.acquire(&steam_id).await;
        let mut conn = self.pool.acquire().await?;
        self.run(&mut conn, &steam_id).await
    }

    /// Sync one account on a caller-supplied connection.
    pub async fn synchronize_on(
        &self,
        conn: &mut SqliteConnection,
        steam_id: &str,
    ) -> Result<SyncReport> {
        let steam_id = SteamId::parse(steam_id)?;
        let _guard = self.locks.acquire(&steam_id).await;
        self.run(conn, &steam_id).await
    }

    /// Sync every registered account in turn.
    ///
    /// A failure for one account is recorded in its entry and does not
    /// stop the rest.
    pub async fn synchronize_all(&self) -> Result<Vec<AccountSync>> {
        let members = {
            let mut conn = self.pool.acquire().await?;
            accounts::list_accounts(&mut conn).await?
        };

        let mut results = Vec::with_capacity(members.len());
        for member in members {
            let result = self
                .synchronize(&member.steamid)
                .await
                .with_context(format!("Sync failed for {}", member.username));
            if let Err(e) = &result {
                tracing::error!(target: "sync", username = %member.username, "{}", e);
            }
            results.push(AccountSync {
                username: member.username,
                result,
            });
        }
        Ok(results)
    }

    async fn run(&self, conn: &mut SqliteConnection, steam_id: &SteamId) -> Result<SyncReport> {
        let mut report = SyncReport::new(steam_id.clone());
        tracing::info!(target: "sync", steam_id = %steam_id, "Sync started");

        report.profile_updated = self.refresh_profile(conn, steam_id).await?;
        report.pinned_added = self.grant_pinned(conn, steam_id).await?;

        let owned = match self.platform.fetch_owned_titles(steam_id).await {
            Ok(owned) => owned,
            Err(e) => {
                tracing::warn!(target: "sync", steam_id = %steam_id, "Library unavailable: {}", e);
                report.status = SyncStatus::LibraryUnavailable {
                    reason: e.to_string(),
                };
                return Ok(report);
            }
        };

        let owned: Vec<OwnedTitle> = owned
            .into_iter()
            .filter(|t| !self.pinned.contains(t.app_id))
            .collect();
        let fresh: HashSet<AppId> = owned.iter().map(|t| t.app_id).collect();
        report.titles_seen = fresh.len();

        let existing = library::owned_app_ids(conn, steam_id).await?;
        let diff = LibraryDiff::compute(&existing, &fresh, self.pinned.ids());
        report.titles_added = diff.added.len();
        report.titles_removed = diff.removed.len();

        self.prune(conn, steam_id, &diff.removed).await?;
        self.upsert_library(conn, steam_id, &owned).await?;

        let enriched = titles::enriched_app_ids(conn).await?;
        let mut missing: Vec<AppId> = fresh.difference(&enriched).copied().collect();
        missing.sort_unstable();
        let (written, deferred) = self.enrich_missing(conn, missing).await?;
        report.titles_enriched = written;
        report.enrichment_deferred = deferred;

        tracing::info!(
            target: "sync",
            steam_id = %steam_id,
            titles = report.titles_seen,
            added = report.titles_added,
            removed = report.titles_removed,
            enriched = report.titles_enriched,
            "Sync complete"
        );
        Ok(report)
    }

    async fn refresh_profile(&self, conn: &mut SqliteConnection, steam_id: &SteamId) -> Result<bool> {
        match self.platform.fetch_profile(steam_id).await {
            Ok(Some(profile)) => Ok(accounts::update_profile(conn, steam_id, &profile).await?),
            Ok(None) => {
                tracing::debug!(target: "sync", steam_id = %steam_id, "No profile returned");
                Ok(false)
            }
            Err(e) => {
                tracing::warn!(target: "sync", steam_id = %steam_id, "Profile refresh skipped: {}", e);
                Ok(false)
            }
        }
    }

    async fn grant_pinned(&self, conn: &mut SqliteConnection, steam_id: &SteamId) -> Result<usize> {
        let mut tx = conn.begin().await?;
        let mut granted = 0;
        for pinned in self.pinned.iter() {
            titles::ensure_title_stub(&mut *tx, pinned.id, Some(&pinned.name)).await?;
            if library::ensure_ownership(&mut *tx, steam_id, pinned.id).await? {
                granted += 1;
            }
        }
        tx.commit().await?;
        Ok(granted)
    }

    async fn prune(
        &self,
        conn: &mut SqliteConnection,
        steam_id: &SteamId,
        removed: &HashSet<AppId>,
    ) -> Result<()> {
        if removed.is_empty() {
            return Ok(());
        }
        let mut tx = conn.begin().await?;
        for &appid in removed {
            library::remove_ownership(&mut *tx, steam_id, appid).await?;
        }
        tx.commit().await?;
        tracing::debug!(target: "sync", steam_id = %steam_id, count = removed.len(), "Pruned titles");
        Ok(())
    }

    async fn upsert_library(
        &self,
        conn: &mut SqliteConnection,
        steam_id: &SteamId,
        owned: &[OwnedTitle],
    ) -> Result<()> {
        let synced_at = db::now_rfc3339();
        let mut tx = conn.begin().await?;
        for title in owned {
            library::ensure_ownership(&mut *tx, steam_id, title.app_id).await?;
            library::upsert_playtime(&mut *tx, steam_id, title.app_id, title.hours(), &synced_at)
                .await?;
            titles::ensure_title_stub(&mut *tx, title.app_id, Some(&title.name)).await?;
        }
        tx.commit().await?;
        Ok(())
    }

    /// Fetch and store metadata for titles that have none.
    ///
    /// Returns `(written, deferred)`, where deferred titles were already
    /// being enriched by another run.
    async fn enrich_missing(
        &self,
        conn: &mut SqliteConnection,
        candidates: Vec<AppId>,
    ) -> Result<(usize, usize)> {
        if candidates.is_empty() {
            return Ok((0, 0));
        }

        let total = candidates.len();
        let mut claim = InFlightClaim::new(&self.in_flight, candidates);
        let deferred = total - claim.ids.len();

        // Another run may have finished one of these between our read and
        // our claim; its writes are visible now.
        let enriched = titles::enriched_app_ids(conn).await?;
        claim.release_where(|id| enriched.contains(&id));

        let metadata: &dyn MetadataApi = self.metadata.as_ref();
        let mut fetches = stream::iter(claim.ids.clone())
            .map(|appid| async move { (appid, enrich_title(metadata, appid).await) })
            .buffer_unordered(self.metadata_concurrency);

        let mut written = 0;
        while let Some((appid, meta)) = fetches.next().await {
            titles::merge_metadata(conn, appid, &meta)
                .await
                .with_context(format!("Failed to store metadata for app {appid}"))?;
            written += 1;
        }

        if written > 0 {
            tracing::info!(target: "sync", count = written, "Enriched titles");
        }
        Ok((written, deferred))
    }
}

/// Titles reserved by one run; released when dropped, even on error.
struct InFlightClaim<'a> {
    set: &'a Mutex<HashSet<AppId>>,
    ids: Vec<AppId>,
}

impl<'a> InFlightClaim<'a> {
    fn new(set: &'a Mutex<HashSet<AppId>>, candidates: Vec<AppId>) -> Self {
        let mut guard = set.lock();
        let ids = candidates
            .into_iter()
            .filter(|id| guard.insert(*id))
            .collect();
        drop(guard);
        Self { set, ids }
    }

    fn release_where(&mut self, mut done: impl FnMut(AppId) -> bool) {
        let mut guard = self.set.lock();
        self.ids.retain(|&id| {
            if done(id) {
                guard.remove(&id);
                false
            } else {
                true
            }
        });
    }
}

impl Drop for InFlightClaim<'_> {
    fn drop(&mut self) {
        let mut guard = self.set.lock();
        for id in &self.ids {
            guard.remove(id);
        }
    }
}
