//! Per-account run serialization.
//!
//! Two sync runs for the same account must not interleave; runs for
//! different accounts are independent.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::model::SteamId;

type LockMap = HashMap<SteamId, Arc<AsyncMutex<()>>>;

/// Lazily created async lock per account.
///
/// An entry lives only while a run holds or waits for it.
#[derive(Debug, Default)]
pub struct AccountLocks {
    locks: Mutex<LockMap>,
}

/// Exclusive access to one account; released on drop.
#[must_use]
pub struct AccountGuard<'a> {
    guard: Option<OwnedMutexGuard<()>>,
    locks: &'a Mutex<LockMap>,
    steam_id: SteamId,
}

impl AccountLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to an account.
    pub async fn acquire(&self, steam_id: &SteamId) -> AccountGuard<'_> {
        let lock = {
            let mut locks = self.locks.lock();
            locks.entry(steam_id.clone()).or_default().clone()
        };
        AccountGuard {
            guard: Some(lock.lock_owned().await),
            locks: &self.locks,
            steam_id: steam_id.clone(),
        }
    }

    /// Number of accounts currently held or waited on
    pub fn len(&self) -> usize {
        self.locks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Drop for AccountGuard<'_> {
    fn drop(&mut self) {
        // The guard owns one clone of the Arc; release it before counting.
        drop(self.guard.take());

        // Waiters clone the Arc under the map lock, so a count of one here
        // means nobody else can reach this entry.
        let mut locks = self.locks.lock();
        if locks
            .get(&self.steam_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(&self.steam_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::steam_id;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_account_is_serialized() {
        let locks = AccountLocks::new();
        let sid = steam_id(1);

        let guard = locks.acquire(&sid).await;
        let second = tokio::time::timeout(Duration::from_millis(50), locks.acquire(&sid)).await;
        assert!(second.is_err(), "second acquire should block");

        drop(guard);
        let third = tokio::time::timeout(Duration::from_millis(50), locks.acquire(&sid)).await;
        assert!(third.is_ok());
    }

    #[tokio::test]
    async fn test_different_accounts_are_independent() {
        let locks = AccountLocks::new();
        let _a = locks.acquire(&steam_id(1)).await;
        let b = tokio::time::timeout(Duration::from_millis(50), locks.acquire(&steam_id(2))).await;
        assert!(b.is_ok());
    }

    #[tokio::test]
    async fn test_released_accounts_are_forgotten() {
        let locks = AccountLocks::new();
        for n in 0..50 {
            let _guard = locks.acquire(&steam_id(n)).await;
            assert_eq!(locks.len(), 1);
        }
        assert!(locks.is_empty());
    }

    #[tokio::test]
    async fn test_entry_kept_while_a_run_waits() {
        let locks = Arc::new(AccountLocks::new());
        let sid = steam_id(1);

        let first = locks.acquire(&sid).await;
        let waiter = {
            let locks = locks.clone();
            let sid = sid.clone();
            tokio::spawn(async move {
                let _guard = locks.acquire(&sid).await;
                tokio::time::sleep(Duration::from_millis(20)).await;
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        drop(first);
        assert_eq!(locks.len(), 1, "waiter still needs the entry");

        waiter.await.unwrap();
        assert!(locks.is_empty());
    }
}
