//! Reconcile stored ownership against a freshly fetched library.

use std::collections::HashSet;

use crate::model::AppId;

/// What changed between the stored and the fetched library.
///
/// Pinned ids never appear on either side.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LibraryDiff {
    /// Fetched but not yet stored
    pub added: HashSet<AppId>,
    /// Stored but no longer fetched
    pub removed: HashSet<AppId>,
}

impl LibraryDiff {
    pub fn compute(
        existing: &HashSet<AppId>,
        fresh: &HashSet<AppId>,
        pinned: &HashSet<AppId>,
    ) -> Self {
        let added = fresh
            .difference(existing)
            .filter(|id| !pinned.contains(id))
            .copied()
            .collect();
        let removed = existing
            .difference(fresh)
            .filter(|id| !pinned.contains(id))
            .copied()
            .collect();
        Self { added, removed }
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}
