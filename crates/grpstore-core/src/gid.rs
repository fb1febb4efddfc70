//! # GID Allocation
//!
//! A new group gets one more than the highest GID already in the store, so
//! GIDs only ever grow and never collide with an existing record. The scan
//! runs over the same locked snapshot that the new record is appended to.
//!
//! Only GIDs inside `min_gid..=max_gid` count towards the maximum. System
//! groups below the window and foreign groups above it are left alone, and
//! cannot collide with a candidate since every candidate lies inside the
//! window. A store with nothing in the window starts at `min_gid`.
//!
//! Reserved GIDs (such as `nogroup`) are skipped twice: they do not count
//! towards the maximum, and the allocator steps over them if the next
//! candidate happens to land on one.

use crate::error::{GroupStoreError, Result};
use crate::model::Gid;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MIN_GID: Gid = 1000;
pub const DEFAULT_MAX_GID: Gid = 60000;

/// `nogroup`, the 16-bit `-1`, and the 32-bit `-1`.
pub fn default_reserved_gids() -> Vec<Gid> {
    vec![65534, 65535, Gid::MAX]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GidPolicy {
    pub min_gid: Gid,
    pub max_gid: Gid,
    pub reserved_gids: Vec<Gid>,
}

impl Default for GidPolicy {
    fn default() -> Self {
        Self {
            min_gid: DEFAULT_MIN_GID,
            max_gid: DEFAULT_MAX_GID,
            reserved_gids: default_reserved_gids(),
        }
    }
}

impl GidPolicy {
    pub fn is_reserved(&self, gid: Gid) -> bool {
        self.reserved_gids.contains(&gid)
    }

    /// Pick the GID for a new record given the GIDs currently in the store.
    pub fn next_gid<I>(&self, existing: I) -> Result<Gid>
    where
        I: IntoIterator<Item = Gid>,
    {
        let highest = existing
            .into_iter()
            .filter(|g| self.in_window(*g) && !self.is_reserved(*g))
            .max();

        let mut candidate = match highest {
            Some(gid) => gid.checked_add(1).ok_or_else(|| self.exhausted())?,
            None => self.min_gid,
        }
        .max(self.min_gid);

        while self.is_reserved(candidate) {
            candidate = candidate.checked_add(1).ok_or_else(|| self.exhausted())?;
        }

        if candidate > self.max_gid {
            return Err(self.exhausted());
        }
        Ok(candidate)
    }

    fn in_window(&self, gid: Gid) -> bool {
        (self.min_gid..=self.max_gid).contains(&gid)
    }

    fn exhausted(&self) -> GroupStoreError {
        GroupStoreError::GidExhausted {
            min: self.min_gid,
            max: self.max_gid,
        }
    }
}
