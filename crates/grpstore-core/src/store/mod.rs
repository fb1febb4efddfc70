//! # Storage Layer
//!
//! [`GroupStore`] owns the group database file and is the only code that
//! mutates it. It is generic over a [`StorageBackend`](backend::StorageBackend)
//! so the same logic runs against the real file ([`fs_backend::FsBackend`]) and
//! against memory in tests ([`mem_backend::MemBackend`]).
//!
//! ## Mutation Protocol
//!
//! Every mutation runs the same sequence, all inside one exclusive lock:
//!
//! 1. **Lock**: block until no other process holds the store.
//! 2. **Load**: read the file fresh and parse it strictly. Nothing read before
//!    the lock was taken is trusted.
//! 3. **Compute**: apply the change to the parsed [`GroupFile`].
//! 4. **Commit**: serialize, write to a temp file, fsync, rename over the store.
//! 5. **Unlock**: drop the lock.
//!
//! Any error before step 4 completes leaves the file as it was. A mutation
//! that turns out to change nothing (adding an existing member) skips the
//! commit entirely.
//!
//! There is no in-memory state between operations. Each call rebuilds the
//! store from the file, which is what makes concurrent processes safe.
//!
//! ## Readers
//!
//! [`GroupStore::get_group`] and [`GroupStore::list_groups`] read without the
//! lock. Because commits are renames, they observe either the complete old
//! file or the complete new one.

use crate::config::GroupStoreConfig;
use crate::error::{GroupStoreError, Result};
use crate::gid::GidPolicy;
use crate::model::{Gid, GroupFile, Record};
use crate::validation::ensure_valid_name;
use backend::StorageBackend;
use fs_backend::FsBackend;

pub mod backend;
pub mod fs_backend;
pub mod mem_backend;

pub struct GroupStore<B: StorageBackend> {
    backend: B,
    placeholder: String,
    policy: GidPolicy,
}

impl GroupStore<FsBackend> {
    /// Open the file-backed store described by `config`.
    pub fn open(config: &GroupStoreConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(FsBackend::new(&config.store_path), config))
    }
}

impl<B: StorageBackend> GroupStore<B> {
    pub fn new(backend: B, config: &GroupStoreConfig) -> Self {
        Self {
            backend,
            placeholder: config.placeholder.clone(),
            policy: config.gid_policy(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Create a new, memberless group and return its GID.
    pub fn create_group(&self, name: &str) -> Result<Gid> {
        self.create_group_record(name).map(|record| record.gid)
    }

    /// Like [`create_group`](Self::create_group), but returns the record as
    /// it was committed.
    pub fn create_group_record(&self, name: &str) -> Result<Record> {
        ensure_valid_name(name)?;

        self.transact(|file| {
            if file.find(name).is_some() {
                return Err(GroupStoreError::DuplicateGroup(name.to_string()));
            }
            let gid = self.policy.next_gid(file.gids())?;
            let record = Record::new(name, self.placeholder.as_str(), gid);
            file.append(record.clone())?;
            log::info!("created group {} with gid {}", name, gid);
            Ok((record, true))
        })
    }

    /// Add `user` to `group`. Returns `false` if the user was already a
    /// member, in which case nothing is written.
    pub fn add_member(&self, group: &str, user: &str) -> Result<bool> {
        ensure_valid_name(group)?;
        ensure_valid_name(user)?;

        self.transact(|file| {
            let added = file.add_member(group, user)?;
            if added {
                log::info!("added {} to group {}", user, group);
            } else {
                log::info!("{} is already a member of {}", user, group);
            }
            Ok((added, added))
        })
    }

    /// Look up one group by exact name, without locking.
    pub fn get_group(&self, name: &str) -> Result<Record> {
        self.snapshot()?
            .find(name)
            .cloned()
            .ok_or_else(|| GroupStoreError::GroupNotFound(name.to_string()))
    }

    /// All groups in file order, without locking.
    pub fn list_groups(&self) -> Result<Vec<Record>> {
        Ok(self.snapshot()?.records().cloned().collect())
    }

    /// Parse the current file without taking the lock.
    pub fn snapshot(&self) -> Result<GroupFile> {
        let text = self.backend.read_snapshot()?;
        self.parse(&text)
    }

    /// Run `f` against a freshly loaded copy of the store under the lock.
    /// `f` returns its result plus whether the file changed; only changed
    /// files are committed.
    fn transact<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut GroupFile) -> Result<(T, bool)>,
    {
        let lock = self.backend.lock()?;
        let text = self.backend.read_locked(&lock)?;
        let mut file = self.parse(&text)?;

        let (value, changed) = f(&mut file)?;
        if changed {
            self.backend.commit(&lock, &file.serialize())?;
        }

        drop(lock);
        Ok(value)
    }

    fn parse(&self, text: &str) -> Result<GroupFile> {
        GroupFile::parse(text).map_err(|e| GroupStoreError::StoreCorrupt {
            path: self.backend.location().to_path_buf(),
            line: e.line,
            reason: e.reason,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mem_backend::MemBackend;

    fn store_with(contents: &str) -> GroupStore<MemBackend> {
        GroupStore::new(
            MemBackend::with_contents(contents),
            &GroupStoreConfig::default(),
        )
    }

    #[test]
    fn test_concrete_scenario() {
        let store = store_with("");

        assert_eq!(store.create_group("build").unwrap(), 1000);
        assert_eq!(store.backend().contents(), "build:x:1000:\n");

        assert_eq!(store.create_group("deploy").unwrap(), 1001);
        assert_eq!(
            store.backend().contents(),
            "build:x:1000:\ndeploy:x:1001:\n"
        );

        assert!(store.add_member("build", "alice").unwrap());
        assert_eq!(
            store.backend().contents(),
            "build:x:1000:alice\ndeploy:x:1001:\n"
        );

        assert!(!store.add_member("build", "alice").unwrap());
        assert_eq!(
            store.backend().contents(),
            "build:x:1000:alice\ndeploy:x:1001:\n"
        );

        let err = store.add_member("staging", "bob").unwrap_err();
        assert!(matches!(err, GroupStoreError::GroupNotFound(g) if g == "staging"));
    }

    #[test]
    fn test_gids_are_unique_and_increasing() {
        let store = store_with("");
        let mut previous_max = None;
        for i in 0..20 {
            let before: Option<Gid> = store.snapshot().unwrap().gids().max();
            let gid = store.create_group(&format!("g{}", i)).unwrap();
            if let Some(max) = before {
                assert_eq!(gid, max + 1);
            }
            previous_max = Some(gid);
        }
        assert_eq!(previous_max, Some(1019));

        let mut gids: Vec<Gid> = store.snapshot().unwrap().gids().collect();
        gids.sort_unstable();
        gids.dedup();
        assert_eq!(gids.len(), 20);
    }

    #[test]
    fn test_create_continues_after_highest_existing() {
        let store = store_with("root:x:0:\nstaff:x:5000:\nnogroup:x:65534:\n");
        assert_eq!(store.create_group("build").unwrap(), 5001);
    }

    #[test]
    fn test_create_duplicate_fails_without_write() {
        let store = store_with("build:x:1000:\n");
        let err = store.create_group("build").unwrap_err();
        assert!(matches!(err, GroupStoreError::DuplicateGroup(_)));
        assert_eq!(store.backend().commit_count(), 0);
        assert_eq!(store.backend().contents(), "build:x:1000:\n");
    }

    #[test]
    fn test_create_invalid_name_never_locks() {
        let store = store_with("");
        let err = store.create_group("bad:name").unwrap_err();
        assert!(matches!(err, GroupStoreError::InvalidName { .. }));
        assert_eq!(store.backend().commit_count(), 0);
    }

    #[test]
    fn test_create_uses_configured_placeholder_and_min() {
        let config = GroupStoreConfig {
            placeholder: "*".to_string(),
            min_gid: 10001,
            ..Default::default()
        };
        let store = GroupStore::new(MemBackend::new(), &config);
        assert_eq!(store.create_group("proj").unwrap(), 10001);
        assert_eq!(store.backend().contents(), "proj:*:10001:\n");
    }

    #[test]
    fn test_create_exhausted_leaves_store_untouched() {
        let config = GroupStoreConfig {
            min_gid: 1000,
            max_gid: 1000,
            ..Default::default()
        };
        let store = GroupStore::new(MemBackend::with_contents("a:x:1000:\n"), &config);
        let err = store.create_group("b").unwrap_err();
        assert!(matches!(err, GroupStoreError::GidExhausted { .. }));
        assert_eq!(store.backend().contents(), "a:x:1000:\n");
    }

    #[test]
    fn test_create_ignores_groups_above_window() {
        let seed = "build:x:1000:\nlegacy:x:70000:\n";
        let store = store_with(seed);

        assert_eq!(store.create_group("deploy").unwrap(), 1001);
        assert_eq!(store.create_group("ops").unwrap(), 1002);
        assert_eq!(
            store.backend().contents(),
            format!("{}deploy:x:1001:\nops:x:1002:\n", seed)
        );
    }

    #[test]
    fn test_add_member_exact_name_matching() {
        let store = store_with("admins:x:1000:\n");
        let err = store.add_member("admin", "alice").unwrap_err();
        assert!(matches!(err, GroupStoreError::GroupNotFound(_)));
        assert_eq!(store.backend().contents(), "admins:x:1000:\n");
    }

    #[test]
    fn test_add_member_isolates_other_records() {
        let text = "wheel:!:10:root\nbuild:x:1000:\nlegacy:*:20\n";
        let store = store_with(text);
        store.add_member("build", "alice").unwrap();
        store.add_member("build", "bob").unwrap();
        assert_eq!(
            store.backend().contents(),
            "wheel:!:10:root\nbuild:x:1000:alice,bob\nlegacy:*:20\n"
        );
    }

    #[test]
    fn test_add_member_invalid_user() {
        let store = store_with("build:x:1000:\n");
        let err = store.add_member("build", "alice,root").unwrap_err();
        assert!(matches!(err, GroupStoreError::InvalidName { .. }));
        assert_eq!(store.backend().commit_count(), 0);
    }

    #[test]
    fn test_idempotent_add_does_not_commit() {
        let store = store_with("build:x:1000:alice\n");
        assert!(!store.add_member("build", "alice").unwrap());
        assert_eq!(store.backend().commit_count(), 0);
    }

    #[test]
    fn test_corrupt_store_aborts_mutation() {
        let store = store_with("build:x:1000:\nthis is not a record\n");
        let err = store.create_group("deploy").unwrap_err();
        match err {
            GroupStoreError::StoreCorrupt { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(store.backend().commit_count(), 0);
        assert!(!store.backend().is_locked());
    }

    #[test]
    fn test_write_error_leaves_contents_and_releases_lock() {
        let store = store_with("build:x:1000:\n");
        store.backend().set_simulate_write_error(true);

        let err = store.create_group("deploy").unwrap_err();
        assert!(matches!(err, GroupStoreError::Io(_)));
        assert_eq!(store.backend().contents(), "build:x:1000:\n");
        assert!(!store.backend().is_locked());

        store.backend().set_simulate_write_error(false);
        assert_eq!(store.create_group("deploy").unwrap(), 1001);
    }

    #[test]
    fn test_get_and_list() {
        let store = store_with("build:x:1000:alice\ndeploy:x:1001:\n");
        let build = store.get_group("build").unwrap();
        assert_eq!(build.members, vec!["alice"]);

        let all = store.list_groups().unwrap();
        let names: Vec<&str> = all.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["build", "deploy"]);

        assert!(matches!(
            store.get_group("buil").unwrap_err(),
            GroupStoreError::GroupNotFound(_)
        ));
    }
}
