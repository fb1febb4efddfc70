//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer and the single
//! entry point for UI clients (the `grpstore` binary, or any wrapper that
//! links the library directly).
//!
//! The facade:
//! - **Dispatches** to the matching command function
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! It does not print, exit, or decide exit codes; that is the CLI's job.
//!
//! `GroupApi<B: StorageBackend>` is generic over the backend:
//! - Production: `GroupApi<FsBackend>`
//! - Testing: `GroupApi<MemBackend>`

use crate::commands;
use crate::config::GroupStoreConfig;
use crate::error::Result;
use crate::store::backend::StorageBackend;
use crate::store::fs_backend::FsBackend;
use crate::store::GroupStore;

pub struct GroupApi<B: StorageBackend> {
    store: GroupStore<B>,
}

impl GroupApi<FsBackend> {
    pub fn open(config: &GroupStoreConfig) -> Result<Self> {
        Ok(Self::new(GroupStore::open(config)?))
    }
}

impl<B: StorageBackend> GroupApi<B> {
    pub fn new(store: GroupStore<B>) -> Self {
        Self { store }
    }

    pub fn create_group(&self, name: &str, exist_ok: bool) -> Result<commands::CmdResult> {
        commands::create_group::run(&self.store, name, exist_ok)
    }

    pub fn add_member(&self, group: &str, user: &str) -> Result<commands::CmdResult> {
        commands::add_member::run(&self.store, group, user)
    }

    pub fn show_group(&self, name: &str) -> Result<commands::CmdResult> {
        commands::show::run(&self.store, name)
    }

    pub fn list_groups(&self) -> Result<commands::CmdResult> {
        commands::list::run(&self.store)
    }

    pub fn store(&self) -> &GroupStore<B> {
        &self.store
    }
}

pub use commands::{CmdMessage, CmdResult, MessageLevel};
