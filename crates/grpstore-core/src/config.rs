//! # Configuration
//!
//! grpstore reads a single JSON file, by default `/etc/grpstore/config.json`.
//! Every key is optional; missing keys fall back to the compiled defaults.
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `store_path` | `/var/lib/extrausers/group` | The group database file |
//! | `placeholder` | `x` | Password placeholder written into new records |
//! | `min_gid` | `1000` | First GID handed out on an empty store |
//! | `max_gid` | `60000` | Largest GID that may be allocated |
//! | `reserved_gids` | `[65534, 65535, 4294967295]` | Never allocated |
//!
//! The helper is meant to run with elevated privileges, so the config file
//! location is fixed. Overrides from the command line or the environment are
//! the CLI's business and are refused there when privileges are elevated.

use crate::error::{GroupStoreError, Result};
use crate::gid::{default_reserved_gids, GidPolicy, DEFAULT_MAX_GID, DEFAULT_MIN_GID};
use crate::model::Gid;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const SYSTEM_CONFIG_PATH: &str = "/etc/grpstore/config.json";
pub const DEFAULT_STORE_PATH: &str = "/var/lib/extrausers/group";
const DEFAULT_PLACEHOLDER: &str = "x";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct GroupStoreConfig {
    pub store_path: PathBuf,
    pub placeholder: String,
    pub min_gid: Gid,
    pub max_gid: Gid,
    pub reserved_gids: Vec<Gid>,
}

impl Default for GroupStoreConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            min_gid: DEFAULT_MIN_GID,
            max_gid: DEFAULT_MAX_GID,
            reserved_gids: default_reserved_gids(),
        }
    }
}

impl GroupStoreConfig {
    /// Load config from the given file, or return defaults if it does not exist.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: GroupStoreConfig = serde_json::from_str(&content).map_err(|e| {
            GroupStoreError::Config(format!("{}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_gid > self.max_gid {
            return Err(GroupStoreError::Config(format!(
                "min_gid ({}) is greater than max_gid ({})",
                self.min_gid, self.max_gid
            )));
        }
        if self.placeholder.is_empty() || self.placeholder.contains([':', '\n']) {
            return Err(GroupStoreError::Config(format!(
                "placeholder {:?} must be non-empty and free of ':' and newlines",
                self.placeholder
            )));
        }
        if self.store_path.as_os_str().is_empty() {
            return Err(GroupStoreError::Config("store_path is empty".to_string()));
        }
        Ok(())
    }

    pub fn gid_policy(&self) -> GidPolicy {
        GidPolicy {
            min_gid: self.min_gid,
            max_gid: self.max_gid,
            reserved_gids: self.reserved_gids.clone(),
        }
    }

    pub fn with_store_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.store_path = path.into();
        self
    }
}
