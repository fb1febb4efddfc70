use crate::model::Gid;
use crate::validation::NameValidationError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GroupStoreError {
    #[error("Group already exists: {0}")]
    DuplicateGroup(String),

    #[error("Group not found: {0}")]
    GroupNotFound(String),

    #[error("Invalid name '{name}': {reason}")]
    InvalidName {
        name: String,
        reason: NameValidationError,
    },

    #[error("Store is corrupt at {}:{line}: {reason}", path.display())]
    StoreCorrupt {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No free GID left in {min}..={max}")]
    GidExhausted { min: Gid, max: Gid },

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, GroupStoreError>;
