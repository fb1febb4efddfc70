use crate::error::Result;
use std::path::Path;

/// Abstract interface for raw storage I/O.
/// This trait handles the "how" of storage (filesystem vs memory),
/// while GroupStore handles the "what" (parsing, allocation, invariants).
pub trait StorageBackend {
    /// Proof of exclusive access. Held for the whole load-modify-commit
    /// sequence and released on drop.
    type Lock;

    /// Block until exclusive access to the store is granted. No timeout.
    fn lock(&self) -> Result<Self::Lock>;

    /// Read the full store contents while holding the lock.
    /// A store that does not exist yet reads as empty.
    fn read_locked(&self, lock: &Self::Lock) -> Result<String>;

    /// Read the full store contents without taking the lock.
    /// Never blocks on writers: a reader sees either the old or the new file.
    fn read_snapshot(&self) -> Result<String>;

    /// Replace the store contents.
    /// MUST be atomic (write to tmp, fsync, rename) so that an interrupted
    /// commit leaves the previous contents in place.
    fn commit(&self, lock: &Self::Lock, contents: &str) -> Result<()>;

    /// Location of the store, for error messages.
    fn location(&self) -> &Path;
}
