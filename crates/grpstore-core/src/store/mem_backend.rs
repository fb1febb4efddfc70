use super::backend::StorageBackend;
use crate::error::Result;
use std::cell::{Cell, RefCell};
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// In-memory storage backend for testing.
///
/// Uses `RefCell`/`Cell` for interior mutability since tests drive it from a
/// single thread. Locking cannot block here, so taking the lock twice is
/// reported as an error instead of deadlocking.
pub struct MemBackend {
    contents: RefCell<String>,
    locked: Rc<Cell<bool>>,
    commits: Cell<usize>,
    simulate_write_error: Cell<bool>,
    simulate_snapshot_error: Cell<bool>,
    location: PathBuf,
}

pub struct MemLock {
    locked: Rc<Cell<bool>>,
}

impl Drop for MemLock {
    fn drop(&mut self) {
        self.locked.set(false);
    }
}

impl Default for MemBackend {
    fn default() -> Self {
        Self::with_contents("")
    }
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(contents: &str) -> Self {
        Self {
            contents: RefCell::new(contents.to_string()),
            locked: Rc::new(Cell::new(false)),
            commits: Cell::new(0),
            simulate_write_error: Cell::new(false),
            simulate_snapshot_error: Cell::new(false),
            location: PathBuf::from("memory://group"),
        }
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.set(simulate);
    }

    /// Make unlocked reads fail while locked reads keep working.
    pub fn set_simulate_snapshot_error(&self, simulate: bool) {
        self.simulate_snapshot_error.set(simulate);
    }

    pub fn contents(&self) -> String {
        self.contents.borrow().clone()
    }

    /// Number of successful commits so far.
    pub fn commit_count(&self) -> usize {
        self.commits.get()
    }

    pub fn is_locked(&self) -> bool {
        self.locked.get()
    }
}

impl StorageBackend for MemBackend {
    type Lock = MemLock;

    fn lock(&self) -> Result<MemLock> {
        if self.locked.replace(true) {
            return Err(io::Error::new(io::ErrorKind::WouldBlock, "store already locked").into());
        }
        Ok(MemLock {
            locked: Rc::clone(&self.locked),
        })
    }

    fn read_locked(&self, _lock: &MemLock) -> Result<String> {
        Ok(self.contents())
    }

    fn read_snapshot(&self) -> Result<String> {
        if self.simulate_snapshot_error.get() {
            return Err(io::Error::other("simulated read error").into());
        }
        Ok(self.contents())
    }

    fn commit(&self, _lock: &MemLock, contents: &str) -> Result<()> {
        if self.simulate_write_error.get() {
            return Err(io::Error::other("simulated write error").into());
        }
        *self.contents.borrow_mut() = contents.to_string();
        self.commits.set(self.commits.get() + 1);
        Ok(())
    }

    fn location(&self) -> &Path {
        &self.location
    }
}
