use super::backend::StorageBackend;
use crate::error::{GroupStoreError, Result};
use std::fs::{self, File, OpenOptions};
use std::io::{self, ErrorKind, Write};
#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const DEFAULT_FILE_NAME: &str = "group";

/// Filesystem backend for a single group database file.
///
/// Mutual exclusion uses `flock(LOCK_EX)` on a sidecar `<store>.lock` file in
/// the same directory. The data file itself cannot carry the lock: every
/// commit renames a new inode over it, and a lock on the replaced inode would
/// no longer exclude processes that open the path afterwards. The sidecar is
/// created on first use and never removed.
pub struct FsBackend {
    store_path: PathBuf,
    lock_path: PathBuf,
}

/// Exclusive lock on the store. Released on drop, and by the kernel when the
/// process exits.
pub struct StoreLock {
    file: File,
    path: PathBuf,
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        match fs2::FileExt::unlock(&self.file) {
            Ok(()) => log::debug!("released lock {}", self.path.display()),
            Err(e) => log::warn!("failed to unlock {}: {}", self.path.display(), e),
        }
    }
}

impl FsBackend {
    pub fn new(store_path: impl Into<PathBuf>) -> Self {
        let store_path = store_path.into();
        let file_name = store_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| DEFAULT_FILE_NAME.to_string());
        let lock_path = store_path.with_file_name(format!("{}.lock", file_name));
        Self {
            store_path,
            lock_path,
        }
    }

    pub fn store_path(&self) -> &Path {
        &self.store_path
    }

    pub fn lock_path(&self) -> &Path {
        &self.lock_path
    }

    fn parent_dir(&self) -> PathBuf {
        match self.store_path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    fn ensure_dir(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    fn read_store(&self) -> Result<String> {
        let bytes = match fs::read(&self.store_path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(String::new()),
            Err(e) => return Err(e.into()),
        };

        String::from_utf8(bytes).map_err(|e| {
            let valid = &e.as_bytes()[..e.utf8_error().valid_up_to()];
            GroupStoreError::StoreCorrupt {
                path: self.store_path.clone(),
                line: valid.iter().filter(|b| **b == b'\n').count() + 1,
                reason: "line is not valid UTF-8".to_string(),
            }
        })
    }

    /// First half of a commit: write `contents` to a fsynced temporary file
    /// next to the store. Nothing is visible to readers until
    /// [`StagedCommit::publish`] renames it into place; dropping the staged
    /// commit instead discards it.
    pub fn stage(&self, _lock: &StoreLock, contents: &str) -> Result<StagedCommit> {
        let dir = self.parent_dir();
        let file_name = self
            .store_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| DEFAULT_FILE_NAME.to_string());

        let staged = StagedCommit {
            tmp_path: dir.join(format!(".{}-{}.tmp", file_name, Uuid::new_v4())),
            target: self.store_path.clone(),
            dir,
            published: false,
        };

        let mut opts = OpenOptions::new();
        opts.write(true).create_new(true);
        #[cfg(unix)]
        opts.mode(0o644);
        let mut file = opts.open(&staged.tmp_path)?;

        // Keep the mode of the file being replaced.
        if let Ok(meta) = fs::metadata(&self.store_path) {
            file.set_permissions(meta.permissions())?;
        }

        file.write_all(contents.as_bytes())?;
        file.sync_all()?;
        log::debug!("staged {} bytes in {}", contents.len(), staged.tmp_path.display());

        Ok(staged)
    }
}

/// A fully written, fsynced temporary file waiting to replace the store.
#[must_use = "a staged commit is discarded unless published"]
pub struct StagedCommit {
    tmp_path: PathBuf,
    target: PathBuf,
    dir: PathBuf,
    published: bool,
}

impl StagedCommit {
    pub fn tmp_path(&self) -> &Path {
        &self.tmp_path
    }

    /// Atomically rename the staged file over the store and make the new
    /// directory entry durable.
    ///
    /// Once the rename has happened the new contents are visible, so a
    /// failing directory fsync is only logged: reporting it as an error would
    /// claim nothing was committed.
    pub fn publish(self) -> Result<()> {
        self.publish_with(sync_dir)
    }

    fn publish_with<F>(mut self, sync: F) -> Result<()>
    where
        F: FnOnce(&Path) -> io::Result<()>,
    {
        fs::rename(&self.tmp_path, &self.target)?;
        self.published = true;
        if let Err(e) = sync(&self.dir) {
            log::warn!(
                "committed {} but could not fsync {}: {}",
                self.target.display(),
                self.dir.display(),
                e
            );
            return Ok(());
        }
        log::debug!("committed {}", self.target.display());
        Ok(())
    }
}

impl Drop for StagedCommit {
    fn drop(&mut self) {
        if self.published {
            return;
        }
        match fs::remove_file(&self.tmp_path) {
            Ok(()) => log::debug!("discarded {}", self.tmp_path.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => log::warn!("failed to remove {}: {}", self.tmp_path.display(), e),
        }
    }
}

#[cfg(unix)]
fn sync_dir(dir: &Path) -> io::Result<()> {
    File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}

impl StorageBackend for FsBackend {
    type Lock = StoreLock;

    fn lock(&self) -> Result<StoreLock> {
        self.ensure_dir(&self.parent_dir())?;

        let mut opts = OpenOptions::new();
        opts.read(true).write(true).create(true).truncate(false);
        // Owner-only: anyone able to open the lock file could flock it and
        // stall every writer.
        #[cfg(unix)]
        opts.mode(0o600);
        let file = opts.open(&self.lock_path)?;

        log::debug!("waiting for lock {}", self.lock_path.display());
        fs2::FileExt::lock_exclusive(&file)?;
        log::debug!("acquired lock {}", self.lock_path.display());

        Ok(StoreLock {
            file,
            path: self.lock_path.clone(),
        })
    }

    fn read_locked(&self, _lock: &StoreLock) -> Result<String> {
        self.read_store()
    }

    fn read_snapshot(&self) -> Result<String> {
        self.read_store()
    }

    fn commit(&self, lock: &StoreLock, contents: &str) -> Result<()> {
        self.stage(lock, contents)?.publish()
    }

    fn location(&self) -> &Path {
        &self.store_path
    }
}
