//! File-based locking for the profiles root.
//!
//! Cross-platform (fs2) advisory lock:
//! - Exclusive only: one save/switch/delete at a time per profiles root.
//! - Non-blocking: a held lock means another operation is in flight, and the
//!   caller fails fast (SwitchError::Busy) instead of queueing.
//!
//! Lock file path: <profiles_root>/LOCK
//! Lock is released on Drop.

use anyhow::{Context, Result};
use fs2::FileExt;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

pub const LOCK_FILE: &str = "LOCK";

pub struct LockGuard {
    file: std::fs::File,
    path: PathBuf,
}

impl LockGuard {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        // fs2 unlock errors on drop are ignored deliberately.
        let _ = self.file.unlock();
    }
}

fn lock_file_path(root: &Path) -> PathBuf {
    root.join(LOCK_FILE)
}

fn open_lock_file(root: &Path) -> Result<std::fs::File> {
    let path = lock_file_path(root);
    let f = OpenOptions::new()
        .create(true)
        .read(true)
        .write(true)
        .open(&path)
        .with_context(|| format!("open lock file {}", path.display()))?;
    Ok(f)
}

/// Try to take the exclusive lock. Ok(None) means somebody else holds it.
pub fn try_acquire_exclusive(root: &Path) -> Result<Option<LockGuard>> {
    let file = open_lock_file(root)?;
    match file.try_lock_exclusive() {
        Ok(()) => Ok(Some(LockGuard {
            file,
            path: lock_file_path(root),
        })),
        Err(e) if e.kind() == fs2::lock_contended_error().kind() => Ok(None),
        Err(e) => Err(e).with_context(|| {
            format!("try_lock_exclusive {}", lock_file_path(root).display())
        }),
    }
}
