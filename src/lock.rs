//! File-based locking so hotplug events do not reconcile concurrently.
//!
//! netifd can fire several `ifup` events in quick succession; each spawns
//! the hook. The second run waits for the first to finish instead of
//! racing it on the uhttpd configuration.

use anyhow::{Context, Result};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use tracing::debug;

/// Holds an exclusive lock until dropped.
#[derive(Debug)]
pub struct LockGuard {
    _file: File,
}

impl LockGuard {
    /// Acquire the lock at `path`, blocking while another run holds it.
    pub fn acquire(path: &Path) -> Result<Self> {
        let file = open_lock_file(path)?;
        debug!("Waiting for lock {:?}", path);
        file.lock_exclusive()
            .with_context(|| format!("Failed to lock {:?}", path))?;
        Ok(Self { _file: file })
    }
}

fn open_lock_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).ok();
    }

    // create+read+write without truncate avoids a race between creating
    // and locking the file
    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
        .with_context(|| format!("Failed to open lock file: {:?}", path))?;

    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
        .context("Failed to set lock file permissions")?;

    Ok(file)
}

// Lock is released when the file is closed (on drop)
