//! Single-instance enforcement via a PID lock file.
//!
//! Two wakeguards would double every pulse and fight over the terminal, so
//! an exclusive lock on `$XDG_RUNTIME_DIR/wakeguard.lock` guards startup.
//! The file holds our PID; if a previous instance died without cleanup the
//! stale lock is detected (the PID is probed) and removed.

use anyhow::{Context, Result, bail};
use fs2::FileExt;
use std::fs::File;
use std::io::{Seek, SeekFrom, Write};

use crate::common::utils::is_process_running;

/// Holds the exclusive lock for the process lifetime; the file is removed
/// when the guard drops.
pub struct InstanceLock {
    _file: File,
    path: String,
}

impl Drop for InstanceLock {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

/// Acquire the single-instance lock, cleaning up a stale one if needed.
///
/// # Errors
/// Fails when another live wakeguard instance holds the lock.
pub fn acquire() -> Result<InstanceLock> {
    let runtime_dir = std::env::var("XDG_RUNTIME_DIR").unwrap_or_else(|_| "/tmp".to_string());
    let lock_path = format!("{runtime_dir}/wakeguard.lock");

    if let Some(lock) = try_acquire(&lock_path)? {
        return Ok(lock);
    }

    // Lock is held; decide whether the holder is alive or stale.
    resolve_conflict(&lock_path)?;

    try_acquire(&lock_path)?.context("could not acquire lock after stale cleanup")
}

/// Open the lock file without truncating (truncating before holding the
/// lock would race with the current holder) and try to take the lock.
fn try_acquire(path: &str) -> Result<Option<InstanceLock>> {
    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
        .with_context(|| format!("failed to open lock file {path}"))?;

    match file.try_lock_exclusive() {
        Ok(_) => {
            // Lock acquired, now safe to replace the content with our PID
            file.set_len(0)?;
            file.seek(SeekFrom::Start(0))?;
            writeln!(file, "{}", std::process::id())?;
            file.flush()?;
            Ok(Some(InstanceLock {
                _file: file,
                path: path.to_string(),
            }))
        }
        Err(_) => Ok(None),
    }
}

/// Inspect a held lock: remove it when stale, error when the holder lives.
fn resolve_conflict(path: &str) -> Result<()> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        // Already cleaned up by the holder
        Err(_) => return Ok(()),
    };

    match content.trim().parse::<u32>() {
        Ok(pid) if is_process_running(pid) => {
            log_pipe!();
            log_error!("wakeguard is already running (PID: {pid})");
            bail!("cannot start, another wakeguard instance is running")
        }
        Ok(pid) => {
            log_warning!("Removing stale lock file (process {pid} no longer running)");
            let _ = std::fs::remove_file(path);
            Ok(())
        }
        Err(_) => {
            log_warning!("Lock file format invalid, removing");
            let _ = std::fs::remove_file(path);
            Ok(())
        }
    }
}
