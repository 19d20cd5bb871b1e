//! Cross-process advisory file lock.
//!
//! Independent processes pointed at the same metrics directory serialize
//! their writes solely through this lock; they share no other channel.
//! Acquisition is bounded: callers wait at most the requested timeout and
//! then fail loudly instead of blocking forever.

use std::fs::{File, OpenOptions};
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use fs2::FileExt;

use tally_core::{Result, StoreError};

/// Sleep between lock attempts while waiting for a competing holder.
const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// An exclusive lock on the store's lock sidecar.
///
/// The lock is released when the guard is dropped, on every exit path.
/// There is deliberately no `unlock()` method a caller could forget.
///
/// The sidecar file itself is never removed: unlinking it on release
/// would race a waiter that already holds an open handle to the old
/// inode, silently splitting the lock in two.
#[derive(Debug)]
pub struct FileLock {
    file: File,
}

impl FileLock {
    /// Acquires an exclusive lock on `lock_path`, waiting up to `timeout`.
    ///
    /// Polls [`fs2::FileExt::try_lock_exclusive`] so the wait is bounded.
    /// On expiry returns [`StoreError::LockTimeout`] with the elapsed wait;
    /// the caller's on-disk state is untouched in that case.
    pub fn acquire(lock_path: &Path, timeout: Duration) -> Result<Self> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .open(lock_path)
            .map_err(|source| StoreError::io("opening lock file", lock_path, source))?;

        let start = Instant::now();
        loop {
            match file.try_lock_exclusive() {
                Ok(()) => return Ok(Self { file }),
                Err(_) if start.elapsed() + POLL_INTERVAL < timeout => {
                    thread::sleep(POLL_INTERVAL);
                }
                Err(_) => {
                    return Err(StoreError::LockTimeout {
                        path: lock_path.to_path_buf(),
                        waited_ms: start.elapsed().as_millis() as u64,
                    });
                }
            }
        }
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        // Unlock explicitly; best effort, the OS also releases on close.
        let _ = FileExt::unlock(&self.file);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn acquire_creates_sidecar_and_releases_on_drop() {
        let dir = TempDir::new().unwrap();
        let lock_path = dir.path().join("test.lock");

        {
            let _guard = FileLock::acquire(&lock_path, Duration::from_secs(1)).unwrap();
            assert!(lock_path.exists());
        }

        // Re-acquirable immediately after the guard drops.
        let _guard = FileLock::acquire(&lock_path, Duration::from_millis(100)).unwrap();
    }

    #[test]
    fn contended_acquire_times_out() {
        let dir = TempDir::new().unwrap();
        let lock_path = dir.path().join("test.lock");

        let _held = FileLock::acquire(&lock_path, Duration::from_secs(1)).unwrap();

        let err = FileLock::acquire(&lock_path, Duration::from_millis(80)).unwrap_err();
        match err {
            StoreError::LockTimeout { path, .. } => assert_eq!(path, lock_path),
            other => panic!("expected LockTimeout, got {other:?}"),
        }
    }

    #[test]
    fn waiter_succeeds_once_holder_releases() {
        let dir = TempDir::new().unwrap();
        let lock_path = dir.path().join("test.lock");

        let held = FileLock::acquire(&lock_path, Duration::from_secs(1)).unwrap();
        let waiter_path = lock_path.clone();
        let waiter = thread::spawn(move || {
            FileLock::acquire(&waiter_path, Duration::from_secs(5)).is_ok()
        });

        thread::sleep(Duration::from_millis(100));
        drop(held);

        assert!(waiter.join().unwrap());
    }
}
