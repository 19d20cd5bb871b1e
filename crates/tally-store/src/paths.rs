//! Path management for the store's on-disk artifacts.
//!
//! Exactly three fixed siblings live in the metrics directory: the main
//! document, a one-generation backup, and the lock sidecar. Temp files
//! used mid-write are dot-prefixed siblings with a uuid component so a
//! crashed writer can never collide with a live one.

use std::path::{Path, PathBuf};

use uuid::Uuid;

/// Main document file name inside the metrics directory.
pub const MAIN_FILE: &str = "dashboard_state.json";

/// Backup file name, one generation behind the main document.
pub const BACKUP_FILE: &str = "dashboard_state.backup.json";

/// Lock sidecar file name. Zero-byte, never parsed as a document.
pub const LOCK_FILE: &str = "dashboard_state.lock";

/// Resolved paths for one metrics directory.
#[derive(Debug, Clone)]
pub struct StorePaths {
    dir: PathBuf,
    main: PathBuf,
    backup: PathBuf,
    lock: PathBuf,
}

impl StorePaths {
    /// Resolves the three fixed sibling paths under `metrics_dir`.
    pub fn new(metrics_dir: impl Into<PathBuf>) -> Self {
        let dir = metrics_dir.into();
        Self {
            main: dir.join(MAIN_FILE),
            backup: dir.join(BACKUP_FILE),
            lock: dir.join(LOCK_FILE),
            dir,
        }
    }

    /// The metrics directory itself.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the main document.
    pub fn main(&self) -> &Path {
        &self.main
    }

    /// Path of the one-generation backup.
    pub fn backup(&self) -> &Path {
        &self.backup
    }

    /// Path of the lock sidecar.
    pub fn lock(&self) -> &Path {
        &self.lock
    }

    /// Generates a fresh temp path inside the metrics directory.
    ///
    /// The temp file must live in the same directory (same filesystem)
    /// as the target so the final rename is atomic.
    pub fn temp(&self) -> PathBuf {
        self.dir
            .join(format!(".{}.{}.tmp", MAIN_FILE, Uuid::new_v4().simple()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn siblings_resolve_under_metrics_dir() {
        let paths = StorePaths::new("/var/lib/tally");
        assert_eq!(paths.main(), Path::new("/var/lib/tally/dashboard_state.json"));
        assert_eq!(
            paths.backup(),
            Path::new("/var/lib/tally/dashboard_state.backup.json")
        );
        assert_eq!(paths.lock(), Path::new("/var/lib/tally/dashboard_state.lock"));
    }

    #[test]
    fn temp_paths_are_unique_and_in_dir() {
        let paths = StorePaths::new("/tmp/metrics");
        let a = paths.temp();
        let b = paths.temp();
        assert_ne!(a, b);
        assert_eq!(a.parent(), Some(Path::new("/tmp/metrics")));
        let name = a.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with(".dashboard_state.json."));
        assert!(name.ends_with(".tmp"));
    }
}
