//! The durable store: validate, retain, rotate backup, write atomically.
//!
//! Provides:
//! - **Atomicity**: writes are all-or-nothing via temp file + atomic rename
//! - **Isolation**: an in-process mutex serializes threads, an advisory
//!   file lock serializes independent processes
//! - **Durability**: explicit fsync before the rename makes content stable
//!   before it becomes visible
//! - **Recovery**: reads degrade main -> backup -> fresh document and
//!   never fail
//!
//! Does NOT interpret agent profiles, aggregate events, or render
//! anything; those live with the callers.

use std::fs::{self, File};
use std::io::Write as IoWrite;
use std::path::Path;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use chrono::Utc;
use serde_json::Value;

use tally_core::{DashboardState, Result, StoreError};

use crate::lock::FileLock;
use crate::paths::StorePaths;
use crate::retention::RetentionPolicy;
use crate::validate::validate_state;

/// Default bound on cross-process lock acquisition.
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(10);

/// Read-only snapshot of the store's on-disk footprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreStats {
    pub main_exists: bool,
    pub backup_exists: bool,
    pub main_size_bytes: u64,
    pub backup_size_bytes: u64,
    pub agent_count: usize,
    pub event_count: usize,
    pub session_count: usize,
}

/// Durable storage for one project's [`DashboardState`].
///
/// The store owns all three backing paths (main, backup, lock sidecar);
/// no other component opens them. A single instance may be shared across
/// threads: the internal mutex covers the whole write path. Across
/// processes, every process must point at the same metrics directory for
/// the file lock to provide correctness.
pub struct DurableStore {
    project_name: String,
    paths: StorePaths,
    retention: RetentionPolicy,
    lock_timeout: Duration,
    write_mutex: Mutex<()>,
}

impl DurableStore {
    /// Creates a store for `project_name` backed by `metrics_dir`.
    ///
    /// The directory is created lazily on the first save; a missing
    /// directory is a valid (empty) store for reads.
    pub fn new(project_name: impl Into<String>, metrics_dir: impl Into<std::path::PathBuf>) -> Self {
        Self {
            project_name: project_name.into(),
            paths: StorePaths::new(metrics_dir),
            retention: RetentionPolicy::default(),
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
            write_mutex: Mutex::new(()),
        }
    }

    /// Overrides the cross-process lock timeout.
    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    /// Overrides the retention caps.
    pub fn with_retention(mut self, retention: RetentionPolicy) -> Self {
        self.retention = retention;
        self
    }

    /// The project this store was configured for.
    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    /// The resolved backing paths.
    pub fn paths(&self) -> &StorePaths {
        &self.paths
    }

    /// Persists `document` with full durability guarantees.
    ///
    /// Sequence: validate, then under the in-process mutex and the
    /// cross-process file lock: stamp `updated_at`, apply retention,
    /// rotate the current main file to the backup path, write the new
    /// document to a temp file, fsync, and atomically rename it into
    /// place. Validation failures reject the call before any disk
    /// mutation; a failed backup rotation is logged and ignored.
    pub fn save(&self, document: &DashboardState) -> Result<()> {
        let value = serde_json::to_value(document)
            .map_err(|source| StoreError::Serialize { source })?;
        validate_state(&value).map_err(StoreError::validation)?;

        // Thread-level serialization first, then process-level. A writer
        // that panicked mid-save left the disk consistent (rename is
        // atomic), so a poisoned mutex carries no torn state to recover.
        let _thread_guard = self
            .write_mutex
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        fs::create_dir_all(self.paths.dir())
            .map_err(|source| StoreError::io("creating metrics directory", self.paths.dir(), source))?;

        let _process_guard = FileLock::acquire(self.paths.lock(), self.lock_timeout)?;

        let mut document = document.clone();
        document.updated_at = Utc::now();
        self.retention.apply(&mut document);

        self.rotate_backup();

        let json = serde_json::to_string_pretty(&document)
            .map_err(|source| StoreError::Serialize { source })?;
        self.write_atomic(self.paths.main(), json.as_bytes())?;

        tracing::debug!(
            path = %self.paths.main().display(),
            events = document.events.len(),
            sessions = document.sessions.len(),
            "dashboard state saved"
        );
        Ok(())
    }

    /// Loads the best available valid document. Total: never fails.
    ///
    /// Tries the main file, then the backup, then synthesizes a fresh
    /// empty document for the configured project. Takes no lock: writes
    /// are rename-atomic, so a concurrent reader sees either the old or
    /// the new document, never a mixture.
    pub fn load(&self) -> DashboardState {
        if let Some(state) = self.load_generation(self.paths.main(), "main") {
            return state;
        }
        if let Some(state) = self.load_generation(self.paths.backup(), "backup") {
            tracing::warn!(
                path = %self.paths.backup().display(),
                "recovered dashboard state from backup"
            );
            return state;
        }
        tracing::debug!(
            project = %self.project_name,
            "no usable dashboard state on disk; starting empty"
        );
        DashboardState::empty(&self.project_name)
    }

    /// Reports file existence/sizes and entry counts. No lock, no mutation.
    pub fn stats(&self) -> StoreStats {
        let (main_exists, main_size_bytes) = file_size(self.paths.main());
        let (backup_exists, backup_size_bytes) = file_size(self.paths.backup());
        let state = self.load();
        StoreStats {
            main_exists,
            backup_exists,
            main_size_bytes,
            backup_size_bytes,
            agent_count: state.agents.len(),
            event_count: state.events.len(),
            session_count: state.sessions.len(),
        }
    }

    /// Copies the current main bytes to the backup path, via the same
    /// atomic protocol so the backup is equally crash-safe.
    ///
    /// Non-fatal on failure: the primary write still proceeds, at the
    /// cost of recovery confidence for this generation.
    fn rotate_backup(&self) {
        if !self.paths.main().exists() {
            return;
        }
        let bytes = match fs::read(self.paths.main()) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::warn!(
                    path = %self.paths.main().display(),
                    "could not read main file for backup rotation: {err}"
                );
                return;
            }
        };
        if let Err(err) = self.write_atomic(self.paths.backup(), &bytes) {
            tracing::warn!(
                path = %self.paths.backup().display(),
                "backup rotation failed: {err}"
            );
        }
    }

    /// Writes `bytes` to `target` atomically: temp sibling, fsync, rename.
    ///
    /// The temp file never survives: it is renamed into place on success
    /// and removed on any failure.
    fn write_atomic(&self, target: &Path, bytes: &[u8]) -> Result<()> {
        let temp = self.paths.temp();
        let result = (|| {
            let mut file = File::create(&temp)
                .map_err(|source| StoreError::io("creating temp file", &temp, source))?;
            file.write_all(bytes)
                .map_err(|source| StoreError::io("writing temp file", &temp, source))?;
            // Content must be on stable storage before the rename makes
            // it visible.
            file.sync_all()
                .map_err(|source| StoreError::io("syncing temp file", &temp, source))?;
            drop(file);
            fs::rename(&temp, target)
                .map_err(|source| StoreError::io("renaming temp file into place", target, source))
        })();
        if result.is_err() {
            let _ = fs::remove_file(&temp);
        }
        result
    }

    /// One step of the recovery chain: read, parse, validate, decode.
    /// Any failure returns `None` and is logged, never propagated.
    fn load_generation(&self, path: &Path, generation: &str) -> Option<DashboardState> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), generation, "file not present");
            return None;
        }
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!(path = %path.display(), generation, "unreadable: {err}");
                return None;
            }
        };
        let value: Value = match serde_json::from_str(&content) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(path = %path.display(), generation, "corrupt JSON: {err}");
                return None;
            }
        };
        if let Err(reason) = validate_state(&value) {
            tracing::warn!(path = %path.display(), generation, "invalid document: {reason}");
            return None;
        }
        match serde_json::from_value(value) {
            Ok(state) => Some(state),
            Err(err) => {
                tracing::warn!(path = %path.display(), generation, "undecodable document: {err}");
                None
            }
        }
    }
}

fn file_size(path: &Path) -> (bool, u64) {
    match fs::metadata(path) {
        Ok(meta) => (true, meta.len()),
        Err(_) => (false, 0),
    }
}
