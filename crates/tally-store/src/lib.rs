//! Durable storage layer for the tally performance ledger.
//!
//! A single JSON document ([`tally_core::DashboardState`]) is shared by
//! several independent processes: the orchestrator, the dashboard server,
//! and CLI viewers. This crate is the only code that touches the backing
//! files. It provides atomic crash-safe writes, cross-process mutual
//! exclusion, corruption recovery, and bounded on-disk growth.

pub mod lock;
pub mod paths;
pub mod retention;
pub mod store;
pub mod validate;

pub use crate::lock::FileLock;
pub use crate::paths::StorePaths;
pub use crate::retention::RetentionPolicy;
pub use crate::store::{DurableStore, StoreStats};
pub use crate::validate::validate_state;
