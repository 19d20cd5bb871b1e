//! Dashboard state domain model.
//!
//! This module contains the persisted document and its nested entities.
//! The storage layer treats [`AgentProfile`] as opaque: profiles are
//! aggregated by the orchestrator's metrics collector, never interpreted
//! here. Everything serializes as snake_case JSON.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fixed schema tag written into every persisted document.
pub const STATE_VERSION: u32 = 1;

/// Outcome of a single agent delegation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    Success,
    Error,
    Timeout,
    Blocked,
}

/// How an orchestration session was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionType {
    Initializer,
    Continuation,
}

/// Terminal status of an orchestration session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Continue,
    Error,
    Complete,
}

/// The single root persisted document: a rolling performance ledger for
/// a set of software agents.
///
/// `events` and `sessions` are append-ordered, oldest first. The store
/// bounds their length on every save; in memory they may grow beyond
/// the caps between saves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardState {
    pub version: u32,
    pub project_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub total_sessions: u64,
    pub total_tokens: u64,
    pub total_cost: f64,
    pub total_duration_secs: f64,
    pub agents: BTreeMap<String, AgentProfile>,
    pub events: Vec<AgentEvent>,
    pub sessions: Vec<SessionSummary>,
}

impl DashboardState {
    /// Creates a fresh, empty document for `project_name`: version tag,
    /// current timestamps, zeroed totals, empty collections.
    pub fn empty(project_name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            version: STATE_VERSION,
            project_name: project_name.into(),
            created_at: now,
            updated_at: now,
            total_sessions: 0,
            total_tokens: 0,
            total_cost: 0.0,
            total_duration_secs: 0.0,
            agents: BTreeMap::new(),
            events: Vec::new(),
            sessions: Vec::new(),
        }
    }
}

/// Cumulative counters for one agent.
///
/// Mutated only by the collaborator that folds events into profiles;
/// the store persists it verbatim.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AgentProfile {
    pub invocations: u64,
    pub successes: u64,
    pub failures: u64,
    pub total_tokens: u64,
    pub total_cost: f64,
    pub total_duration_secs: f64,
    /// Artifact counts keyed by domain (e.g. "code", "docs").
    #[serde(default)]
    pub artifacts_by_domain: BTreeMap<String, u64>,
    #[serde(default)]
    pub xp: u64,
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub streak: u32,
    /// Ids of this agent's most recent events, newest last.
    #[serde(default)]
    pub recent_event_ids: Vec<String>,
    #[serde(default)]
    pub last_error: String,
    #[serde(default)]
    pub last_active: Option<DateTime<Utc>>,
}

/// Immutable record of one completed delegation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentEvent {
    pub event_id: String,
    pub agent: String,
    pub session_id: String,
    #[serde(default)]
    pub ticket: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub duration_secs: f64,
    pub status: EventStatus,
    pub input_tokens: u64,
    pub output_tokens: u64,
    /// By producer convention `input_tokens + output_tokens`; the store
    /// does not enforce this.
    pub total_tokens: u64,
    pub cost: f64,
    #[serde(default)]
    pub artifacts: Vec<String>,
    /// Empty when the delegation did not fail.
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub model: String,
}

/// One orchestration session, summarized after it ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub sequence: u64,
    pub session_type: SessionType,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub status: SessionStatus,
    #[serde(default)]
    pub agents_invoked: Vec<String>,
    pub total_tokens: u64,
    pub total_cost: f64,
    #[serde(default)]
    pub tickets: Vec<String>,
}
