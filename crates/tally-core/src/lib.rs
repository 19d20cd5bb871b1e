pub mod error;
pub mod state;

// Re-export common error type
pub use error::{Result, StoreError};
pub use state::{
    AgentEvent, AgentProfile, DashboardState, EventStatus, SessionStatus, SessionSummary,
    SessionType, STATE_VERSION,
};
