//! FIFO retention for the document's append-only lists.
//!
//! Applied only on the write path. Callers may accumulate arbitrarily
//! many entries in memory; the store bounds them on the next save.
//! Pure FIFO: oldest entries drop first, survivors keep their order,
//! no priority exceptions.

use tally_core::DashboardState;

/// Maximum number of events retained on disk.
pub const MAX_EVENTS: usize = 500;

/// Maximum number of session summaries retained on disk.
pub const MAX_SESSIONS: usize = 50;

/// Caps for the two append-only lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    pub max_events: usize,
    pub max_sessions: usize,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            max_events: MAX_EVENTS,
            max_sessions: MAX_SESSIONS,
        }
    }
}

impl RetentionPolicy {
    /// Truncates `events` and `sessions` to their last N elements.
    pub fn apply(&self, state: &mut DashboardState) {
        truncate_oldest(&mut state.events, self.max_events);
        truncate_oldest(&mut state.sessions, self.max_sessions);
    }
}

/// Keeps the last `max` items, dropping from the front.
fn truncate_oldest<T>(items: &mut Vec<T>, max: usize) {
    if items.len() > max {
        let excess = items.len() - max;
        items.drain(..excess);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tally_core::{AgentEvent, EventStatus};

    fn event(n: usize) -> AgentEvent {
        let now = Utc::now();
        AgentEvent {
            event_id: format!("evt-{n}"),
            agent: "builder".to_string(),
            session_id: "sess-1".to_string(),
            ticket: String::new(),
            started_at: now,
            ended_at: now,
            duration_secs: 1.0,
            status: EventStatus::Success,
            input_tokens: 10,
            output_tokens: 20,
            total_tokens: 30,
            cost: 0.001,
            artifacts: Vec::new(),
            error: String::new(),
            model: "test-model".to_string(),
        }
    }

    #[test]
    fn lists_within_caps_are_untouched() {
        let mut state = DashboardState::empty("demo");
        state.events = (0..10).map(event).collect();
        let before = state.events.clone();

        RetentionPolicy::default().apply(&mut state);
        assert_eq!(state.events, before);
    }

    #[test]
    fn oversized_events_keep_the_newest_in_order() {
        let mut state = DashboardState::empty("demo");
        state.events = (0..MAX_EVENTS + 37).map(event).collect();

        RetentionPolicy::default().apply(&mut state);

        assert_eq!(state.events.len(), MAX_EVENTS);
        assert_eq!(state.events.first().unwrap().event_id, "evt-37");
        assert_eq!(
            state.events.last().unwrap().event_id,
            format!("evt-{}", MAX_EVENTS + 36)
        );
        // Relative order of survivors is preserved.
        for (i, ev) in state.events.iter().enumerate() {
            assert_eq!(ev.event_id, format!("evt-{}", i + 37));
        }
    }

    #[test]
    fn custom_caps_apply_to_both_lists() {
        let mut state = DashboardState::empty("demo");
        state.events = (0..8).map(event).collect();

        let policy = RetentionPolicy {
            max_events: 3,
            max_sessions: 1,
        };
        policy.apply(&mut state);

        assert_eq!(state.events.len(), 3);
        assert_eq!(state.events[0].event_id, "evt-5");
    }
}
