//! `tally show` - plain-text view of the current ledger.

use tally_store::DurableStore;

/// How many trailing events to print.
const RECENT_EVENTS: usize = 10;

pub fn run(store: &DurableStore) {
    let state = store.load();

    println!("project: {}", state.project_name);
    println!("updated: {}", state.updated_at.to_rfc3339());
    println!(
        "totals:  {} sessions, {} tokens, ${:.4}, {:.1}s",
        state.total_sessions, state.total_tokens, state.total_cost, state.total_duration_secs
    );

    if !state.agents.is_empty() {
        println!();
        println!("agents:");
        for (name, profile) in &state.agents {
            println!(
                "  {name}: {} invocations ({} ok / {} failed), {} tokens, ${:.4}",
                profile.invocations,
                profile.successes,
                profile.failures,
                profile.total_tokens,
                profile.total_cost
            );
        }
    }

    let recent = state.events.iter().rev().take(RECENT_EVENTS).collect::<Vec<_>>();
    if !recent.is_empty() {
        println!();
        println!("recent events (newest first):");
        for event in recent {
            println!(
                "  {} {:?} {} ({} tokens, {:.1}s)",
                event.ended_at.to_rfc3339(),
                event.status,
                event.agent,
                event.total_tokens,
                event.duration_secs
            );
        }
    }
}
