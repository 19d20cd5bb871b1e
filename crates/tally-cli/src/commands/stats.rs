//! `tally stats` - on-disk footprint and entry counts.

use tally_store::DurableStore;

pub fn run(store: &DurableStore) {
    let stats = store.stats();
    println!("metrics dir: {}", store.paths().dir().display());
    println!(
        "main:    {} ({} bytes)",
        if stats.main_exists { "present" } else { "absent" },
        stats.main_size_bytes
    );
    println!(
        "backup:  {} ({} bytes)",
        if stats.backup_exists { "present" } else { "absent" },
        stats.backup_size_bytes
    );
    println!("agents:   {}", stats.agent_count);
    println!("events:   {}", stats.event_count);
    println!("sessions: {}", stats.session_count);
}
