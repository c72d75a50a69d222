//! Shared helpers for table integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use nutshell_core::channel::Envelope;
use nutshell_core::clock::Clock;
use nutshell_core::rng::DeterministicRng;
use nutshell_table::config::default_characters;
use nutshell_table::table::Table;
use nutshell_test_support::{FixedClock, ScriptedPrompt, SequenceRng};
use tokio::sync::broadcast;

/// Fixed timestamp used across all integration tests.
fn fixed_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(
        chrono::TimeZone::with_ymd_and_hms(&chrono::Utc, 2026, 1, 15, 10, 0, 0).unwrap(),
    ))
}

/// Build a table over the built-in characters with scripted GM answers
/// and dice, seating `gms` then `players` in order.
pub fn build_table(
    gms: &[&str],
    players: &[&str],
    answers: Vec<Option<i32>>,
    dice: Vec<u32>,
) -> (Table, Arc<ScriptedPrompt>) {
    let prompt = Arc::new(ScriptedPrompt::new(answers));
    let rng: Arc<Mutex<dyn DeterministicRng + Send>> = Arc::new(Mutex::new(SequenceRng::new(dice)));
    let mut table = Table::new(16, default_characters(), prompt.clone(), rng, fixed_clock());
    for gm in gms {
        table.add_seat(gm, true).unwrap();
    }
    for player in players {
        table.add_seat(player, false).unwrap();
    }
    (table, prompt)
}

/// Attach a raw observer to the table's transport.
pub fn observe(table: &Table) -> broadcast::Receiver<Envelope> {
    table.channel().subscribe()
}

/// Everything the observer has seen on `topic` so far.
pub fn seen_on(observer: &mut broadcast::Receiver<Envelope>, topic: &str) -> Vec<Envelope> {
    let mut seen = Vec::new();
    while let Ok(envelope) = observer.try_recv() {
        if envelope.topic == topic {
            seen.push(envelope);
        }
    }
    seen
}
