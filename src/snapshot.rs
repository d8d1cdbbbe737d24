//! Host-provided timer snapshots and the remaining-time derivation.
//!
//! The host owns the actual countdown; all we ever see is a point-in-time
//! snapshot per entity. Remaining time is derived here so the rest of the
//! card never touches wall-clock math directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::Display;

/// Lifecycle state of a host timer entity, as reported on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TimerState {
    Idle,
    Active,
    Paused,
}

/// Point-in-time state of one timer entity, read from the host.
///
/// `finishes_at` is present while the timer is active; `remaining` is the
/// host's formatted duration string, present while paused. The card never
/// mutates a snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub state: TimerState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finishes_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining: Option<String>,
}

impl TimerSnapshot {
    pub fn idle() -> Self {
        Self {
            state: TimerState::Idle,
            finishes_at: None,
            remaining: None,
        }
    }
}

/// Derive remaining whole seconds from a snapshot.
///
/// Idle timers have nothing left. Paused timers report their frozen duration
/// as a string. Active timers are a live projection against `finishes_at`,
/// so two calls in the same tick can legitimately differ.
pub fn remaining_seconds(snapshot: &TimerSnapshot, now: DateTime<Utc>) -> u64 {
    match snapshot.state {
        TimerState::Idle => 0,
        TimerState::Paused => snapshot
            .remaining
            .as_deref()
            .map(parse_duration)
            .unwrap_or(0),
        TimerState::Active => match snapshot.finishes_at {
            Some(finish) => {
                let millis = finish.signed_duration_since(now).num_milliseconds();
                if millis <= 0 {
                    0
                } else {
                    (millis / 1000) as u64
                }
            }
            None => 0,
        },
    }
}

/// Parse a `H:MM:SS` or `MM:SS` duration string into seconds.
///
/// Unparseable segments count as zero rather than failing; a bare number is
/// read as whole seconds. Anything else degrades to zero.
pub fn parse_duration(text: &str) -> u64 {
    let parts: Vec<u64> = text
        .split(':')
        .map(|p| p.trim().parse::<u64>().unwrap_or(0))
        .collect();
    match parts.as_slice() {
        [h, m, s] => h * 3600 + m * 60 + s,
        [m, s] => m * 60 + s,
        [s] => *s,
        _ => 0,
    }
}

/// Format seconds as `HH:MM:SS`, the shape the host expects for start commands.
pub fn format_hms(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// Format seconds as `MM:SS` for the card's readout.
pub fn format_mmss(total_seconds: u64) -> String {
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{minutes:02}:{seconds:02}")
}
