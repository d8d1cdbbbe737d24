//! Boundary to the home-automation host that owns the timer.
//!
//! The card reads snapshots through [`HostStates`] and fires commands
//! through [`HostCommands`]; both are fire-and-forget from the card's point
//! of view. Resume is the host's start command without a duration, which is
//! how the wire protocol expresses it.

use crate::snapshot::TimerSnapshot;
use anyhow::Result;

/// Read side: point-in-time snapshots per entity id. A missing or unknown
/// entity is reported as `None` and handled as an inline render condition,
/// not an error.
pub trait HostStates {
    fn timer(&self, entity_id: &str) -> Option<TimerSnapshot>;
}

/// Write side: the four command kinds the card can issue.
pub trait HostCommands {
    /// Start a run. `duration` is a formatted `HH:MM:SS` string; `None`
    /// resumes a paused timer.
    fn start(&self, entity_id: &str, duration: Option<&str>) -> Result<()>;
    fn pause(&self, entity_id: &str) -> Result<()>;
    fn cancel(&self, entity_id: &str) -> Result<()>;
}

/// A command as observed by the recording test double.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HostCall {
    Start {
        entity: String,
        duration: Option<String>,
    },
    Pause {
        entity: String,
    },
    Cancel {
        entity: String,
    },
}

/// Test double that records every command and serves one scripted snapshot.
#[derive(Debug, Default)]
pub struct RecordingHost {
    snapshot: std::sync::Mutex<Option<TimerSnapshot>>,
    calls: std::sync::Mutex<Vec<HostCall>>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_snapshot(&self, snapshot: Option<TimerSnapshot>) {
        *self.snapshot.lock().unwrap() = snapshot;
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, call: HostCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl HostStates for RecordingHost {
    fn timer(&self, _entity_id: &str) -> Option<TimerSnapshot> {
        self.snapshot.lock().unwrap().clone()
    }
}

impl HostCommands for RecordingHost {
    fn start(&self, entity_id: &str, duration: Option<&str>) -> Result<()> {
        self.record(HostCall::Start {
            entity: entity_id.to_string(),
            duration: duration.map(str::to_string),
        });
        Ok(())
    }

    fn pause(&self, entity_id: &str) -> Result<()> {
        self.record(HostCall::Pause {
            entity: entity_id.to_string(),
        });
        Ok(())
    }

    fn cancel(&self, entity_id: &str) -> Result<()> {
        self.record(HostCall::Cancel {
            entity: entity_id.to_string(),
        });
        Ok(())
    }
}
