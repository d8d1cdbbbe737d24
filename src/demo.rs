//! Self-contained timer backend for running the card without a real
//! home-automation host.
//!
//! Keeps one timer per process and derives its state lazily on read: an
//! active timer whose deadline has passed reads back as idle, so no
//! background scheduling is needed. Commands mirror the host wire protocol,
//! including resume-as-start-without-duration.

use crate::host::{HostCommands, HostStates};
use crate::snapshot::{format_hms, parse_duration, remaining_seconds, TimerSnapshot, TimerState};
use anyhow::{bail, Result};
use chrono::{Duration, Utc};
use std::sync::Mutex;
use tracing::debug;

#[derive(Debug)]
struct DemoTimer {
    snapshot: TimerSnapshot,
}

impl Default for DemoTimer {
    fn default() -> Self {
        Self {
            snapshot: TimerSnapshot::idle(),
        }
    }
}

pub struct DemoHost {
    entity: String,
    timer: Mutex<DemoTimer>,
}

impl DemoHost {
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            timer: Mutex::new(DemoTimer::default()),
        }
    }

    fn check_entity(&self, entity_id: &str) -> Result<()> {
        if entity_id != self.entity {
            bail!("unknown timer entity: {entity_id}");
        }
        Ok(())
    }

    /// Project the stored snapshot to the current instant. A deadline in the
    /// past collapses to idle, which is exactly what the real host reports
    /// after a timer fires.
    fn current(&self) -> TimerSnapshot {
        let timer = self.timer.lock().unwrap();
        let snapshot = timer.snapshot.clone();
        if snapshot.state == TimerState::Active {
            let expired = snapshot
                .finishes_at
                .map(|finish| finish <= Utc::now())
                .unwrap_or(true);
            if expired {
                return TimerSnapshot::idle();
            }
        }
        snapshot
    }
}

impl HostStates for DemoHost {
    fn timer(&self, entity_id: &str) -> Option<TimerSnapshot> {
        if entity_id != self.entity {
            return None;
        }
        Some(self.current())
    }
}

impl HostCommands for DemoHost {
    fn start(&self, entity_id: &str, duration: Option<&str>) -> Result<()> {
        self.check_entity(entity_id)?;
        let seconds = match duration {
            Some(text) => parse_duration(text),
            // Resume: pick up whatever the paused timer had left.
            None => {
                let current = self.current();
                if current.state != TimerState::Paused {
                    bail!("nothing to resume for {entity_id}");
                }
                remaining_seconds(&current, Utc::now())
            }
        };
        if seconds == 0 {
            bail!("refusing to start a zero-length timer");
        }
        debug!(entity = %entity_id, seconds, "demo timer started");
        let mut timer = self.timer.lock().unwrap();
        timer.snapshot = TimerSnapshot {
            state: TimerState::Active,
            finishes_at: Some(Utc::now() + Duration::seconds(seconds as i64)),
            remaining: None,
        };
        Ok(())
    }

    fn pause(&self, entity_id: &str) -> Result<()> {
        self.check_entity(entity_id)?;
        let current = self.current();
        if current.state != TimerState::Active {
            bail!("cannot pause {entity_id} while {}", current.state);
        }
        let left = remaining_seconds(&current, Utc::now());
        debug!(entity = %entity_id, left, "demo timer paused");
        let mut timer = self.timer.lock().unwrap();
        timer.snapshot = TimerSnapshot {
            state: TimerState::Paused,
            finishes_at: None,
            remaining: Some(format_hms(left)),
        };
        Ok(())
    }

    fn cancel(&self, entity_id: &str) -> Result<()> {
        self.check_entity(entity_id)?;
        debug!(entity = %entity_id, "demo timer cancelled");
        let mut timer = self.timer.lock().unwrap();
        timer.snapshot = TimerSnapshot::idle();
        Ok(())
    }
}
