//! Alert state machine: Quiet → Armed → Sounding → Quiet.
//!
//! The machine only ever advances in response to observed snapshots or an
//! explicit user action. The host going idle while we are armed is the one
//! and only finish signal; there is deliberately no check that the run
//! completed its originally requested duration, matching the behavior the
//! card has always had.

use crate::snapshot::TimerState;
use tracing::debug;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AlertPhase {
    /// Nothing pending; the timer is far from finishing or not running.
    #[default]
    Quiet,
    /// Remaining time dropped inside the alert threshold while running.
    /// Visual-only; no sound yet.
    Armed,
    /// The armed timer reached zero; the audible cue is (or should be) active.
    Sounding,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Alert {
    phase: AlertPhase,
}

impl Alert {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> AlertPhase {
        self.phase
    }

    /// Armed or Sounding.
    pub fn is_raised(&self) -> bool {
        self.phase != AlertPhase::Quiet
    }

    pub fn is_sounding(&self) -> bool {
        self.phase == AlertPhase::Sounding
    }

    /// Advance the machine for one observed snapshot.
    ///
    /// Returns `true` exactly when playback must start: the timer went idle
    /// while armed and no sound is running yet. A timer stopped before it
    /// ever armed produces no transition and therefore no sound.
    pub fn observe(&mut self, state: TimerState, remaining: u64, threshold: u64) -> bool {
        match (self.phase, state) {
            (AlertPhase::Armed, TimerState::Idle) => {
                debug!("armed timer reached idle, starting to sound");
                self.phase = AlertPhase::Sounding;
                return true;
            }
            (AlertPhase::Quiet, TimerState::Active) if remaining <= threshold => {
                debug!(remaining, threshold, "arming alert");
                self.phase = AlertPhase::Armed;
            }
            _ => {}
        }
        false
    }

    /// User acknowledged the alert or stopped the timer; also invoked before
    /// any new run starts. Idempotent.
    pub fn silence(&mut self) {
        if self.phase != AlertPhase::Quiet {
            debug!(phase = ?self.phase, "silencing alert");
        }
        self.phase = AlertPhase::Quiet;
    }
}
