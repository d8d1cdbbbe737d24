//! Live-refresh ticker: re-renders the card while the host reports the
//! timer as running.
//!
//! Started when a snapshot shows `active`, stopped otherwise. Start and stop
//! are both idempotent, and stop joins the worker so teardown leaves no
//! periodic work behind.

use crate::cancel::CancelToken;
use crate::runtime::CardEvent;
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::debug;

/// Roughly twice per second, like the dashboard original.
pub const REFRESH_PERIOD: Duration = Duration::from_millis(500);

const POLL_SLICE: Duration = Duration::from_millis(25);

pub struct LiveRefresh {
    events: Sender<CardEvent>,
    period: Duration,
    worker: Option<(CancelToken, JoinHandle<()>)>,
}

impl LiveRefresh {
    pub fn new(events: Sender<CardEvent>) -> Self {
        Self::with_period(events, REFRESH_PERIOD)
    }

    pub fn with_period(events: Sender<CardEvent>, period: Duration) -> Self {
        Self {
            events,
            period,
            worker: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    /// Begin ticking; a no-op when already running.
    pub fn start(&mut self) {
        if self.worker.is_some() {
            return;
        }
        debug!(period_ms = self.period.as_millis() as u64, "starting live refresh");
        let token = CancelToken::new();
        let thread_token = token.clone();
        let events = self.events.clone();
        let period = self.period;
        let handle = thread::spawn(move || loop {
            let mut remaining = period;
            while remaining > Duration::ZERO {
                if thread_token.is_cancelled() {
                    return;
                }
                let slice = remaining.min(POLL_SLICE);
                thread::sleep(slice);
                remaining = remaining.saturating_sub(slice);
            }
            if thread_token.is_cancelled() || events.send(CardEvent::Tick).is_err() {
                return;
            }
        });
        self.worker = Some((token, handle));
    }

    /// Stop ticking and join the worker; a no-op when already stopped.
    pub fn stop(&mut self) {
        if let Some((token, handle)) = self.worker.take() {
            debug!("stopping live refresh");
            token.cancel();
            let _ = handle.join();
        }
    }
}

impl Drop for LiveRefresh {
    fn drop(&mut self) {
        self.stop();
    }
}
