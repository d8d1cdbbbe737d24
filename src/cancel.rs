//! Shared cancellation flag for cooperative shutdown of background work.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// Clonable cancellation token; every continuation checks it before
/// proceeding, so aborting is cooperative rather than forced.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Safe to call more than once.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}
