//! Cooperative pause/resume/cancel signals for a running trainer.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const MIN_BACKOFF: Duration = Duration::from_millis(1);
const MAX_BACKOFF: Duration = Duration::from_millis(80);

/// Shared control handle for a training run.
///
/// Cloning yields another handle to the same flags, so a UI thread can keep
/// one copy while the trainer checks another at every step boundary. Signals
/// are only observed at those boundaries; a step in progress always
/// completes.
#[derive(Debug, Clone, Default)]
pub struct RunControl {
    paused: Arc<AtomicBool>,
    cancelled: Arc<AtomicBool>,
}

impl RunControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests a pause at the next step boundary.
    pub fn pause(&self) {
        self.paused.store(true, Ordering::SeqCst);
    }

    /// Lets a paused run continue.
    pub fn resume(&self) {
        self.paused.store(false, Ordering::SeqCst);
    }

    /// Requests the run to stop at the next step boundary. Also releases a
    /// paused run.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Clears both flags so the handle can drive a new run.
    pub fn reset(&self) {
        self.paused.store(false, Ordering::SeqCst);
        self.cancelled.store(false, Ordering::SeqCst);
    }

    /// Blocks while paused, polling with exponential backoff capped at 80 ms.
    ///
    /// Returns `false` if the run was cancelled (before or during the wait),
    /// `true` if it may proceed.
    pub fn wait_while_paused(&self) -> bool {
        let mut backoff = MIN_BACKOFF;
        while self.is_paused() && !self.is_cancelled() {
            thread::sleep(backoff);
            backoff = (backoff * 2).min(MAX_BACKOFF);
        }
        !self.is_cancelled()
    }
}
