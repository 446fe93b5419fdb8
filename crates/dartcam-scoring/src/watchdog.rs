use dartcam_core::Clock;
use log::{debug, warn};

use crate::queue::{ScoringEvent, ScoringSender};

/// Per-dart time limit.
///
/// Polled by the owner of the frame loop; when the limit has elapsed since
/// the last dart while the visit is incomplete, [`TurnWatchdog::poll`]
/// yields a [`ScoringEvent::Timeout`] (and enqueues it when a sender is
/// attached) and restarts the timer.
#[derive(Debug)]
pub struct TurnWatchdog<C: Clock> {
    clock: C,
    limit_ms: u64,
    started_ms: Option<u64>,
    sender: Option<ScoringSender>,
}

impl<C: Clock> TurnWatchdog<C> {
    /// Stopped watchdog; call [`TurnWatchdog::start`] to arm it.
    pub fn new(clock: C, limit_ms: u64) -> Self {
        Self {
            clock,
            limit_ms,
            started_ms: None,
            sender: None,
        }
    }

    pub fn with_sender(mut self, sender: ScoringSender) -> Self {
        self.sender = Some(sender);
        self
    }

    pub fn limit_ms(&self) -> u64 {
        self.limit_ms
    }

    pub fn is_running(&self) -> bool {
        self.started_ms.is_some()
    }

    pub fn start(&mut self) {
        self.started_ms = Some(self.clock.now_ms());
    }

    /// A dart landed; restart the timer.
    pub fn notify_dart(&mut self) {
        self.start();
    }

    pub fn stop(&mut self) {
        self.started_ms = None;
    }

    /// Milliseconds left before the limit, `None` when stopped.
    pub fn remaining_ms(&self) -> Option<u64> {
        let started = self.started_ms?;
        let elapsed = self.clock.now_ms().saturating_sub(started);
        Some(self.limit_ms.saturating_sub(elapsed))
    }

    /// Check the limit. `pending_darts` is the size of the current visit;
    /// a full visit never times out.
    pub fn poll(&mut self, pending_darts: usize) -> Option<ScoringEvent> {
        if pending_darts >= 3 || self.remaining_ms()? > 0 {
            return None;
        }
        debug!("turn limit of {} ms elapsed", self.limit_ms);
        self.start();
        if let Some(tx) = &self.sender {
            if tx.timeout().is_err() {
                warn!("timeout not delivered: scoring queue closed");
            }
        }
        Some(ScoringEvent::Timeout)
    }
}
