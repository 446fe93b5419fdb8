//! Single-writer funnel for everything that mutates a match.
//!
//! Detection, manual entry, relayed visits and timers all produce
//! [`ScoringEvent`]s through cloneable [`ScoringSender`]s. One consumer owns
//! the [`LegStateMachine`] and applies events one at a time.

use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::ScoringError;
use crate::machine::{DartOutcome, LegStateMachine, VisitSubmission};
use crate::ring::{normalize_dart, Dart, RawDart};
use crate::state::Visit;

/// One requested mutation of the match.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ScoringEvent {
    Dart(Dart),
    /// Unvalidated payload; normalized when consumed.
    RawDart(RawDart),
    Visit(VisitSubmission),
    Timeout,
    Undo,
    ReplaceLast(Dart),
    Commit,
}

/// What an applied event did.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "result", content = "detail", rename_all = "snake_case")]
pub enum EventOutcome {
    Dart(DartOutcome),
    Undone,
    Committed(Visit),
}

/// An event together with what applying it did.
#[derive(Clone, Debug, PartialEq)]
pub struct AppliedEvent {
    pub event: ScoringEvent,
    pub result: Result<EventOutcome, ScoringError>,
}

/// The consumer side has been dropped.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("scoring queue is closed")]
pub struct QueueClosed;

/// Producer handle. Cheap to clone, one per input source.
#[derive(Clone, Debug)]
pub struct ScoringSender {
    tx: Sender<ScoringEvent>,
}

impl ScoringSender {
    pub fn send(&self, event: ScoringEvent) -> Result<(), QueueClosed> {
        self.tx.send(event).map_err(|_| QueueClosed)
    }

    pub fn dart(&self, dart: Dart) -> Result<(), QueueClosed> {
        self.send(ScoringEvent::Dart(dart))
    }

    pub fn raw_dart(&self, raw: RawDart) -> Result<(), QueueClosed> {
        self.send(ScoringEvent::RawDart(raw))
    }

    pub fn timeout(&self) -> Result<(), QueueClosed> {
        self.send(ScoringEvent::Timeout)
    }
}

/// Consumer side of the funnel.
#[derive(Debug)]
pub struct ScoringQueue {
    rx: Receiver<ScoringEvent>,
    tx: Sender<ScoringEvent>,
}

impl Default for ScoringQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoringQueue {
    /// Unbounded queue.
    pub fn new() -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        Self { rx, tx }
    }

    /// Queue holding at most `cap` events; producers block when full.
    pub fn bounded(cap: usize) -> Self {
        let (tx, rx) = crossbeam_channel::bounded(cap);
        Self { rx, tx }
    }

    pub fn sender(&self) -> ScoringSender {
        ScoringSender {
            tx: self.tx.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    /// Apply every event queued so far. Rejected events are logged and
    /// dropped; their results are still returned in order.
    pub fn drain(
        &self,
        machine: &mut LegStateMachine,
    ) -> Vec<Result<EventOutcome, ScoringError>> {
        self.drain_applied(machine)
            .into_iter()
            .map(|a| a.result)
            .collect()
    }

    /// Like [`Self::drain`], keeping each event next to its result.
    pub fn drain_applied(&self, machine: &mut LegStateMachine) -> Vec<AppliedEvent> {
        let mut out = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            out.push(consume(machine, event));
        }
        out
    }

    /// Apply the backlog, then `event` from the consumer itself.
    ///
    /// The returned list always ends with `event`, so everything producers
    /// queued earlier lands first.
    pub fn drain_then(
        &self,
        machine: &mut LegStateMachine,
        event: ScoringEvent,
    ) -> Vec<AppliedEvent> {
        let mut out = self.drain_applied(machine);
        out.push(consume(machine, event));
        out
    }

    /// Wait up to `timeout` for one event and apply it.
    /// `None` when nothing arrived in time.
    pub fn process_next(
        &self,
        machine: &mut LegStateMachine,
        timeout: Duration,
    ) -> Option<Result<EventOutcome, ScoringError>> {
        match self.rx.recv_timeout(timeout) {
            Ok(event) => Some(consume(machine, event).result),
            Err(RecvTimeoutError::Timeout) => None,
            // The queue keeps its own sender alive, so this only happens
            // after every handle is gone.
            Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}

fn consume(machine: &mut LegStateMachine, event: ScoringEvent) -> AppliedEvent {
    debug!("scoring event {event:?}");
    let result = apply_event(machine, event.clone());
    if let Err(e) = &result {
        warn!("scoring event dropped: {e} ({})", e.reason());
    }
    AppliedEvent { event, result }
}

/// Apply one event to the machine.
pub fn apply_event(
    machine: &mut LegStateMachine,
    event: ScoringEvent,
) -> Result<EventOutcome, ScoringError> {
    match event {
        ScoringEvent::Dart(dart) => machine.apply_dart(dart).map(EventOutcome::Dart),
        ScoringEvent::RawDart(raw) => {
            let dart = normalize_dart(&raw)?;
            machine.apply_dart(dart).map(EventOutcome::Dart)
        }
        ScoringEvent::Visit(sub) => machine.submit_visit(&sub).map(EventOutcome::Dart),
        ScoringEvent::Timeout => machine.apply_timeout().map(EventOutcome::Dart),
        ScoringEvent::Undo => machine.undo().map(|()| EventOutcome::Undone),
        ScoringEvent::ReplaceLast(dart) => machine.replace_last(dart).map(EventOutcome::Dart),
        ScoringEvent::Commit => machine.commit_visit().map(EventOutcome::Committed),
    }
}
