//! JSON session configuration, offline runs and their reports.
//!
//! A session is one match scored from one camera. [`FrameSession`] drives a
//! [`DartPipeline`] frame by frame on a simulated clock (one tick of
//! `frame_interval_ms` per frame) so recorded footage replays
//! deterministically. [`replay_darts`] runs already-scored darts through
//! the same state machine.

use std::fs;
use std::path::Path;

use dartcam_core::{set_frame, FrameError, FrameView, Homography, ManualClock, Roi};
use dartcam_detect::{DartTracker, Detection, DetectorParams};
use dartcam_scoring::{
    stats, BoardGeometry, BoardProjector, Dart, DartOutcome, EventOutcome, LegStateMachine, Match,
    MatchEvent, PlayerStats, QueueClosed, RawDart, ScoringError, ScoringEvent, ScoringQueue,
    TurnWatchdog, VisitRecord, X01Rules,
};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::pipeline::{DartPipeline, PipelineEvent, DEFAULT_MIN_CONFIDENCE};

/// Errors produced by session runs.
#[derive(thiserror::Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[cfg(feature = "image")]
    #[error(transparent)]
    Image(#[from] ::image::ImageError),
    #[error(transparent)]
    Frame(#[from] FrameError),
    #[error(transparent)]
    Scoring(#[from] ScoringError),
    #[error(transparent)]
    Queue(#[from] QueueClosed),
    #[error("no frames found in {0}")]
    NoFrames(String),
}

/// Everything needed to score one session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub detector: DetectorParams,
    /// Board region in the image; the frame center with no radius limit when absent.
    pub roi: Option<Roi>,
    pub rules: X01Rules,
    pub players: Vec<String>,
    /// Image to board-millimetre transform. Without it detections are not scored.
    pub homography: Option<Homography>,
    pub geometry: BoardGeometry,
    pub min_confidence: f32,
    /// Apply held low-confidence darts instead of dismissing them.
    pub auto_confirm: bool,
    /// Simulated time between frames.
    pub frame_interval_ms: u64,
    /// Per-dart time limit; an expired limit scores a miss.
    pub turn_limit_ms: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            detector: DetectorParams::default(),
            roi: None,
            rules: X01Rules::default(),
            players: vec!["player 1".to_string()],
            homography: None,
            geometry: BoardGeometry::default(),
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            auto_confirm: false,
            frame_interval_ms: 100,
            turn_limit_ms: None,
        }
    }
}

impl SessionConfig {
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), SessionError> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn projector(&self) -> BoardProjector {
        let mut projector = BoardProjector::uncalibrated().with_geometry(self.geometry);
        projector.set_homography(self.homography);
        projector
    }

    pub fn machine(&self) -> Result<LegStateMachine, ScoringError> {
        LegStateMachine::new(self.rules.clone(), self.players.iter().cloned())
    }
}

/// What one frame did.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameReport {
    pub index: usize,
    pub source: String,
    pub time_ms: u64,
    /// [`PipelineEvent::label`] of the frame.
    pub event: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detection: Option<Detection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dart: Option<Dart>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<DartOutcome>,
    /// Stable reason of a refused dart.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Darts scored as misses because the turn limit expired on this frame.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub timeouts: u32,
}

/// One replayed input.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReplayStep {
    pub index: usize,
    pub event: ScoringEvent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<EventOutcome>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Replay input entry: a full scoring event or a bare dart payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReplayEntry {
    Event(ScoringEvent),
    Dart(RawDart),
}

impl From<ReplayEntry> for ScoringEvent {
    fn from(entry: ReplayEntry) -> Self {
        match entry {
            ReplayEntry::Event(ev) => ev,
            ReplayEntry::Dart(raw) => ScoringEvent::RawDart(raw),
        }
    }
}

/// Result of a session run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub frames: Vec<FrameReport>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<ReplayStep>,
    pub visits: Vec<VisitRecord>,
    pub events: Vec<MatchEvent>,
    pub stats: Vec<PlayerStats>,
    pub state: Match,
}

impl SessionReport {
    fn from_machine(machine: &mut LegStateMachine, mut events: Vec<MatchEvent>) -> Self {
        events.extend(machine.take_events());
        Self {
            frames: Vec::new(),
            steps: Vec::new(),
            visits: machine.visits().to_vec(),
            events,
            stats: stats::match_stats(machine.match_state()),
            state: machine.match_state().clone(),
        }
    }

    /// Number of frames whose dart was scored.
    pub fn applied_darts(&self) -> usize {
        self.frames.iter().filter(|f| f.outcome.is_some()).count()
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), SessionError> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

fn is_zero(n: &u32) -> bool {
    *n == 0
}

/// Frame-by-frame scoring of one match on a simulated clock.
#[derive(Debug)]
pub struct FrameSession {
    pipeline: DartPipeline<BoardProjector, ManualClock>,
    machine: LegStateMachine,
    clock: ManualClock,
    watchdog: Option<TurnWatchdog<ManualClock>>,
    frame_interval_ms: u64,
    auto_confirm: bool,
    frames: Vec<FrameReport>,
    events: Vec<MatchEvent>,
}

impl FrameSession {
    pub fn new(config: &SessionConfig) -> Result<Self, SessionError> {
        let clock = ManualClock::new(0);
        let mut tracker = DartTracker::with_clock(config.detector.clone(), clock.clone());
        if let Some(roi) = config.roi {
            tracker.set_roi(roi.center.x, roi.center.y, roi.radius);
        }
        let pipeline = DartPipeline::with_tracker(tracker, config.projector())
            .with_min_confidence(config.min_confidence);
        let watchdog = config.turn_limit_ms.map(|limit| {
            let mut wd = TurnWatchdog::new(clock.clone(), limit).with_sender(pipeline.sender());
            wd.start();
            wd
        });
        if !pipeline.projector().is_calibrated() {
            warn!("no homography configured: detections will not be scored");
        }
        Ok(Self {
            pipeline,
            machine: config.machine()?,
            clock,
            watchdog,
            frame_interval_ms: config.frame_interval_ms,
            auto_confirm: config.auto_confirm,
            frames: Vec::new(),
            events: Vec::new(),
        })
    }

    pub fn machine(&self) -> &LegStateMachine {
        &self.machine
    }

    pub fn frames(&self) -> &[FrameReport] {
        &self.frames
    }

    /// Score one frame. `source` names it in the report.
    ///
    /// An expired turn timer is queued before the frame is looked at, so its
    /// miss lands ahead of a dart detected on the same frame.
    pub fn push_frame(
        &mut self,
        source: impl Into<String>,
        frame: &FrameView<'_>,
    ) -> &FrameReport {
        let index = self.frames.len();
        let time_ms = index as u64 * self.frame_interval_ms;
        self.clock.set(time_ms);
        set_frame(Some(index as u64));
        self.poll_watchdog();

        let mut event = self.pipeline.process_frame(frame, &mut self.machine);
        if let PipelineEvent::NeedsConfirmation { detection, dart } = event {
            event = if self.auto_confirm {
                self.pipeline
                    .confirm(frame, detection, dart, &mut self.machine)
            } else {
                self.pipeline.dismiss(frame, &detection);
                PipelineEvent::NeedsConfirmation { detection, dart }
            };
        }

        let mut report = FrameReport {
            index,
            source: source.into(),
            time_ms,
            event: event.label().to_string(),
            detection: event.detection().cloned(),
            dart: event.dart(),
            outcome: None,
            error: None,
            timeouts: 0,
        };
        match event {
            PipelineEvent::Applied { outcome, .. } => {
                if let Some(wd) = &mut self.watchdog {
                    wd.notify_dart();
                }
                report.outcome = Some(outcome);
            }
            PipelineEvent::Rejected { error, .. } => {
                report.error = Some(error.reason().to_string());
            }
            _ => {}
        }

        report.timeouts = self
            .pipeline
            .take_applied()
            .iter()
            .filter(|a| a.event == ScoringEvent::Timeout && a.result.is_ok())
            .count() as u32;
        self.events.extend(self.machine.take_events());
        self.frames.push(report);
        &self.frames[index]
    }

    fn poll_watchdog(&mut self) {
        let Some(wd) = &mut self.watchdog else {
            return;
        };
        if self.machine.is_finished() {
            wd.stop();
            return;
        }
        wd.poll(self.machine.pending_darts());
    }

    pub fn finish(mut self) -> SessionReport {
        set_frame(None);
        let mut report = SessionReport::from_machine(&mut self.machine, self.events);
        report.frames = self.frames;
        info!(
            "session finished: {} frames, {} darts scored",
            report.frames.len(),
            report.applied_darts()
        );
        report
    }
}

/// Run scoring inputs through the event queue and report the match.
///
/// Invalid entries are recorded with their reason and do not stop the run.
pub fn replay_darts(
    config: &SessionConfig,
    entries: impl IntoIterator<Item = ReplayEntry>,
) -> Result<SessionReport, SessionError> {
    let mut machine = config.machine()?;
    let queue = ScoringQueue::new();
    let tx = queue.sender();
    let events: Vec<ScoringEvent> = entries.into_iter().map(ScoringEvent::from).collect();
    for event in &events {
        tx.send(event.clone())?;
    }

    let results = queue.drain(&mut machine);
    let steps = events
        .into_iter()
        .zip(results)
        .enumerate()
        .map(|(index, (event, result))| {
            let (outcome, error) = match result {
                Ok(outcome) => (Some(outcome), None),
                Err(e) => (None, Some(e.reason().to_string())),
            };
            ReplayStep {
                index,
                event,
                outcome,
                error,
            }
        })
        .collect();

    let mut report = SessionReport::from_machine(&mut machine, Vec::new());
    report.steps = steps;
    info!(
        "replay finished: {} visits, winner {:?}",
        report.visits.len(),
        report.state.winner
    );
    Ok(report)
}

/// Load replay entries from a JSON array.
pub fn load_replay_json(path: impl AsRef<Path>) -> Result<Vec<ReplayEntry>, SessionError> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}
