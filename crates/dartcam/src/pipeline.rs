//! Frame-to-score loop: detection, projection and the state machine.

use dartcam_core::{Clock, FrameView, SystemClock};
use dartcam_detect::{DartTracker, Detection, DetectorParams};
use dartcam_scoring::{
    AppliedEvent, Dart, DartOutcome, EventOutcome, LegStateMachine, ScoringError, ScoringEvent,
    ScoringProjector, ScoringQueue, ScoringSender,
};
use log::{info, warn};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Confidence below which a detection is held back for confirmation.
pub const DEFAULT_MIN_CONFIDENCE: f32 = 0.5;

/// What happened to one frame.
#[derive(Clone, Debug, PartialEq)]
pub enum PipelineEvent {
    /// Nothing to score on this frame.
    Idle,
    /// A dart was found but its confidence is below the pipeline threshold.
    /// Resolve it with [`DartPipeline::confirm`] or [`DartPipeline::dismiss`].
    NeedsConfirmation { detection: Detection, dart: Dart },
    Applied {
        detection: Detection,
        dart: Dart,
        outcome: DartOutcome,
    },
    /// The state machine refused the dart.
    Rejected { dart: Dart, error: ScoringError },
    /// No board calibration; the detection was absorbed without scoring.
    Uncalibrated { detection: Detection },
}

impl PipelineEvent {
    pub fn label(&self) -> &'static str {
        match self {
            PipelineEvent::Idle => "idle",
            PipelineEvent::NeedsConfirmation { .. } => "needs_confirmation",
            PipelineEvent::Applied { .. } => "applied",
            PipelineEvent::Rejected { .. } => "rejected",
            PipelineEvent::Uncalibrated { .. } => "uncalibrated",
        }
    }

    pub fn detection(&self) -> Option<&Detection> {
        match self {
            PipelineEvent::NeedsConfirmation { detection, .. }
            | PipelineEvent::Applied { detection, .. }
            | PipelineEvent::Uncalibrated { detection } => Some(detection),
            PipelineEvent::Idle | PipelineEvent::Rejected { .. } => None,
        }
    }

    pub fn dart(&self) -> Option<Dart> {
        match self {
            PipelineEvent::NeedsConfirmation { dart, .. }
            | PipelineEvent::Applied { dart, .. }
            | PipelineEvent::Rejected { dart, .. } => Some(*dart),
            PipelineEvent::Idle | PipelineEvent::Uncalibrated { .. } => None,
        }
    }
}

/// One camera feeding one match.
///
/// Every detection that leaves the pipeline resolved (applied, rejected or
/// uncalibrated) is accepted into the tracker's background, so the next dart
/// is isolated against the board with the previous darts in it. A detection
/// waiting for confirmation is not; until it is resolved the tracker keeps
/// reporting it.
///
/// The pipeline is the consumer of its [`ScoringQueue`]. Darts it detects are
/// applied through that queue after anything other producers (timers, manual
/// entry) sent through [`Self::sender`]; those other events are collected for
/// [`Self::take_applied`].
#[derive(Debug)]
pub struct DartPipeline<P, C: Clock = SystemClock> {
    tracker: DartTracker<C>,
    projector: P,
    min_confidence: f32,
    queue: ScoringQueue,
    applied: Vec<AppliedEvent>,
}

impl<P: ScoringProjector> DartPipeline<P, SystemClock> {
    pub fn new(params: DetectorParams, projector: P) -> Self {
        Self::with_tracker(DartTracker::new(params), projector)
    }
}

impl<P: ScoringProjector, C: Clock> DartPipeline<P, C> {
    pub fn with_tracker(tracker: DartTracker<C>, projector: P) -> Self {
        Self {
            tracker,
            projector,
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            queue: ScoringQueue::new(),
            applied: Vec::new(),
        }
    }

    /// Set the confirmation threshold. `0.0` applies every detection.
    pub fn with_min_confidence(mut self, min_confidence: f32) -> Self {
        self.min_confidence = min_confidence.clamp(0.0, 1.0);
        self
    }

    pub fn min_confidence(&self) -> f32 {
        self.min_confidence
    }

    pub fn tracker(&self) -> &DartTracker<C> {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut DartTracker<C> {
        &mut self.tracker
    }

    pub fn projector(&self) -> &P {
        &self.projector
    }

    pub fn projector_mut(&mut self) -> &mut P {
        &mut self.projector
    }

    /// Handle for other producers of scoring events.
    pub fn sender(&self) -> ScoringSender {
        self.queue.sender()
    }

    /// Events from [`Self::sender`] applied since the last call, in order.
    pub fn take_applied(&mut self) -> Vec<AppliedEvent> {
        std::mem::take(&mut self.applied)
    }

    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip_all))]
    pub fn process_frame(
        &mut self,
        frame: &FrameView<'_>,
        machine: &mut LegStateMachine,
    ) -> PipelineEvent {
        let backlog = self.queue.drain_applied(machine);
        self.applied.extend(backlog);

        let Some(detection) = self.tracker.detect(frame) else {
            return PipelineEvent::Idle;
        };

        let Some(dart) = self.projector.project(detection.tip) else {
            info!(
                "detection at ({:.1}, {:.1}) not scored: board not calibrated",
                detection.tip.x, detection.tip.y
            );
            self.tracker.accept(frame, &detection);
            return PipelineEvent::Uncalibrated { detection };
        };

        if detection.confidence < self.min_confidence {
            info!(
                "{dart} held for confirmation: confidence {:.2} < {:.2}",
                detection.confidence, self.min_confidence
            );
            return PipelineEvent::NeedsConfirmation { detection, dart };
        }

        self.apply(frame, detection, dart, machine)
    }

    /// Apply a dart held by [`PipelineEvent::NeedsConfirmation`]. The dart may
    /// differ from the projected one when an operator corrected it.
    pub fn confirm(
        &mut self,
        frame: &FrameView<'_>,
        detection: Detection,
        dart: Dart,
        machine: &mut LegStateMachine,
    ) -> PipelineEvent {
        self.apply(frame, detection, dart, machine)
    }

    /// Drop a held detection without scoring it. The object stays on the board,
    /// so it still goes into the background.
    pub fn dismiss(&mut self, frame: &FrameView<'_>, detection: &Detection) {
        info!(
            "detection at ({:.1}, {:.1}) dismissed",
            detection.tip.x, detection.tip.y
        );
        self.tracker.accept(frame, detection);
    }

    fn apply(
        &mut self,
        frame: &FrameView<'_>,
        detection: Detection,
        dart: Dart,
        machine: &mut LegStateMachine,
    ) -> PipelineEvent {
        self.tracker.accept(frame, &detection);
        let mut applied = self.queue.drain_then(machine, ScoringEvent::Dart(dart));
        let result = applied.pop().map(|a| a.result);
        self.applied.extend(applied);
        match result {
            Some(Ok(EventOutcome::Dart(outcome))) => PipelineEvent::Applied {
                detection,
                dart,
                outcome,
            },
            Some(Err(error)) => {
                warn!("{dart} not scored: {error}");
                PipelineEvent::Rejected { dart, error }
            }
            Some(Ok(other)) => {
                warn!("{dart} produced unexpected outcome {other:?}");
                PipelineEvent::Idle
            }
            None => PipelineEvent::Idle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dartcam_core::{ManualClock, Point2};
    use dartcam_scoring::{BoardProjector, X01Rules};

    const W: usize = 120;
    const H: usize = 120;

    fn board() -> Vec<u8> {
        let mut data = vec![0u8; W * H * 4];
        for px in data.chunks_exact_mut(4) {
            px.copy_from_slice(&[180, 180, 180, 255]);
        }
        data
    }

    /// Dark radial bar right of center, tip at the outer end.
    fn with_dart(mut data: Vec<u8>) -> Vec<u8> {
        for y in 58..62 {
            for x in 75..105 {
                let i = (y * W + x) * 4;
                data[i..i + 3].copy_from_slice(&[30, 30, 30]);
            }
        }
        data
    }

    fn pipeline<P: ScoringProjector>(
        projector: P,
    ) -> (DartPipeline<P, ManualClock>, ManualClock) {
        let clock = ManualClock::new(0);
        let mut tracker = DartTracker::with_clock(DetectorParams::default(), clock.clone());
        tracker.set_roi(60.0, 60.0, 55.0);
        (DartPipeline::with_tracker(tracker, projector), clock)
    }

    fn machine() -> LegStateMachine {
        LegStateMachine::new(X01Rules::default(), ["ann"]).unwrap()
    }

    fn always_t20(_tip: Point2<f32>) -> Option<Dart> {
        Dart::triple(20).ok()
    }

    #[test]
    fn applies_confident_detection_once() {
        let (p, clock) = pipeline(always_t20);
        let mut p = p.with_min_confidence(0.0);
        let mut m = machine();
        let empty = board();
        let dart = with_dart(board());
        let empty = FrameView::rgba(W, H, &empty).unwrap();
        let frame = FrameView::rgba(W, H, &dart).unwrap();

        assert_eq!(p.process_frame(&empty, &mut m), PipelineEvent::Idle);
        let ev = p.process_frame(&frame, &mut m);
        assert_eq!(ev.label(), "applied");
        assert_eq!(ev.dart(), Dart::triple(20).ok());
        assert_eq!(m.remaining(), 441);

        clock.advance(10_000);
        assert_eq!(p.process_frame(&frame, &mut m), PipelineEvent::Idle);
        assert_eq!(m.remaining(), 441);
    }

    #[test]
    fn low_confidence_waits_for_confirmation() {
        let (p, _) = pipeline(always_t20);
        let mut p = p.with_min_confidence(1.0);
        let mut m = machine();
        let empty = board();
        let dart = with_dart(board());
        let empty = FrameView::rgba(W, H, &empty).unwrap();
        let frame = FrameView::rgba(W, H, &dart).unwrap();

        p.process_frame(&empty, &mut m);
        let PipelineEvent::NeedsConfirmation { detection, dart } = p.process_frame(&frame, &mut m)
        else {
            panic!("expected a held detection");
        };
        assert_eq!(m.remaining(), 501);
        assert_eq!(
            p.process_frame(&frame, &mut m).label(),
            "needs_confirmation"
        );

        let ev = p.confirm(&frame, detection, dart, &mut m);
        assert_eq!(ev.label(), "applied");
        assert_eq!(m.remaining(), 441);
    }

    #[test]
    fn dismissed_detection_is_not_scored() {
        let (p, _) = pipeline(always_t20);
        let mut p = p.with_min_confidence(1.0);
        let mut m = machine();
        let empty = board();
        let dart = with_dart(board());
        let empty = FrameView::rgba(W, H, &empty).unwrap();
        let frame = FrameView::rgba(W, H, &dart).unwrap();

        p.process_frame(&empty, &mut m);
        let ev = p.process_frame(&frame, &mut m);
        let detection = ev.detection().cloned().unwrap();
        p.dismiss(&frame, &detection);
        assert_eq!(p.process_frame(&frame, &mut m), PipelineEvent::Idle);
        assert_eq!(m.remaining(), 501);
    }

    #[test]
    fn uncalibrated_projector_skips_scoring() {
        let (mut p, _) = pipeline(BoardProjector::uncalibrated());
        let mut m = machine();
        let empty = board();
        let dart = with_dart(board());
        let empty = FrameView::rgba(W, H, &empty).unwrap();
        let frame = FrameView::rgba(W, H, &dart).unwrap();

        p.process_frame(&empty, &mut m);
        let ev = p.process_frame(&frame, &mut m);
        assert!(matches!(ev, PipelineEvent::Uncalibrated { .. }));
        assert_eq!(m.remaining(), 501);
        assert!(m.visits().is_empty());
    }

    #[test]
    fn rejected_dart_still_feeds_background() {
        let (p, clock) = pipeline(always_t20);
        let mut p = p.with_min_confidence(0.0);
        let mut m = LegStateMachine::new(X01Rules::new(40), ["ann"]).unwrap();
        m.apply_dart(Dart::double(20).unwrap()).unwrap();
        assert!(m.is_finished());

        let empty = board();
        let dart = with_dart(board());
        let empty = FrameView::rgba(W, H, &empty).unwrap();
        let frame = FrameView::rgba(W, H, &dart).unwrap();
        p.process_frame(&empty, &mut m);
        let ev = p.process_frame(&frame, &mut m);
        assert_eq!(
            ev,
            PipelineEvent::Rejected {
                dart: Dart::triple(20).unwrap(),
                error: ScoringError::MatchFinished
            }
        );
        clock.advance(10_000);
        assert_eq!(p.process_frame(&frame, &mut m), PipelineEvent::Idle);
    }

    #[test]
    fn queued_timeout_lands_before_detected_dart() {
        let (p, _) = pipeline(always_t20);
        let mut p = p.with_min_confidence(0.0);
        let mut m = machine();
        let empty = board();
        let dart = with_dart(board());
        let empty = FrameView::rgba(W, H, &empty).unwrap();
        let frame = FrameView::rgba(W, H, &dart).unwrap();

        p.sender().timeout().unwrap();
        assert_eq!(p.process_frame(&empty, &mut m), PipelineEvent::Idle);
        assert_eq!(m.pending_darts(), 1);
        let applied = p.take_applied();
        assert_eq!(applied.len(), 1);
        assert_eq!(applied[0].event, ScoringEvent::Timeout);
        assert!(applied[0].result.is_ok());

        let ev = p.process_frame(&frame, &mut m);
        let PipelineEvent::Applied { outcome, .. } = &ev else {
            panic!("expected an applied dart, got {}", ev.label());
        };
        assert_eq!(
            outcome,
            &DartOutcome::Scored {
                points: 60,
                remaining: 441,
                darts_in_visit: 2
            }
        );
        assert!(p.take_applied().is_empty());
    }
}
