use dartcam_core::{FrameView, ManualClock};
use dartcam_detect::{DartTracker, DetectStatus, DetectorParams};

const W: usize = 200;
const H: usize = 200;
const BOARD: u8 = 180;
const DART: u8 = 40;

/// Solid board with dark rectangles `[x0, x1) x [y0, y1)` painted on top.
fn frame_with(rects: &[(usize, usize, usize, usize)], value: u8) -> Vec<u8> {
    let mut data = vec![0u8; W * H * 4];
    for px in data.chunks_exact_mut(4) {
        px.copy_from_slice(&[BOARD, BOARD, BOARD, 255]);
    }
    for &(x0, x1, y0, y1) in rects {
        for y in y0..y1 {
            for x in x0..x1 {
                let i = (y * W + x) * 4;
                data[i..i + 3].copy_from_slice(&[value, value, value]);
            }
        }
    }
    data
}

fn view(data: &[u8]) -> FrameView<'_> {
    FrameView::rgba(W, H, data).expect("valid frame")
}

fn tracker(params: DetectorParams) -> (DartTracker<ManualClock>, ManualClock) {
    let clock = ManualClock::new(1_000);
    let mut t = DartTracker::with_clock(params, clock.clone());
    t.set_roi(100.0, 100.0, 90.0);
    (t, clock)
}

/// Horizontal shaft to the right of the center, radially aligned.
const RIGHT_DART: (usize, usize, usize, usize) = (130, 170, 97, 103);
/// Same shape to the left of the center.
const LEFT_DART: (usize, usize, usize, usize) = (30, 70, 97, 103);

#[test]
fn first_frame_seeds_and_static_scene_is_quiet() {
    let (mut t, _) = tracker(DetectorParams::default());
    let empty = frame_with(&[], DART);
    assert_eq!(t.detect_with_status(&view(&empty)), DetectStatus::Seeded);
    assert!(t.background().is_seeded());
    for _ in 0..3 {
        assert_eq!(t.detect_with_status(&view(&empty)), DetectStatus::NoBlob);
    }
    assert_eq!(t.last_stats().threshold, 28.0);
}

#[test]
fn radial_dart_is_detected_with_tip_inside_bbox() {
    let (mut t, _) = tracker(DetectorParams::default());
    let empty = frame_with(&[], DART);
    let dart = frame_with(&[RIGHT_DART], DART);
    t.detect(&view(&empty));

    let det = t.detect(&view(&dart)).expect("dart detected");
    assert_eq!(det.area, 240);
    assert!(det.bbox.contains(det.tip), "tip {:?} outside {:?}", det.tip, det.bbox);
    assert!(det.confidence > 0.3);
    assert!(det.confidence <= 1.0);
    // Outward end of a shaft right of center is its right end.
    assert!((det.tip.x - 168.5).abs() < 1e-3, "tip {:?}", det.tip);
    assert!((det.tip.y - 99.5).abs() < 1e-3, "tip {:?}", det.tip);
    let axis = det.axis.expect("axis");
    assert!(axis.x2 > axis.x1);
}

#[test]
fn accept_starts_cooldown() {
    let (mut t, clock) = tracker(DetectorParams::default());
    let empty = frame_with(&[], DART);
    let first = frame_with(&[RIGHT_DART], DART);
    let both = frame_with(&[RIGHT_DART, LEFT_DART], DART);
    t.detect(&view(&empty));

    let det = t.detect(&view(&first)).expect("first dart");
    t.accept(&view(&first), &det);

    clock.advance(100);
    assert!(t.detect(&view(&first)).is_none());

    clock.advance(100);
    assert_eq!(t.detect_with_status(&view(&both)), DetectStatus::Cooldown);

    clock.advance(500);
    let second = t.detect(&view(&both)).expect("second dart after cooldown");
    assert!(second.tip.x < 50.0, "tip {:?}", second.tip);
}

#[test]
fn tangential_shaft_is_rejected() {
    let (mut t, _) = tracker(DetectorParams::default());
    let empty = frame_with(&[], DART);
    let tangential = frame_with(&[(147, 153, 80, 120)], DART);
    t.detect(&view(&empty));
    match t.detect_with_status(&view(&tangential)) {
        DetectStatus::RejectedAngle { deg } => assert!(deg > 80.0),
        other => panic!("expected angle rejection, got {other:?}"),
    }
}

#[test]
fn area_gate_rejects_hands_and_specks() {
    let (mut t, _) = tracker(DetectorParams::default());
    let empty = frame_with(&[], DART);
    t.detect(&view(&empty));

    let hand = frame_with(&[(110, 170, 40, 160)], DART);
    match t.detect_with_status(&view(&hand)) {
        DetectStatus::RejectedArea { area } => assert!(area > 6000),
        other => panic!("expected area rejection, got {other:?}"),
    }

    let speck = frame_with(&[(140, 145, 98, 102)], DART);
    assert_eq!(
        t.detect_with_status(&view(&speck)),
        DetectStatus::RejectedArea { area: 20 }
    );
}

#[test]
fn specular_highlights_are_ignored() {
    let (mut t, _) = tracker(DetectorParams::default());
    let empty = frame_with(&[], DART);
    let glare = frame_with(&[(120, 160, 80, 120)], 255);
    t.detect(&view(&empty));
    assert_eq!(t.detect_with_status(&view(&glare)), DetectStatus::NoBlob);
}

#[test]
fn strict_preset_needs_two_frames() {
    let (mut t, _) = tracker(DetectorParams::strict());
    let empty = frame_with(&[], DART);
    let dart = frame_with(&[RIGHT_DART], DART);
    t.detect(&view(&empty));
    assert_eq!(
        t.detect_with_status(&view(&dart)),
        DetectStatus::Unstable { streak: 1 }
    );
    assert!(t.detect(&view(&dart)).is_some());
}

#[test]
fn resolution_change_and_reset_reseed() {
    let (mut t, _) = tracker(DetectorParams::default());
    let empty = frame_with(&[], DART);
    t.detect(&view(&empty));

    let small = vec![BOARD; 100 * 80 * 4];
    let small_view = FrameView::rgba(100, 80, &small).expect("valid frame");
    assert_eq!(t.detect_with_status(&small_view), DetectStatus::Seeded);
    assert_eq!(t.background().width(), 100);

    t.reset();
    assert!(!t.background().is_seeded());
    assert_eq!(t.detect_with_status(&small_view), DetectStatus::Seeded);
}

#[test]
fn detection_serializes_to_json() {
    let (mut t, _) = tracker(DetectorParams::default());
    let empty = frame_with(&[], DART);
    let dart = frame_with(&[RIGHT_DART], DART);
    t.detect(&view(&empty));
    let status = t.detect_with_status(&view(&dart));
    let json = serde_json::to_value(&status).expect("serialize");
    assert_eq!(json["status"], "detected");
    assert_eq!(json["area"], 240);
    assert!(json["tip"].is_array());
}
