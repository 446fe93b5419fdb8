use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dartcam_core::{FrameView, ManualClock};
use dartcam_detect::{close4, largest_component, DartTracker, DetectorParams};

fn make_frame(width: usize, height: usize, dart: bool) -> Vec<u8> {
    let mut data = vec![0u8; width * height * 4];
    for (i, px) in data.chunks_exact_mut(4).enumerate() {
        let (x, y) = (i % width, i / width);
        // Mild texture so the differencing statistics are not degenerate.
        let v = 150 + ((x * 7 + y * 13) % 40) as u8;
        px.copy_from_slice(&[v, v, v, 255]);
    }
    if dart {
        let (cx, cy) = (width / 2, height / 2);
        for y in cy - 3..cy + 3 {
            for x in cx + 40..cx + 100 {
                let i = (y * width + x) * 4;
                data[i..i + 3].copy_from_slice(&[30, 30, 30]);
            }
        }
    }
    data
}

fn bench_tracker(c: &mut Criterion) {
    let (w, h) = (1280, 720);
    let empty = make_frame(w, h, false);
    let dart = make_frame(w, h, true);

    let mut tracker = DartTracker::with_clock(DetectorParams::default(), ManualClock::new(0));
    tracker.set_roi(w as f32 * 0.5, h as f32 * 0.5, 340.0);
    let empty_view = FrameView::rgba(w, h, &empty).unwrap();
    let dart_view = FrameView::rgba(w, h, &dart).unwrap();
    tracker.detect(&empty_view);

    c.bench_function("detect_1280x720_empty", |b| {
        b.iter(|| black_box(tracker.detect(black_box(&empty_view))))
    });

    c.bench_function("detect_1280x720_dart", |b| {
        b.iter(|| black_box(tracker.detect(black_box(&dart_view))))
    });
}

fn bench_mask_stages(c: &mut Criterion) {
    let (w, h) = (1280, 720);
    let mut mask = vec![0u8; w * h];
    for y in 300..420 {
        for x in 600..700 {
            mask[y * w + x] = ((x + y) % 11 != 0) as u8;
        }
    }
    let mut scratch = vec![0u8; w * h];
    let mut labels = vec![0u32; w * h];
    let mut queue = Vec::with_capacity(w * h);
    let mut pixels = Vec::new();

    c.bench_function("close4_1280x720", |b| {
        b.iter(|| {
            let mut m = mask.clone();
            close4(black_box(&mut m), &mut scratch, w, h);
            black_box(m[0])
        })
    });

    c.bench_function("largest_component_1280x720", |b| {
        b.iter(|| {
            let blob = largest_component(
                black_box(&mask),
                w,
                h,
                &mut labels,
                &mut queue,
                &mut pixels,
            );
            black_box(blob.map(|b| b.area))
        })
    });
}

criterion_group!(detect, bench_tracker, bench_mask_stages);
criterion_main!(detect);
