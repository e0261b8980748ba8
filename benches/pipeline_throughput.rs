use criterion::{Criterion, black_box, criterion_group, criterion_main};
use framegate::pipeline::handoff::{Entry, handoff};
use framegate::pipeline::transform::FrameTransform;
use framegate::pipeline::types::{PixelFormat, VideoFrame};
use framegate::transforms::{ColorCycle, RedDot};

/// One offer/take round trip through a capacity-1 queue.
fn bench_handoff_round_trip(c: &mut Criterion) {
    let (tx, rx) = handoff(1);
    c.bench_function("handoff_offer_take", |b| {
        b.iter(|| {
            let _ = tx.offer(black_box(42u64));
            match rx.take() {
                Entry::Item(v) => black_box(v),
                Entry::End => 0,
            }
        })
    });
}

fn test_frame(width: u32, height: u32) -> VideoFrame {
    let data = (0..width as usize * height as usize * 3)
        .map(|i| (i % 251) as u8)
        .collect();
    VideoFrame::new(data, width, height, PixelFormat::Rgb24)
}

fn bench_color_cycle(c: &mut Criterion) {
    let frame = test_frame(640, 480);
    let mut transform = ColorCycle::new();
    c.bench_function("color_cycle_640x480", |b| {
        b.iter(|| black_box(transform.apply(black_box(&frame)).unwrap()))
    });
}

fn bench_red_dot(c: &mut Criterion) {
    let frame = test_frame(640, 480);
    let mut transform = RedDot::new();
    c.bench_function("red_dot_640x480", |b| {
        b.iter(|| black_box(transform.apply(black_box(&frame)).unwrap()))
    });
}

criterion_group!(
    benches,
    bench_handoff_round_trip,
    bench_color_cycle,
    bench_red_dot
);
criterion_main!(benches);
