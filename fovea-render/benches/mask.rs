use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fovea_core::FocusPoint;
use fovea_render::{MaskConfig, OcclusionMask};
use pprof::criterion::{Output, PProfProfiler};
use std::time::Duration;

fn attached_mask(width: u32, height: u32) -> OcclusionMask {
    let mut mask = OcclusionMask::new(MaskConfig::default());
    mask.attach(width, height).expect("mask surface");
    mask
}

/// One mask redraw per pointer move, at the two display sizes we run on.
pub fn bench_mask_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("mask_render");
    group
        .sample_size(50)
        .measurement_time(Duration::from_secs(10))
        .warm_up_time(Duration::from_secs(2));

    for (label, w, h) in [("720p", 1280u32, 720u32), ("1080p", 1920, 1080)] {
        group.bench_function(label, |b| {
            let mut mask = attached_mask(w, h);
            let mut step = 0u32;
            b.iter(|| {
                step = (step + 7) % w;
                let focus = FocusPoint::new(step as f32, (h / 2) as f32);
                black_box(mask.render(black_box(focus)));
            });
        });
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        .with_profiler(PProfProfiler::new(100, Output::Flamegraph(None)))
        .confidence_level(0.95)
        .noise_threshold(0.02)
        .significance_level(0.05);
    targets = bench_mask_render
}

criterion_main!(benches);
