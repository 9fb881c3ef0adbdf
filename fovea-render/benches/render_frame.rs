use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use fovea_core::{FocusPoint, Position, Rotation, StimulusSpec, TrialState};
use fovea_render::{MaskConfig, OcclusionMask, Scene, SkiaRenderer, TextPainter};
use fovea_timing::HighPrecisionTimer;

const WIDTH: u32 = 1280;
const HEIGHT: u32 = 720;

fn sixteen_items() -> Vec<StimulusSpec> {
    (0..16)
        .map(|i| StimulusSpec {
            position: Position::new(80.0 + (i % 4) as f32 * 280.0, 60.0 + (i / 4) as f32 * 160.0),
            is_target: i == 5,
            rotation: Rotation::ALL[i % 4],
        })
        .collect()
}

fn harness() -> (SkiaRenderer, OcclusionMask, Vec<u8>, HighPrecisionTimer) {
    let r = SkiaRenderer::new(WIDTH, HEIGHT, TextPainter::without_font()).expect("renderer");
    let mut mask = OcclusionMask::new(MaskConfig::default());
    mask.attach(WIDTH, HEIGHT).expect("mask surface");
    mask.render(FocusPoint::new(640.0, 360.0));
    let fb = vec![0u8; (WIDTH * HEIGHT * 4) as usize];
    (r, mask, fb, HighPrecisionTimer::new())
}

pub fn bench_search_frame(c: &mut Criterion) {
    let items = sixteen_items();
    let mut g = c.benchmark_group("render_frame");
    g.sample_size(40);

    g.bench_function("search_16_items", |b| {
        b.iter_batched(
            harness,
            |(mut r, mask, mut fb, mut t)| {
                let scene = Scene {
                    state: TrialState::AwaitingResponse,
                    items: &items,
                    item_size: 60.0,
                    feedback: None,
                    focus: FocusPoint::new(640.0, 360.0),
                };
                let stats = r.render_frame(&scene, &mask, &mut fb, &mut t);
                black_box(stats.map(|s| s.total).ok());
            },
            BatchSize::LargeInput,
        )
    });

    g.finish();
}

criterion_group!(benches, bench_search_frame);
criterion_main!(benches);
