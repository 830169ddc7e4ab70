use criterion::{black_box, criterion_group, criterion_main, Criterion};

use progressbar::params::{resolve, QueryParams};
use progressbar::rendering::{compose_svg, raster::rasterize};
use progressbar::{calculate_target, SubmissionState};

fn bench_calculate_target(c: &mut Criterion) {
    c.bench_function("calculate_target", |b| {
        b.iter(|| {
            for s in (0..3_000_000u64).step_by(997) {
                black_box(calculate_target(black_box(s)));
            }
        })
    });
}

fn bench_render(c: &mut Criterion) {
    let config = resolve(&QueryParams::parse(
        "url=https://act.example.org/node/116&bg=f8fafc&bar=FF5F00",
    ))
    .expect("resolve bench query");
    let state = SubmissionState::from_total(116);
    let text = "116 people have taken action so far. We need 384 more to reach 500.";

    c.bench_function("compose_svg", |b| {
        b.iter(|| black_box(compose_svg(&config, state.percentage, text)))
    });

    let svg = compose_svg(&config, state.percentage, text);
    c.bench_function("rasterize_300x169", |b| {
        b.iter(|| black_box(rasterize(&svg, 300, 169, None, 1 << 20).expect("rasterize")))
    });
}

criterion_group!(benches, bench_calculate_target, bench_render);
criterion_main!(benches);
