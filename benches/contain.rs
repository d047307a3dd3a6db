use criterion::{black_box, criterion_group, criterion_main, Criterion};
use head_count::contain::{norm_to_offset, pointer_to_norm, ContainLayout, ContainerRect, FrameMeta};

fn bench_mapping(c: &mut Criterion) {
    let container = ContainerRect::new(0.0, 0.0, 1280.0, 720.0);
    let meta = FrameMeta::default();

    c.bench_function("pointer_to_norm_sweep", |b| {
        b.iter(|| {
            let mut acc = 0.0f32;
            for y in 0..720 {
                acc += pointer_to_norm(black_box(y as f32), container, meta, 0.5);
            }
            acc
        })
    });

    c.bench_function("norm_to_offset_sweep", |b| {
        let layout = ContainLayout::compute(container, meta);
        b.iter(|| {
            let mut acc = 0.0f32;
            for step in 0..1000 {
                acc += norm_to_offset(black_box(step as f32 / 1000.0), layout, meta);
            }
            acc
        })
    });
}

criterion_group!(benches, bench_mapping);
criterion_main!(benches);
