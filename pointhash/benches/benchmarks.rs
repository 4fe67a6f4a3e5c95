use common::{Aabb, Point, SampledScene};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use glam::Vec3;
use pointhash::{Config, PointHashIndex};
use rand::prelude::*;
use serialization::{BlockCodec, CodecId};

fn random_scene(rng: &mut StdRng) -> SampledScene {
    let mut scene = SampledScene::new();
    let bounds = Aabb::new(Vec3::ZERO, Vec3::splat(100.0));
    for instance in 0..16u32 {
        let count = rng.gen_range(1000..10000);
        let points: Vec<Point> = (0..count)
            .map(|_| Point::random_inside(&bounds, instance, rng))
            .collect();
        scene.push_instance(&points, rng.gen_range(0.5..2.0), instance % 4 == 0);
    }
    scene
}

fn build_benchmark(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0);
    let scene = random_scene(&mut rng);

    c.bench_function("pointhash_build", |b| {
        b.iter(|| PointHashIndex::build(black_box(&scene), Config::default()))
    });
}

fn build_parallel_benchmark(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0);
    let scene = random_scene(&mut rng);

    c.bench_function("pointhash_build_parallel", |b| {
        b.iter(|| PointHashIndex::build_parallel(black_box(&scene), Config::default()))
    });
}

fn lookup_benchmark(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(1);
    let scene = random_scene(&mut rng);
    let Ok(index) = PointHashIndex::build(&scene, Config::default()) else {
        return;
    };

    c.bench_function("pointhash_find_cell", |b| {
        b.iter(|| {
            let point = &scene.points[rng.gen_range(0..scene.points.len())];
            index.find_cell(point.instance_id as usize, black_box(point.position))
        })
    });
}

fn compact_benchmark(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(2);
    let scene = random_scene(&mut rng);
    let Ok(index) = PointHashIndex::build(&scene, Config::default()) else {
        return;
    };

    c.bench_function("pointhash_compact", |b| {
        b.iter(|| black_box(&index).compact())
    });
}

fn encode_benchmark(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(3);
    let scene = random_scene(&mut rng);
    let Ok(index) = PointHashIndex::build(&scene, Config::default()) else {
        return;
    };
    let buffers = index.transfer_buffers();

    c.bench_function("pointhash_encode_lz4", |b| {
        b.iter(|| buffers.encode(black_box(&BlockCodec::Lz4)))
    });
    c.bench_function("pointhash_encode_zstd", |b| {
        b.iter(|| buffers.encode(black_box(&BlockCodec::from_id(CodecId::Zstd))))
    });
}

criterion_group!(
    pointhash_benchmarks,
    build_benchmark,
    build_parallel_benchmark,
    lookup_benchmark,
    compact_benchmark,
    encode_benchmark
);
criterion_main!(pointhash_benchmarks);
