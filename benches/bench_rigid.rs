use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use fiducials::{align_paired, apply_transform, FiducialSet, RigidTransform};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_set(n: usize, seed: u64) -> FiducialSet {
    let mut rng = StdRng::seed_from_u64(seed);
    let x: Vec<f32> = (0..n).map(|_| rng.gen_range(0.0f32..100.0)).collect();
    let y: Vec<f32> = (0..n).map(|_| rng.gen_range(0.0f32..100.0)).collect();
    let z: Vec<f32> = (0..n).map(|_| rng.gen_range(0.0f32..100.0)).collect();
    FiducialSet::from_xyz(x, y, z)
}

fn bench_align_paired(c: &mut Criterion) {
    let mut group = c.benchmark_group("align_paired");

    let motion = RigidTransform {
        rotation: [[0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]],
        translation: [5.0, -3.0, 1.0],
    };

    for size in [8, 64, 512] {
        let moving = random_set(size, 42);
        let fixed = apply_transform(&moving, &motion);
        group.bench_with_input(BenchmarkId::new("fiducials", size), &size, |b, _| {
            b.iter(|| align_paired(&moving, &fixed).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_align_paired);
criterion_main!(benches);
