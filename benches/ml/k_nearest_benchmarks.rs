use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use knn::{DistanceStrategy, KNNClassifier};
use ndarray::{Array1, Array2};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn generate_data(rows: usize, cols: usize, rng: &mut ChaCha8Rng) -> Array2<f64> {
    Array2::from_shape_fn((rows, cols), |_| rng.gen_range(-1.0..1.0))
}

fn bench_distances(c: &mut Criterion) {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let features = generate_data(500, 64, &mut rng);
    let labels = Array1::from_shape_fn(500, |_| rng.gen_range(0..10i64));
    let queries = generate_data(100, 64, &mut rng);

    let mut knn = KNNClassifier::new();
    knn.train(features, labels).unwrap();

    let mut group = c.benchmark_group("distances");
    for strategy in [
        DistanceStrategy::TwoLoops,
        DistanceStrategy::OneLoop,
        DistanceStrategy::NoLoops,
    ] {
        group.bench_with_input(
            BenchmarkId::from_parameter(strategy),
            &strategy,
            |b, &strategy| b.iter(|| knn.compute_distances(black_box(&queries), strategy)),
        );
    }
    group.finish();
}

fn bench_predict_labels(c: &mut Criterion) {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let features = generate_data(2000, 16, &mut rng);
    let labels = Array1::from_shape_fn(2000, |_| rng.gen_range(0..10i64));
    let queries = generate_data(200, 16, &mut rng);

    let mut knn = KNNClassifier::new();
    knn.train(features, labels).unwrap();
    let dists = knn.compute_distances_no_loops(&queries).unwrap();

    let mut group = c.benchmark_group("predict_labels");
    for k in [1, 5, 25] {
        group.bench_with_input(BenchmarkId::from_parameter(k), &k, |b, &k| {
            b.iter(|| knn.predict_labels(black_box(&dists), k))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_distances, bench_predict_labels);
criterion_main!(benches);
