//! # Survey Benchmark

use criterion::{criterion_group, criterion_main, Criterion};

use nalgebra::{Matrix2, Vector2, Vector3};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sim_lib::{
    beacon::BeaconField,
    estimator::EstimatorState,
    guidance::{GuidanceController, ReferencePath},
    sim::{SurveyParams, SurveySim},
};

fn survey_benchmark(c: &mut Criterion) {
    // Full reference survey, placement to evaluation
    c.bench_function("SurveySim::run", |b| {
        b.iter(|| SurveySim::new(SurveyParams::default()).unwrap().run().unwrap())
    });

    // Rejection sampling of a crowded field
    c.bench_function("BeaconField::generate", |b| {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        b.iter(|| BeaconField::generate(20, 160.0, 50.0, 100_000, &mut rng).unwrap())
    });

    // Single Kalman update
    let cov = Matrix2::identity() * 9.0;
    let state = EstimatorState::Uninitialized
        .update(&Vector2::new(10.0, 10.0), &cov)
        .unwrap();
    c.bench_function("EstimatorState::update", |b| {
        b.iter(|| state.update(&Vector2::new(12.0, 8.0), &cov).unwrap())
    });

    // Single guidance command
    let controller = GuidanceController::default();
    let path = ReferencePath::new(Vector3::new(0.0, 30.0, 0.0), Vector3::new(50.0, 20.0, 0.0))
        .unwrap();
    c.bench_function("GuidanceController::compute_command", |b| {
        b.iter(|| {
            controller
                .compute_command(&Vector3::zeros(), &Vector3::new(1.0, 0.0, 0.0), &path, 5.0)
                .unwrap()
        })
    });
}

criterion_group!(benches, survey_benchmark);
criterion_main!(benches);
