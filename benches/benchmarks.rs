// benches/benchmarks.rs — Performance benchmarks (criterion)
//
// Two hot paths:
//   1. Density estimation — O(N²·D) pairwise kernel over the population
//   2. Full frozen cycle — density through allocation on a realistic run

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use strategos::engine::coordinator::run_cycle_frozen;
use strategos::engine::density;
use strategos::engine::types::{Candidate, EvolutionConfig, EvolutionState};

/// Deterministic synthetic population: N candidates on a noisy grid in D
/// dimensions with fitness spread over [0,1).
fn synthetic_population(n: usize, d: usize) -> Vec<Candidate> {
    (0..n)
        .map(|i| {
            let embedding: Vec<f32> = (0..d)
                .map(|j| ((i * 31 + j * 7) % 97) as f32 / 97.0 + (i % 5) as f32)
                .collect();
            Candidate {
                id: format!("cand-{i}"),
                fitness_score: (i % 10) as f64 / 10.0,
                embedding: Some(embedding),
                ..Candidate::new(format!("strategy {i}"))
            }
        })
        .collect()
}

fn bench_density(c: &mut Criterion) {
    let pop = synthetic_population(256, 64);
    let points: Vec<(String, Vec<f32>)> = pop
        .iter()
        .map(|cand| (cand.id.clone(), cand.embedding.clone().unwrap()))
        .collect();

    c.bench_function("density_256x64", |b| {
        b.iter(|| density::estimate(black_box(&points), 1e-10))
    });
}

fn bench_full_cycle(c: &mut Criterion) {
    c.bench_function("cycle_128x32", |b| {
        b.iter(|| {
            let mut pop = synthetic_population(128, 32);
            let mut state = EvolutionState::new(EvolutionConfig::default()).unwrap();
            run_cycle_frozen(black_box(&mut pop), &mut state).unwrap()
        })
    });
}

criterion_group!(benches, bench_density, bench_full_cycle);
criterion_main!(benches);
