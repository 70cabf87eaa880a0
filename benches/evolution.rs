//! Benchmarks for the drug-likeness search.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use druglike_evo::{
    EvolutionConfig, EvolutionEngine, Oracle, SmilesOracle, oracle::smiles,
};

const MOLECULES: [&str; 4] = ["CCO", "CC(=O)N", "CCN(C)CC(Cl)C", "CC1CCC(CC1)C(=O)OCC"];

fn bench_generation_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("generation_step");

    for size in [50, 100, 200, 400] {
        let config = EvolutionConfig {
            population_size: size,
            random_seed: Some(42),
            ..Default::default()
        };

        let Ok(mut engine) = EvolutionEngine::new(config, SmilesOracle::new()) else {
            continue;
        };
        engine.initialize();

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                black_box(engine.step_generation()).ok();
            });
        });
    }

    group.finish();
}

fn bench_oracle(c: &mut Criterion) {
    let mut group = c.benchmark_group("oracle");
    let oracle = SmilesOracle::new();

    for smi in MOLECULES {
        group.bench_with_input(BenchmarkId::new("parse", smi), &smi, |b, smi| {
            b.iter(|| smiles::parse(black_box(smi)).ok());
        });
        group.bench_with_input(BenchmarkId::new("describe", smi), &smi, |b, smi| {
            b.iter(|| oracle.describe(black_box(smi)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_generation_step, bench_oracle);
criterion_main!(benches);
