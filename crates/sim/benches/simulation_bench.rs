use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use moran_sim::evolution::{SelectionPolicy, TransitionRule};
use moran_sim::simulation::{Population, SimulationBuilder};
use moran_sim::storage::{EventRecorder, HistoryFormat};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

fn bench_transition_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("transition_step");
    group.throughput(Throughput::Elements(1));

    for &size in &[20usize, 200, 2_000] {
        let policies = [
            ("mutation_drift", SelectionPolicy::mutation_drift(0.01).unwrap()),
            ("fitness_proportional", SelectionPolicy::fitness_proportional(1.2).unwrap()),
        ];
        for (name, policy) in policies {
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, &size| {
                let pop = Population::new(size, size / 2).unwrap();
                let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
                b.iter(|| black_box(policy.sample(black_box(&pop), &mut rng)));
            });
        }
    }

    group.finish();
}

fn bench_simulation_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulation_run");

    for &size in &[20usize, 100] {
        group.bench_with_input(BenchmarkId::new("fitness_proportional", size), &size, |b, &size| {
            let mut seed = 0u64;
            b.iter(|| {
                seed += 1;
                let run = SimulationBuilder::new()
                    .population_size(size)
                    .initial_mutants(size / 10)
                    .fitness_proportional(1.2)
                    .max_steps(1_000_000)
                    .seed(seed)
                    .build()
                    .unwrap()
                    .run();
                black_box(run.result)
            })
        });
    }

    group.finish();
}

fn bench_history_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("history_render");

    let mut pop = Population::new(50, 25).unwrap();
    let policy = SelectionPolicy::mutation_drift(0.05).unwrap();
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(7);
    let mut recorder = EventRecorder::with_capacity(&pop, 10_000);
    for _ in 0..10_000 {
        let outcome = policy.step(&mut pop, &mut rng);
        recorder.record(outcome, &pop);
    }
    let history = recorder.finish();
    group.throughput(Throughput::Elements(history.len() as u64));

    for format in [
        HistoryFormat::SnapshotText,
        HistoryFormat::SnapshotCsv,
        HistoryFormat::EventCsvWithCounts,
        HistoryFormat::EventCsvBare,
    ] {
        group.bench_with_input(
            BenchmarkId::from_parameter(format),
            &format,
            |b, format| b.iter(|| black_box(format.render(black_box(&history)).unwrap())),
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_transition_step,
    bench_simulation_run,
    bench_history_render
);
criterion_main!(benches);
