use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use hopcroft::prelude::*;

fn ring(n: u32) -> InverseTransitions<char, u32> {
    InverseTransitions::from_edges((0..n).map(|i| (i, 'a', (i + 1) % n)))
}

fn minimize_ring(c: &mut Criterion) {
    let mut group = c.benchmark_group("ring");
    for n in [100, 1000, 10000] {
        let relation = ring(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &relation, |b, relation| {
            b.iter(|| hopcroft_minimize([0], ['a'], black_box(relation)))
        });
    }
    group.finish();
}

fn minimize_random(c: &mut Criterion) {
    let mut group = c.benchmark_group("random");
    let mut rng = fastrand::Rng::with_seed(1);
    for (symbols, size) in [(2, 1000), (4, 1000), (2, 10000)] {
        let dfa = random_dfa_with(&mut rng, symbols, size);
        let relation = dfa.inverse();
        group.bench_with_input(
            BenchmarkId::new(format!("k{symbols}"), size),
            &relation,
            |b, relation| {
                b.iter(|| {
                    hopcroft_minimize(
                        dfa.accepting().iter().copied(),
                        dfa.alphabet(),
                        black_box(relation),
                    )
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, minimize_ring, minimize_random);
criterion_main!(benches);
