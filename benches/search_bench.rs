// AFD Search Performance Benchmarks
// Tests PLI construction/intersection and full-table discovery across a
// range of row counts.

use afd_discover::{discover, DiscoveryConfig, MeasureKind, Table};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn synthetic_table(rows: usize) -> Table {
    let names = vec!["a".to_string(), "b".to_string(), "c".to_string(), "d".to_string()];
    let data: Vec<Vec<String>> = (0..rows)
        .map(|i| {
            vec![
                (i % 10).to_string(),
                (i % 100).to_string(),
                (i % 3).to_string(),
                i.to_string(),
            ]
        })
        .collect();
    Table::from_rows(names, data).unwrap()
}

fn bench_discover(c: &mut Criterion) {
    let mut group = c.benchmark_group("discover");

    for size in [100usize, 1_000, 5_000] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let table = synthetic_table(size);
            let config = DiscoveryConfig { max_error: 0.05, measure: MeasureKind::G3, seed: Some(42), ..Default::default() };
            b.iter(|| {
                black_box(discover(&table, &config).unwrap());
            });
        });
    }

    group.finish();
}

fn bench_pli_intersect(c: &mut Criterion) {
    use afd_discover::afd::pli::Pli;

    let table = synthetic_table(10_000);
    let a = Pli::from_column(&table, 0);
    let b = Pli::from_column(&table, 1);

    c.bench_function("pli_intersect_10k_rows", |bencher| {
        bencher.iter(|| {
            black_box(a.intersect(&b));
        });
    });
}

criterion_group!(benches, bench_discover, bench_pli_intersect);
criterion_main!(benches);
