use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use vitals::store::SampleStore;

fn seeded_store(rows: usize) -> SampleStore {
    let store = SampleStore::open_in_memory().expect("bench store init failed");
    for i in 0..rows {
        store
            .append((i % 100) as f64, 50.0, 75.0)
            .expect("bench append failed");
    }
    store
}

fn bench_append(c: &mut Criterion) {
    c.bench_function("append_1000", |b| {
        b.iter_batched(
            || SampleStore::open_in_memory().expect("bench store init failed"),
            |store| {
                for i in 0..1000 {
                    store
                        .append(black_box((i % 100) as f64), 50.0, 75.0)
                        .expect("bench append failed");
                }
                store
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_list_all(c: &mut Criterion) {
    let store = seeded_store(1000);
    c.bench_function("list_all_1000", |b| {
        b.iter(|| {
            let rows = store.list_all().expect("bench list failed");
            black_box(rows);
        })
    });
}

criterion_group!(benches, bench_append, bench_list_all);
criterion_main!(benches);
