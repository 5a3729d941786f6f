use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use nanoid::nanoid;
use tree_hashset::{Config, HashTable, InsertOutcome, IntegerKeyOps, RemoveOutcome, StrKeyOps};

fn table_insert_hit(c: &mut Criterion) {
    let ops = StrKeyOps;
    let mut table = Config::for_expected_len(1_000_000).open(&ops).unwrap();

    let key = String::from("abc_w5wa35aw35naw");
    let _ = table.insert(&key);

    for _ in 0..1_000_000 {
        let _ = table.insert(&format!("abc_{}", nanoid!()));
    }

    c.bench_function("table insert already stored", |b| {
        b.iter(|| assert_eq!(InsertOutcome::AlreadyStored, table.insert(&key)));
    });
}

fn table_remove_miss(c: &mut Criterion) {
    let ops = StrKeyOps;
    let mut table = Config::for_expected_len(1_000_000).open(&ops).unwrap();

    for _ in 0..1_000_000 {
        let _ = table.insert(&format!("abc_{}", nanoid!()));
    }

    let key = String::from("abc_564321");

    c.bench_function("table remove miss", |b| {
        b.iter(|| assert_eq!(RemoveOutcome::NotStored, table.remove(&key)));
    });
}

fn table_insert_remove(c: &mut Criterion) {
    let mut group = c.benchmark_group("table insert+remove");

    for bits in [1, 4, 10, 16] {
        group.bench_function(format!("{bits} bits"), |b| {
            let ops = IntegerKeyOps;

            b.iter_batched(
                || HashTable::new(bits, &ops),
                |mut table| {
                    for key in 0..1_000 {
                        let _ = table.insert(&key);
                    }
                    for key in 0..1_000 {
                        let _ = table.remove(&key);
                    }
                    table
                },
                BatchSize::SmallInput,
            );
        });
    }
}

fn table_print(c: &mut Criterion) {
    let ops = IntegerKeyOps;
    let mut table = HashTable::new(8, &ops);

    for key in 0..10_000 {
        let _ = table.insert(&key);
    }

    c.bench_function("table print", |b| {
        let mut buf = Vec::with_capacity(1_024 * 1_024);

        b.iter(|| {
            buf.clear();
            table.print_to(&mut buf).unwrap();
        });
    });
}

criterion_group!(
    benches,
    table_insert_hit,
    table_remove_miss,
    table_insert_remove,
    table_print
);
criterion_main!(benches);
