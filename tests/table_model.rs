mod common;

use common::{dump, parse_dump};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::collections::BTreeSet;
use test_log::test;
use tree_hashset::{HashTable, IntegerKeyOps, KeyOps, StrKeyOps};

/// Checks every bucket is strictly ascending and consistent with the hash
fn verify_buckets<O: KeyOps>(table: &HashTable<'_, O>, key_of: impl Fn(&str) -> O::Key, ops: &O)
where
    O::Key: Ord,
{
    for (idx, entries) in parse_dump(&dump(table)) {
        let keys: Vec<_> = entries.iter().map(|(_, key)| key_of(key)).collect();

        assert!(
            keys.windows(2).all(|w| w[0] < w[1]),
            "bucket {idx} is not in ascending order",
        );

        for key in &keys {
            assert_eq!(idx, ops.hash(key, table.hash_bit_width()));
        }

        // exactly one root per non-empty bucket
        let roots = entries.iter().filter(|(depth, _)| *depth == 0).count();
        assert_eq!(usize::from(!entries.is_empty()), roots);
    }
}

#[test]
fn table_model_integer() {
    let mut rng = StdRng::seed_from_u64(0xC0FFEE);

    for bits in [1, 2, 5] {
        let ops = IntegerKeyOps;
        let mut table = HashTable::new(bits, &ops);
        let mut model = BTreeSet::new();

        for round in 0..5_000 {
            let key: i64 = rng.random_range(-200..200);

            if rng.random_bool(0.6) {
                assert_eq!(model.insert(key), table.insert(&key).is_success());
            } else {
                assert_eq!(model.remove(&key), table.remove(&key).is_success());
            }
            assert_eq!(model.len(), table.len());

            if round % 500 == 0 {
                verify_buckets(&table, |s| s.parse().expect("should be an integer"), &ops);
            }
        }

        verify_buckets(&table, |s| s.parse().expect("should be an integer"), &ops);

        let stored: BTreeSet<i64> = parse_dump(&dump(&table))
            .into_iter()
            .flat_map(|(_, entries)| entries)
            .map(|(_, key)| key.parse().expect("should be an integer"))
            .collect();
        assert_eq!(model, stored);
    }
}

#[test]
fn table_model_string() {
    let mut rng = StdRng::seed_from_u64(42);

    let ops = StrKeyOps;
    let mut table = HashTable::new(3, &ops);
    let mut model = BTreeSet::new();

    for _ in 0..3_000 {
        let key = format!("k{:03}", rng.random_range(0..300));

        if rng.random_bool(0.5) {
            assert_eq!(model.insert(key.clone()), table.insert(&key).is_success());
        } else {
            assert_eq!(model.remove(&key), table.remove(&key).is_success());
        }
    }

    verify_buckets(&table, str::to_string, &ops);
    assert_eq!(model.len(), table.len());

    for key in &model {
        assert!(table.remove(key).is_success());
    }
    assert!(table.is_empty());
    assert!(dump(&table).lines().all(|line| line.ends_with("[]")));
}
