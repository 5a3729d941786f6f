#![no_main]
use arbitrary::{Arbitrary, Unstructured};
use libfuzzer_sys::fuzz_target;
use std::collections::BTreeSet;
use tree_hashset::{HashTable, InsertOutcome, IntegerKeyOps, RemoveOutcome};

#[derive(Arbitrary, Clone, Debug)]
enum Op {
    Insert(i8),
    Remove(i8),
}

fuzz_target!(|data: &[u8]| {
    let mut unstructured = Unstructured::new(data);

    let bits = u8::arbitrary(&mut unstructured).unwrap_or(0) % 6 + 1;

    let Ok(ops) = <Vec<Op> as Arbitrary>::arbitrary(&mut unstructured) else {
        return;
    };

    let key_ops = IntegerKeyOps;
    let mut table = HashTable::new(bits, &key_ops);
    let mut model = BTreeSet::new();

    for op in ops {
        match op {
            Op::Insert(key) => {
                let key = i64::from(key);
                let expected = if model.insert(key) {
                    InsertOutcome::Success
                } else {
                    InsertOutcome::AlreadyStored
                };
                assert_eq!(expected, table.insert(&key));
            }
            Op::Remove(key) => {
                let key = i64::from(key);
                let expected = if model.remove(&key) {
                    RemoveOutcome::Success
                } else {
                    RemoveOutcome::NotStored
                };
                assert_eq!(expected, table.remove(&key));
            }
        }

        assert_eq!(model.len(), table.len());
    }

    let mut dump = vec![];
    table.print_to(&mut dump).unwrap();
    let dump = String::from_utf8(dump).unwrap();
    assert_eq!(1 << bits, dump.lines().count());

    // each bucket lists its keys in ascending order
    let mut listed = 0;
    for line in dump.lines() {
        let (_, entries) = line.split_once(": ").unwrap();
        let entries = entries.trim_start_matches('[').trim_end_matches(']');
        if entries.is_empty() {
            continue;
        }

        let keys = entries
            .split(',')
            .map(|entry| {
                let (_, key) = entry.split_once('-').unwrap();
                key.parse::<i64>().unwrap()
            })
            .collect::<Vec<_>>();

        assert!(keys.windows(2).all(|w| w[0] < w[1]), "{line}");
        listed += keys.len();
    }
    assert_eq!(model.len(), listed);
});
