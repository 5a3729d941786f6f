#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::io::Write;
use tree_hashset::{HashTable, KeyOps};

/// Wraps key operations and tracks every key copy the table creates and releases
///
/// Releasing a key that is not alive (double release) panics.
pub struct CountingKeyOps<O: KeyOps> {
    inner: O,
    clones: Cell<usize>,
    destroys: Cell<usize>,
    live: RefCell<BTreeMap<O::Key, usize>>,
}

impl<O> CountingKeyOps<O>
where
    O: KeyOps,
    O::Key: Ord + Clone,
{
    pub fn new(inner: O) -> Self {
        Self {
            inner,
            clones: Cell::new(0),
            destroys: Cell::new(0),
            live: RefCell::default(),
        }
    }

    pub fn clones(&self) -> usize {
        self.clones.get()
    }

    pub fn destroys(&self) -> usize {
        self.destroys.get()
    }

    pub fn live_count(&self) -> usize {
        self.live.borrow().values().sum()
    }
}

impl<O> KeyOps for CountingKeyOps<O>
where
    O: KeyOps,
    O::Key: Ord + Clone,
{
    type Key = O::Key;

    fn hash(&self, key: &Self::Key, bit_width: u8) -> usize {
        self.inner.hash(key, bit_width)
    }

    fn compare(&self, a: &Self::Key, b: &Self::Key) -> Ordering {
        self.inner.compare(a, b)
    }

    fn clone_key(&self, key: &Self::Key) -> Self::Key {
        self.clones.set(self.clones.get() + 1);
        *self.live.borrow_mut().entry(key.clone()).or_default() += 1;
        self.inner.clone_key(key)
    }

    fn destroy_key(&self, key: Self::Key) {
        self.destroys.set(self.destroys.get() + 1);

        let mut live = self.live.borrow_mut();
        let count = live.get_mut(&key).expect("released a key that was never cloned");
        assert!(*count > 0, "key released twice");
        *count -= 1;
        if *count == 0 {
            live.remove(&key);
        }
        drop(live);

        self.inner.destroy_key(key);
    }

    fn print_key(&self, key: &Self::Key, writer: &mut dyn Write) -> std::io::Result<()> {
        self.inner.print_key(key, writer)
    }
}

/// Renders the diagnostic dump of a table
pub fn dump<O: KeyOps>(table: &HashTable<'_, O>) -> String {
    let mut buf = vec![];
    table.print_to(&mut buf).expect("dump should not fail");
    String::from_utf8(buf).expect("dump should be UTF-8")
}

/// Parses a dump back into `(bucket index, [(depth, key)])` lines
pub fn parse_dump(dump: &str) -> Vec<(usize, Vec<(usize, String)>)> {
    dump.lines()
        .map(|line| {
            let (idx, rest) = line.split_once(": ").expect("line should have an index");
            let entries = rest
                .strip_prefix('[')
                .and_then(|s| s.strip_suffix(']'))
                .expect("entries should be bracketed");

            let entries = if entries.is_empty() {
                vec![]
            } else {
                entries
                    .split(',')
                    .map(|entry| {
                        let (depth, key) = entry.split_once('-').expect("entry should have a depth");
                        (depth.parse().expect("depth should be a number"), key.to_string())
                    })
                    .collect()
            };

            (idx.parse().expect("index should be a number"), entries)
        })
        .collect()
}
