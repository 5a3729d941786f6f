// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use crate::{
    bucket_tree::{node_size, BucketTree},
    config::MAX_HASH_BIT_WIDTH,
    InsertOutcome, KeyOps, RemoveOutcome,
};
use std::io::Write;

#[cfg(feature = "metrics")]
use crate::metrics::Metrics;

type Bucket<K> = Option<BucketTree<K>>;

/// Picks the bucket slot for a hash index.
///
/// # Panics
///
/// Panics if the index is out of range, which means the hash function broke its contract.
fn slot_mut<K>(buckets: &mut [Bucket<K>], idx: usize) -> &mut Bucket<K> {
    let bucket_count = buckets.len();

    match buckets.get_mut(idx) {
        Some(slot) => slot,
        None => panic!("hash returned bucket index {idx}, but there are only {bucket_count} buckets"),
    }
}

/// A set of keys, stored in a fixed number of buckets
///
/// Each bucket that has seen an insert holds an unbalanced binary search
/// tree, ordered by [`KeyOps::compare`]. The bucket count is `2^hash_bit_width`
/// and never changes.
///
/// The key operations are borrowed for the lifetime of the table; every key
/// the table holds is a [`KeyOps::clone_key`] copy, released through
/// [`KeyOps::destroy_key`] when it is removed or the table is dropped.
pub struct HashTable<'ops, O: KeyOps> {
    hash_bit_width: u8,
    buckets: Box<[Bucket<O::Key>]>,
    len: usize,
    ops: &'ops O,

    #[cfg(feature = "metrics")]
    metrics: Metrics,
}

impl<'ops, O: KeyOps> HashTable<'ops, O> {
    /// Creates an empty table with `2^hash_bit_width` buckets.
    ///
    /// Buckets are allocated lazily, on the first insert that hashes to them.
    ///
    /// # Panics
    ///
    /// Panics if `hash_bit_width` is 0 or larger than [`MAX_HASH_BIT_WIDTH`].
    /// Use [`Config::open`](crate::Config::open) to get an error instead.
    pub fn new(hash_bit_width: u8, ops: &'ops O) -> Self {
        assert!(
            (1..=MAX_HASH_BIT_WIDTH).contains(&hash_bit_width),
            "hash bit width must be in 1..={MAX_HASH_BIT_WIDTH}, got {hash_bit_width}",
        );

        let bucket_count = 1usize << hash_bit_width;

        log::debug!("Creating hash table with {bucket_count} buckets");

        Self {
            hash_bit_width,
            buckets: std::iter::repeat_with(|| None).take(bucket_count).collect(),
            len: 0,
            ops,

            #[cfg(feature = "metrics")]
            metrics: Metrics::default(),
        }
    }

    /// Number of bits the hash function is asked for.
    #[must_use]
    pub fn hash_bit_width(&self) -> u8 {
        self.hash_bit_width
    }

    /// Number of buckets (`2^hash_bit_width`).
    #[must_use]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Number of buckets whose tree has been created.
    ///
    /// Buckets are never reclaimed, so a bucket stays occupied even after its
    /// last key is removed.
    #[must_use]
    pub fn occupied_bucket_count(&self) -> usize {
        self.buckets.iter().filter(|bucket| bucket.is_some()).count()
    }

    /// Height of the tallest bucket tree.
    #[must_use]
    pub fn max_bucket_height(&self) -> usize {
        self.buckets
            .iter()
            .flatten()
            .map(BucketTree::height)
            .max()
            .unwrap_or(0)
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no keys are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Approximate memory used by the bucket array and tree nodes in bytes.
    ///
    /// Memory owned by the keys themselves (e.g. string contents) is not included.
    #[must_use]
    pub fn approximate_size(&self) -> usize {
        std::mem::size_of_val(&*self.buckets)
            + self.occupied_bucket_count() * std::mem::size_of::<BucketTree<O::Key>>()
            + self.len * node_size::<O::Key>()
    }

    /// Returns the operation counters of this table.
    #[cfg(feature = "metrics")]
    #[must_use]
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    #[cfg(test)]
    pub(crate) fn lookup(&self, key: &O::Key) -> Option<&O::Key> {
        let idx = self.ops.hash(key, self.hash_bit_width);
        self.buckets
            .get(idx)?
            .as_ref()?
            .lookup(key, self.ops)
    }

    /// Inserts a clone of `key`, unless an equal key is already stored.
    ///
    /// # Panics
    ///
    /// Panics if the hash function returns an index outside of the bucket range.
    pub fn insert(&mut self, key: &O::Key) -> InsertOutcome {
        let ops = self.ops;
        let idx = ops.hash(key, self.hash_bit_width);
        let slot = slot_mut(&mut self.buckets, idx);

        let tree = slot.get_or_insert_with(|| {
            log::trace!("Creating bucket tree #{idx}");

            #[cfg(feature = "metrics")]
            Metrics::record(&self.metrics.buckets_created);

            BucketTree::new()
        });

        if tree.lookup(key, ops).is_some() {
            log::trace!("Key already stored in bucket #{idx}");

            #[cfg(feature = "metrics")]
            Metrics::record(&self.metrics.duplicate_inserts);

            return InsertOutcome::AlreadyStored;
        }

        tree.insert(key, ops);
        self.len += 1;

        #[cfg(feature = "metrics")]
        Metrics::record(&self.metrics.inserts);

        InsertOutcome::Success
    }

    /// Removes the stored key equal to `key`, releasing the table's copy.
    ///
    /// # Panics
    ///
    /// Panics if the hash function returns an index outside of the bucket range.
    pub fn remove(&mut self, key: &O::Key) -> RemoveOutcome {
        let ops = self.ops;
        let idx = ops.hash(key, self.hash_bit_width);

        let removed = slot_mut(&mut self.buckets, idx)
            .as_mut()
            .is_some_and(|tree| tree.remove(key, ops));

        if !removed {
            log::trace!("Key not stored in bucket #{idx}");

            #[cfg(feature = "metrics")]
            Metrics::record(&self.metrics.missed_removes);

            return RemoveOutcome::NotStored;
        }

        self.len -= 1;

        #[cfg(feature = "metrics")]
        Metrics::record(&self.metrics.removes);

        RemoveOutcome::Success
    }

    /// Writes the diagnostic dump, one line per bucket:
    ///
    /// ```text
    /// 0: []
    /// 1: [1-1,0-5,1-9]
    /// ```
    ///
    /// Each entry is `<depth>-<key>`, in ascending key order, where depth is
    /// measured from the bucket's root.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the writer fails.
    pub fn print_to<W: Write>(&self, writer: &mut W) -> crate::Result<()> {
        for (idx, bucket) in self.buckets.iter().enumerate() {
            write!(writer, "{idx}: [")?;
            if let Some(tree) = bucket {
                tree.print(self.ops, writer)?;
            }
            writeln!(writer, "]")?;
        }
        Ok(())
    }

    /// Writes the diagnostic dump to stdout, see [`HashTable::print_to`].
    ///
    /// # Errors
    ///
    /// Will return `Err` if stdout cannot be written to.
    pub fn print(&self) -> crate::Result<()> {
        let mut stdout = std::io::stdout().lock();
        self.print_to(&mut stdout)?;
        stdout.flush()?;
        Ok(())
    }

    /// Releases every stored key and the bucket array.
    ///
    /// This is the same as dropping the table.
    pub fn destroy(self) {
        drop(self);
    }
}

impl<O: KeyOps> Drop for HashTable<'_, O> {
    fn drop(&mut self) {
        log::debug!(
            "Destroying hash table ({} keys in {} buckets)",
            self.len,
            self.buckets.len(),
        );

        for tree in self.buckets.iter_mut().filter_map(Option::take) {
            tree.destroy(self.ops);
        }
    }
}
