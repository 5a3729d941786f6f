// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering::Relaxed;

/// Operation counters of a hash table
#[derive(Debug, Default)]
pub struct Metrics {
    /// Number of keys that were cloned into the table
    pub(crate) inserts: AtomicUsize,

    /// Number of inserts that found an equal key already stored
    pub(crate) duplicate_inserts: AtomicUsize,

    /// Number of keys that were removed
    pub(crate) removes: AtomicUsize,

    /// Number of removes that found no equal key
    pub(crate) missed_removes: AtomicUsize,

    /// Number of bucket trees that were lazily created
    pub(crate) buckets_created: AtomicUsize,
}

#[allow(clippy::cast_precision_loss)]
impl Metrics {
    /// Number of keys that were cloned into the table.
    #[must_use]
    pub fn inserts(&self) -> usize {
        self.inserts.load(Relaxed)
    }

    /// Number of inserts that were rejected as duplicates.
    #[must_use]
    pub fn duplicate_inserts(&self) -> usize {
        self.duplicate_inserts.load(Relaxed)
    }

    /// Number of keys that were removed.
    #[must_use]
    pub fn removes(&self) -> usize {
        self.removes.load(Relaxed)
    }

    /// Number of removes of keys that were not stored.
    #[must_use]
    pub fn missed_removes(&self) -> usize {
        self.missed_removes.load(Relaxed)
    }

    /// Number of bucket trees that were created.
    #[must_use]
    pub fn buckets_created(&self) -> usize {
        self.buckets_created.load(Relaxed)
    }

    /// Share of insert calls that were duplicates (0.0 - 1.0).
    ///
    /// Returns 0.0 before the first insert.
    #[must_use]
    pub fn duplicate_insert_ratio(&self) -> f64 {
        let duplicates = self.duplicate_inserts();
        let total = self.inserts() + duplicates;

        if total == 0 {
            return 0.0;
        }

        duplicates as f64 / total as f64
    }

    pub(crate) fn record(counter: &AtomicUsize) {
        counter.fetch_add(1, Relaxed);
    }
}
