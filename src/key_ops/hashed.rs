// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use super::KeyOps;
use crate::hash::mask;
use rustc_hash::FxBuildHasher;
use std::cmp::Ordering;
use std::fmt::Display;
use std::hash::{BuildHasher, Hash};
use std::io::Write;
use std::marker::PhantomData;

/// Key operations for any key that already implements the standard traits
///
/// Hashing goes through a [`BuildHasher`] (`FxBuildHasher` by default),
/// ordering through [`Ord`], copying through [`Clone`] and printing through
/// [`Display`].
pub struct HashedKeyOps<K, S = FxBuildHasher> {
    build_hasher: S,
    _key: PhantomData<fn(&K)>,
}

impl<K> Default for HashedKeyOps<K, FxBuildHasher> {
    fn default() -> Self {
        Self::with_hasher(FxBuildHasher)
    }
}

impl<K> HashedKeyOps<K, FxBuildHasher> {
    /// Creates key operations hashing with `FxHash`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<K, S> HashedKeyOps<K, S> {
    /// Creates key operations hashing with the given hasher builder.
    ///
    /// The builder must produce the same hash for the same key every time,
    /// so randomly seeded builders need to be created once and reused.
    #[must_use]
    pub fn with_hasher(build_hasher: S) -> Self {
        Self {
            build_hasher,
            _key: PhantomData,
        }
    }
}

impl<K, S> KeyOps for HashedKeyOps<K, S>
where
    K: Hash + Ord + Clone + Display,
    S: BuildHasher,
{
    type Key = K;

    fn hash(&self, key: &K, bit_width: u8) -> usize {
        mask(self.build_hasher.hash_one(key), bit_width)
    }

    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }

    fn clone_key(&self, key: &K) -> K {
        key.clone()
    }

    fn print_key(&self, key: &K, writer: &mut dyn Write) -> std::io::Result<()> {
        write!(writer, "{key}")
    }
}
