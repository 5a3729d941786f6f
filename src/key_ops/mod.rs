// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

mod hashed;
mod integer;
mod string;

pub use hashed::HashedKeyOps;
pub use integer::IntegerKeyOps;
pub use string::StrKeyOps;

use std::cmp::Ordering;
use std::io::Write;

/// Caller-supplied key operations
///
/// The table never inspects keys itself; hashing, ordering, copying,
/// releasing and printing are all delegated to an implementation of this
/// trait, which is borrowed by the table for its whole lifetime.
pub trait KeyOps {
    /// Key type stored in the table
    type Key;

    /// Maps a key to a bucket index in `[0, 2^bit_width)`.
    ///
    /// Must be deterministic and only depend on the key contents.
    fn hash(&self, key: &Self::Key, bit_width: u8) -> usize;

    /// Total order over keys.
    ///
    /// Two keys that compare [`Ordering::Equal`] are the same key as far as
    /// the table is concerned.
    fn compare(&self, a: &Self::Key, b: &Self::Key) -> Ordering;

    /// Creates an owned copy of a key; the table owns every copy it creates.
    fn clone_key(&self, key: &Self::Key) -> Self::Key;

    /// Releases a key previously produced by [`KeyOps::clone_key`].
    fn destroy_key(&self, key: Self::Key) {
        drop(key);
    }

    /// Writes a human-readable representation of the key.
    ///
    /// Only used by the diagnostic dump.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the writer fails.
    fn print_key(&self, key: &Self::Key, writer: &mut dyn Write) -> std::io::Result<()>;
}

impl<O: KeyOps + ?Sized> KeyOps for &O {
    type Key = O::Key;

    fn hash(&self, key: &Self::Key, bit_width: u8) -> usize {
        (**self).hash(key, bit_width)
    }

    fn compare(&self, a: &Self::Key, b: &Self::Key) -> Ordering {
        (**self).compare(a, b)
    }

    fn clone_key(&self, key: &Self::Key) -> Self::Key {
        (**self).clone_key(key)
    }

    fn destroy_key(&self, key: Self::Key) {
        (**self).destroy_key(key);
    }

    fn print_key(&self, key: &Self::Key, writer: &mut dyn Write) -> std::io::Result<()> {
        (**self).print_key(key, writer)
    }
}
