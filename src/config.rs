// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use crate::{Error, HashTable, KeyOps};

/// Bucket bit width used by [`Config::default`] (16 buckets)
pub const DEFAULT_HASH_BIT_WIDTH: u8 = 4;

/// Largest supported bucket bit width (16M buckets)
///
/// The bucket array is allocated up front, so wider tables would reserve
/// gigabytes of slots before the first insert.
pub const MAX_HASH_BIT_WIDTH: u8 = 24;

/// Hash table configuration
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    /// Number of hash bits, the table has `2^hash_bit_width` buckets
    #[doc(hidden)]
    pub hash_bit_width: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hash_bit_width: DEFAULT_HASH_BIT_WIDTH,
        }
    }
}

impl Config {
    /// Initializes a new config with `2^hash_bit_width` buckets.
    #[must_use]
    pub fn new(hash_bit_width: u8) -> Self {
        Self { hash_bit_width }
    }

    /// Picks the smallest bucket count that is at least `expected_len`,
    /// so that buckets hold about one key each.
    ///
    /// The bucket count is fixed once the table is created, so this is the
    /// only place to plan for the expected load.
    #[must_use]
    pub fn for_expected_len(expected_len: usize) -> Self {
        let bits = expected_len
            .max(2)
            .checked_next_power_of_two()
            .map_or(usize::BITS, usize::trailing_zeros);

        // NOTE: trailing_zeros of a usize is at most 64
        #[allow(clippy::cast_possible_truncation)]
        let bits = (bits as u8).min(MAX_HASH_BIT_WIDTH);

        Self::new(bits)
    }

    /// Sets the number of hash bits.
    ///
    /// Defaults to 4 (16 buckets).
    #[must_use]
    pub fn hash_bit_width(mut self, bits: u8) -> Self {
        self.hash_bit_width = bits;
        self
    }

    /// Number of buckets the table will have.
    ///
    /// Returns `None` if the bit width is out of range.
    #[must_use]
    pub fn bucket_count(&self) -> Option<usize> {
        self.validate().ok().map(|()| 1 << self.hash_bit_width)
    }

    fn validate(&self) -> crate::Result<()> {
        if (1..=MAX_HASH_BIT_WIDTH).contains(&self.hash_bit_width) {
            Ok(())
        } else {
            Err(Error::InvalidBitWidth(self.hash_bit_width))
        }
    }

    /// Creates an empty table using the given key operations.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the bit width is 0 or larger than [`MAX_HASH_BIT_WIDTH`].
    pub fn open<O: KeyOps>(self, ops: &O) -> crate::Result<HashTable<'_, O>> {
        self.validate()?;
        Ok(HashTable::new(self.hash_bit_width, ops))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::IntegerKeyOps;
    use test_log::test;

    #[test]
    fn config_default() {
        assert_eq!(Some(16), Config::default().bucket_count());
    }

    #[test]
    fn config_for_expected_len() {
        assert_eq!(1, Config::for_expected_len(0).hash_bit_width);
        assert_eq!(1, Config::for_expected_len(2).hash_bit_width);
        assert_eq!(2, Config::for_expected_len(3).hash_bit_width);
        assert_eq!(10, Config::for_expected_len(1_000).hash_bit_width);
        assert_eq!(10, Config::for_expected_len(1_024).hash_bit_width);
        assert_eq!(
            MAX_HASH_BIT_WIDTH,
            Config::for_expected_len(1 << 30).hash_bit_width
        );
        assert_eq!(
            MAX_HASH_BIT_WIDTH,
            Config::for_expected_len(usize::MAX).hash_bit_width
        );
    }

    #[test]
    fn config_open_rejects_bit_width() {
        assert!(matches!(
            Config::new(0).open(&IntegerKeyOps),
            Err(Error::InvalidBitWidth(0))
        ));
        assert!(matches!(
            Config::default().hash_bit_width(32).open(&IntegerKeyOps),
            Err(Error::InvalidBitWidth(32))
        ));
        assert_eq!(None, Config::new(0).bucket_count());

        assert!(matches!(
            Config::new(MAX_HASH_BIT_WIDTH + 1).open(&IntegerKeyOps),
            Err(Error::InvalidBitWidth(25))
        ));
        assert_eq!(None, Config::new(31).bucket_count());
        assert_eq!(Some(1 << 24), Config::new(MAX_HASH_BIT_WIDTH).bucket_count());
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn config_open() {
        let table = Config::new(3).open(&IntegerKeyOps).unwrap();
        assert_eq!(8, table.bucket_count());
        assert!(table.is_empty());
    }
}
