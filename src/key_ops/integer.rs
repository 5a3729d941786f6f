// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use super::KeyOps;
use std::cmp::Ordering;
use std::io::Write;

/// Key operations for `i64` keys
///
/// Hashes by taking the key modulo the bucket count, so consecutive keys
/// land in consecutive buckets. Negative keys wrap around (Euclidean
/// remainder), so `-1` lands in the last bucket.
#[derive(Copy, Clone, Debug, Default)]
pub struct IntegerKeyOps;

impl KeyOps for IntegerKeyOps {
    type Key = i64;

    fn hash(&self, key: &i64, bit_width: u8) -> usize {
        let bucket_count = 1i64 << bit_width;

        // NOTE: rem_euclid is always in [0, bucket_count)
        #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
        let index = key.rem_euclid(bucket_count) as usize;

        index
    }

    fn compare(&self, a: &i64, b: &i64) -> Ordering {
        a.cmp(b)
    }

    fn clone_key(&self, key: &i64) -> i64 {
        *key
    }

    fn print_key(&self, key: &i64, writer: &mut dyn Write) -> std::io::Result<()> {
        write!(writer, "{key}")
    }
}
