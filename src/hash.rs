// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

pub fn hash64(bytes: &[u8]) -> u64 {
    xxhash_rust::xxh3::xxh3_64(bytes)
}

/// Keeps the lowest `bit_width` bits of a hash, yielding a bucket index.
pub fn mask(hash: u64, bit_width: u8) -> usize {
    debug_assert!(bit_width > 0 && u32::from(bit_width) < u64::BITS);

    // NOTE: bit_width <= MAX_HASH_BIT_WIDTH, so the index always fits
    #[allow(clippy::cast_possible_truncation)]
    let index = (hash & ((1u64 << bit_width) - 1)) as usize;

    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn hash_mask_range() {
        for bit_width in 1..=16 {
            for x in 0..1_000u64 {
                let idx = mask(hash64(&x.to_be_bytes()), bit_width);
                assert!(idx < (1 << bit_width));
            }
        }
    }

    #[test]
    fn hash_mask_keeps_low_bits() {
        assert_eq!(0b101, mask(0b1111_0101, 3));
        assert_eq!(1, mask(u64::MAX, 1));
        assert_eq!(0, mask(0, 31));
    }
}
