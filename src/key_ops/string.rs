// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use super::KeyOps;
use crate::hash::{hash64, mask};
use std::cmp::Ordering;
use std::io::Write;

/// Key operations for `String` keys
///
/// Keys are hashed with XXH3 over their UTF-8 bytes and ordered byte-wise.
#[derive(Copy, Clone, Debug, Default)]
pub struct StrKeyOps;

impl KeyOps for StrKeyOps {
    type Key = String;

    fn hash(&self, key: &String, bit_width: u8) -> usize {
        mask(hash64(key.as_bytes()), bit_width)
    }

    fn compare(&self, a: &String, b: &String) -> Ordering {
        a.as_bytes().cmp(b.as_bytes())
    }

    fn clone_key(&self, key: &String) -> String {
        key.clone()
    }

    fn print_key(&self, key: &String, writer: &mut dyn Write) -> std::io::Result<()> {
        writer.write_all(key.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn str_key_ops_hash_is_stable() {
        let ops = StrKeyOps;
        let key = String::from("hello");

        for bit_width in 1..=12 {
            let idx = ops.hash(&key, bit_width);
            assert_eq!(idx, ops.hash(&key.clone(), bit_width));
            assert!(idx < (1 << bit_width));
        }
    }

    #[test]
    fn str_key_ops_compare_bytewise() {
        let ops = StrKeyOps;

        assert_eq!(Ordering::Less, ops.compare(&"B".into(), &"a".into()));
        assert_eq!(Ordering::Less, ops.compare(&"ab".into(), &"abc".into()));
        assert_eq!(Ordering::Equal, ops.compare(&"abc".into(), &"abc".into()));
    }
}
