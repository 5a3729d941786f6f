// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

//! A fixed-bucket hash set whose collision chains are binary search trees.
//!
//! ##### About
//!
//! This crate exports a [`HashTable`] that stores a set of keys in `2^w`
//! buckets, where `w` (the hash bit width) is chosen at creation and never
//! changes. Keys that hash to the same bucket are kept in an unbalanced
//! binary search tree instead of a linked list, so a crowded bucket is
//! searched in `O(depth)` comparisons.
//!
//! The table knows nothing about its key type. Hashing, ordering, copying,
//! releasing and printing keys is delegated to a [`KeyOps`] implementation
//! that the table borrows for its lifetime. Stock implementations exist for
//! integers ([`IntegerKeyOps`]), strings ([`StrKeyOps`]) and anything that
//! implements the standard traits ([`HashedKeyOps`]).
//!
//! ```
//! use tree_hashset::{HashTable, InsertOutcome, IntegerKeyOps, RemoveOutcome};
//!
//! let ops = IntegerKeyOps;
//! let mut table = HashTable::new(2, &ops);
//!
//! assert_eq!(InsertOutcome::Success, table.insert(&5));
//! assert_eq!(InsertOutcome::AlreadyStored, table.insert(&5));
//! assert_eq!(RemoveOutcome::NotStored, table.remove(&42));
//!
//! let mut dump = vec![];
//! table.print_to(&mut dump)?;
//! assert_eq!("0: []\n1: [0-5]\n2: []\n3: []\n", String::from_utf8_lossy(&dump));
//! # Ok::<(), tree_hashset::Error>(())
//! ```
//!
//! The table is single-threaded; wrap it in a lock if it has to be shared.

#![deny(clippy::all, missing_docs, clippy::cargo)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::indexing_slicing)]
#![warn(clippy::pedantic, clippy::nursery)]
#![warn(clippy::expect_used)]
#![allow(clippy::missing_const_for_fn)]
#![warn(clippy::multiple_crate_versions)]
#![allow(clippy::option_if_let_else)]
#![warn(clippy::redundant_feature_names)]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

#[doc(hidden)]
pub mod bucket_tree;

/// Configuration
pub mod config;

mod error;
mod hash;
mod hashtable;

/// Key operations
pub mod key_ops;

#[cfg(feature = "metrics")]
pub(crate) mod metrics;

mod outcome;

pub use {
    config::Config,
    error::{Error, Result},
    hashtable::HashTable,
    key_ops::{HashedKeyOps, IntegerKeyOps, KeyOps, StrKeyOps},
    outcome::{InsertOutcome, RemoveOutcome},
};

#[cfg(feature = "metrics")]
pub use metrics::Metrics;
