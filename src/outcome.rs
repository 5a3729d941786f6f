// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

/// Result of [`HashTable::insert`](crate::HashTable::insert)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[must_use]
pub enum InsertOutcome {
    /// The key was cloned into the table
    Success,

    /// An equal key was already stored, nothing was changed
    AlreadyStored,
}

impl InsertOutcome {
    /// Returns `true` if the key was added.
    #[must_use]
    pub fn is_success(self) -> bool {
        self == Self::Success
    }
}

/// Result of [`HashTable::remove`](crate::HashTable::remove)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[must_use]
pub enum RemoveOutcome {
    /// The stored key was released
    Success,

    /// No equal key was stored, nothing was changed
    NotStored,
}

impl RemoveOutcome {
    /// Returns `true` if the key was removed.
    #[must_use]
    pub fn is_success(self) -> bool {
        self == Self::Success
    }
}
