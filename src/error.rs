// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

/// Represents errors that can occur in the hash table
#[derive(Debug)]
pub enum Error {
    /// I/O error while writing the table dump
    Io(std::io::Error),

    /// Bucket bit width outside of `1..=MAX_HASH_BIT_WIDTH`
    InvalidBitWidth(u8),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HashTableError: {self:?}")
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::InvalidBitWidth(_) => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Hash table result
pub type Result<T> = std::result::Result<T, Error>;
