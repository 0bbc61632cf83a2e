// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Storage error types.

use std::path::PathBuf;

use rocksdb::ErrorKind;

/// Errors that can occur in storage operations.
///
/// A lookup miss is not an error; see [`ReadResult::NotFound`](super::ReadResult).
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to open store at {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: rocksdb::Error,
    },

    #[error("transaction conflict: {0}")]
    Conflict(String),

    #[error("storage corruption: {0}")]
    Corruption(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("rocksdb error: {0}")]
    RocksDb(rocksdb::Error),
}

impl StorageError {
    /// Returns true if an optimistic transaction failed validation.
    ///
    /// The transaction was discarded; callers retry from scratch.
    #[inline]
    pub fn is_conflict(&self) -> bool {
        matches!(self, StorageError::Conflict(_))
    }

    /// Returns true if the engine reported on-disk corruption.
    #[inline]
    pub fn is_corruption(&self) -> bool {
        matches!(self, StorageError::Corruption(_))
    }
}

impl From<rocksdb::Error> for StorageError {
    fn from(err: rocksdb::Error) -> Self {
        match err.kind() {
            // Optimistic validation reports a write-write conflict as Busy,
            // and TryAgain when the memtable history is too short to check.
            ErrorKind::Busy | ErrorKind::TryAgain => StorageError::Conflict(err.into_string()),
            ErrorKind::Corruption => StorageError::Corruption(err.into_string()),
            _ => StorageError::RocksDb(err),
        }
    }
}
