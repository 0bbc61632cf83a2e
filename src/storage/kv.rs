// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Key-value traits and read results.

use super::error::StorageError;

/// Result of a point lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadResult {
    /// The key exists with this value.
    Found(Vec<u8>),
    /// The key is absent from the view being read.
    NotFound,
}

impl ReadResult {
    /// Returns true if the key was found.
    #[inline]
    pub fn is_found(&self) -> bool {
        matches!(self, ReadResult::Found(_))
    }

    /// Returns the value, if any.
    #[inline]
    pub fn into_option(self) -> Option<Vec<u8>> {
        match self {
            ReadResult::Found(value) => Some(value),
            ReadResult::NotFound => None,
        }
    }
}

impl From<Option<Vec<u8>>> for ReadResult {
    fn from(value: Option<Vec<u8>>) -> Self {
        match value {
            Some(value) => ReadResult::Found(value),
            None => ReadResult::NotFound,
        }
    }
}

/// Read side of a key-value view.
///
/// Keys and values are raw bytes ordered bytewise ascending. Every scan
/// checks the engine iterator's terminal status, so a scan that failed
/// midway is never reported as one that simply ran out of entries.
pub trait KeyValueReader {
    /// Looks up a single key.
    fn get(&self, key: &[u8]) -> Result<ReadResult, StorageError>;

    /// Counts the keys that start with `prefix`.
    ///
    /// The empty prefix counts every key.
    fn count(&self, prefix: &[u8]) -> Result<usize, StorageError>;

    /// Visits every entry in key order.
    ///
    /// The first error returned by `f` stops the scan and is returned as-is.
    /// Entries already visited are not undone.
    fn for_each<F, E>(&self, f: F) -> Result<(), E>
    where
        F: FnMut(&[u8], &[u8]) -> Result<(), E>,
        E: From<StorageError>;

    /// Visits entries with `begin <= key < end` in key order.
    ///
    /// Visits nothing when `begin >= end`. Callback errors behave as in
    /// [`for_each`](Self::for_each).
    fn for_each_in_range<F, E>(&self, begin: &[u8], end: &[u8], f: F) -> Result<(), E>
    where
        F: FnMut(&[u8], &[u8]) -> Result<(), E>,
        E: From<StorageError>;
}

/// Write side of a key-value view.
pub trait KeyValue: KeyValueReader {
    /// Stores `value` under `key`.
    fn set(&mut self, key: &[u8], value: &[u8]) -> Result<(), StorageError>;

    /// Removes `key`. Erasing an absent key is not an error.
    fn erase(&mut self, key: &[u8]) -> Result<(), StorageError>;
}
