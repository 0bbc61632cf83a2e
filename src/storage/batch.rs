// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Write batch sessions.

use rocksdb::WriteBatchWithTransaction;
use tracing::debug;

use super::{KeyValue, KeyValueReader, ReadResult, StorageError, Store};

/// A buffered group of writes applied atomically on commit.
///
/// Created by [`Store::begin_write_batch`]. `set` and `erase` only append to
/// the batch; reads go to the store and do not observe pending writes.
/// Within one batch the last write to a key wins. Dropping the batch without
/// committing discards it.
pub struct WriteBatch<'a> {
    store: &'a Store,
    batch: WriteBatchWithTransaction<true>,
}

impl<'a> WriteBatch<'a> {
    pub(crate) fn new(store: &'a Store, batch: WriteBatchWithTransaction<true>) -> Self {
        Self { store, batch }
    }

    /// Returns the number of pending operations.
    #[inline]
    pub fn len(&self) -> usize {
        self.batch.len()
    }

    /// Returns true if nothing has been written to the batch.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.batch.is_empty()
    }

    /// Applies every pending operation atomically.
    ///
    /// On failure none of them are applied.
    pub fn commit(self) -> Result<(), StorageError> {
        let ops = self.batch.len();
        self.store
            .engine()
            .write_opt(self.batch, self.store.write_options())?;
        debug!(ops, "Committed write batch");
        Ok(())
    }

    /// Discards every pending operation.
    pub fn abort(self) {
        debug!(ops = self.batch.len(), "Aborted write batch");
    }
}

impl KeyValueReader for WriteBatch<'_> {
    fn get(&self, key: &[u8]) -> Result<ReadResult, StorageError> {
        self.store.get(key)
    }

    fn count(&self, prefix: &[u8]) -> Result<usize, StorageError> {
        self.store.count(prefix)
    }

    fn for_each<F, E>(&self, f: F) -> Result<(), E>
    where
        F: FnMut(&[u8], &[u8]) -> Result<(), E>,
        E: From<StorageError>,
    {
        self.store.for_each(f)
    }

    fn for_each_in_range<F, E>(&self, begin: &[u8], end: &[u8], f: F) -> Result<(), E>
    where
        F: FnMut(&[u8], &[u8]) -> Result<(), E>,
        E: From<StorageError>,
    {
        self.store.for_each_in_range(begin, end, f)
    }
}

impl KeyValue for WriteBatch<'_> {
    fn set(&mut self, key: &[u8], value: &[u8]) -> Result<(), StorageError> {
        self.batch.put(key, value);
        Ok(())
    }

    fn erase(&mut self, key: &[u8]) -> Result<(), StorageError> {
        self.batch.delete(key);
        Ok(())
    }
}
