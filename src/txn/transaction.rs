// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Optimistic transaction sessions.

use tracing::{debug, warn};

use crate::storage::{scan, Engine, KeyValue, KeyValueReader, ReadResult, Snapshot, StorageError};

/// An optimistic read-write session on a [`Store`](crate::storage::Store).
///
/// Created by [`Store::begin_transaction`](crate::storage::Store::begin_transaction).
/// Writes are buffered in the transaction and reads see them layered over
/// the committed state at transaction start. No locks are taken; conflicts
/// are detected when [`commit`](Self::commit) validates the write set.
///
/// If the owning store has an active snapshot, reads go to that snapshot
/// instead and do not see the transaction's own writes.
///
/// Dropping the transaction without committing aborts it.
pub struct Transaction<'a> {
    txn: rocksdb::Transaction<'a, Engine>,
    start: Snapshot,
    pinned: Option<&'a Snapshot>,
}

impl<'a> Transaction<'a> {
    pub(crate) fn new(
        txn: rocksdb::Transaction<'a, Engine>,
        start: Snapshot,
        pinned: Option<&'a Snapshot>,
    ) -> Self {
        Self { txn, start, pinned }
    }

    /// Validates and applies the buffered writes.
    ///
    /// Fails with [`StorageError::Conflict`] if another writer committed to a
    /// key in this transaction's write set after it began. On any failure
    /// nothing is applied and the transaction is gone; retry from scratch.
    pub fn commit(self) -> Result<(), StorageError> {
        let age = self.start.age();
        match self.txn.commit() {
            Ok(()) => {
                debug!(age_ms = age.as_millis() as u64, "Committed transaction");
                Ok(())
            }
            Err(err) => {
                let err = StorageError::from(err);
                if err.is_conflict() {
                    warn!(error = %err, age_ms = age.as_millis() as u64, "Transaction conflict");
                }
                Err(err)
            }
        }
    }

    /// Discards the buffered writes. Committed state is untouched.
    pub fn abort(self) {
        debug!(age_ms = self.start.age().as_millis() as u64, "Aborted transaction");
    }
}

impl KeyValueReader for Transaction<'_> {
    fn get(&self, key: &[u8]) -> Result<ReadResult, StorageError> {
        match self.pinned {
            Some(snapshot) => snapshot.get(key),
            None => Ok(self.txn.get_opt(key, &self.start.read_options())?.into()),
        }
    }

    fn count(&self, prefix: &[u8]) -> Result<usize, StorageError> {
        match self.pinned {
            Some(snapshot) => scan::count_prefix(snapshot.raw_iterator(), prefix),
            None => scan::count_prefix(self.txn.raw_iterator_opt(self.start.read_options()), prefix),
        }
    }

    fn for_each<F, E>(&self, f: F) -> Result<(), E>
    where
        F: FnMut(&[u8], &[u8]) -> Result<(), E>,
        E: From<StorageError>,
    {
        match self.pinned {
            Some(snapshot) => scan::visit(snapshot.raw_iterator(), None, None, f),
            None => scan::visit(self.txn.raw_iterator_opt(self.start.read_options()), None, None, f),
        }
    }

    fn for_each_in_range<F, E>(&self, begin: &[u8], end: &[u8], f: F) -> Result<(), E>
    where
        F: FnMut(&[u8], &[u8]) -> Result<(), E>,
        E: From<StorageError>,
    {
        match self.pinned {
            Some(snapshot) => scan::visit(snapshot.raw_iterator(), Some(begin), Some(end), f),
            None => scan::visit(
                self.txn.raw_iterator_opt(self.start.read_options()),
                Some(begin),
                Some(end),
                f,
            ),
        }
    }
}

impl KeyValue for Transaction<'_> {
    fn set(&mut self, key: &[u8], value: &[u8]) -> Result<(), StorageError> {
        self.txn.put(key, value)?;
        Ok(())
    }

    fn erase(&mut self, key: &[u8]) -> Result<(), StorageError> {
        self.txn.delete(key)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Store;
    use tempfile::TempDir;

    fn create_test_store() -> (Store, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = Store::open_default(dir.path()).unwrap();
        (store, dir)
    }

    #[test]
    fn test_commit_applies_writes() {
        let (mut store, _dir) = create_test_store();
        store.set(b"doomed", b"v").unwrap();

        let mut txn = store.begin_transaction();
        txn.set(b"key", b"value").unwrap();
        txn.erase(b"doomed").unwrap();
        txn.commit().unwrap();

        assert_eq!(store.get(b"key").unwrap(), ReadResult::Found(b"value".to_vec()));
        assert_eq!(store.get(b"doomed").unwrap(), ReadResult::NotFound);
    }

    #[test]
    fn test_read_your_writes() {
        let (mut store, _dir) = create_test_store();
        store.set(b"a", b"committed").unwrap();
        store.set(b"c", b"erased-in-txn").unwrap();
        let observer = store.share();

        let mut txn = store.begin_transaction();
        txn.set(b"b", b"pending").unwrap();
        txn.erase(b"c").unwrap();

        assert_eq!(txn.get(b"b").unwrap(), ReadResult::Found(b"pending".to_vec()));
        assert_eq!(txn.get(b"c").unwrap(), ReadResult::NotFound);
        assert_eq!(txn.count(b"").unwrap(), 2);

        let mut seen = Vec::new();
        txn.for_each(|key, value| {
            seen.push((key.to_vec(), value.to_vec()));
            Ok::<_, StorageError>(())
        })
        .unwrap();
        assert_eq!(
            seen,
            vec![
                (b"a".to_vec(), b"committed".to_vec()),
                (b"b".to_vec(), b"pending".to_vec()),
            ]
        );

        // Other readers see nothing until commit.
        assert_eq!(observer.get(b"b").unwrap(), ReadResult::NotFound);
        assert!(observer.get(b"c").unwrap().is_found());

        txn.commit().unwrap();
        assert_eq!(observer.get(b"b").unwrap(), ReadResult::Found(b"pending".to_vec()));
        assert_eq!(observer.get(b"c").unwrap(), ReadResult::NotFound);
    }

    #[test]
    fn test_reads_see_state_at_start() {
        let (mut store, _dir) = create_test_store();
        store.set(b"key", b"old").unwrap();
        let mut writer = store.share();

        let txn = store.begin_transaction();
        writer.set(b"key", b"new").unwrap();
        writer.set(b"other", b"x").unwrap();

        assert_eq!(txn.get(b"key").unwrap(), ReadResult::Found(b"old".to_vec()));
        assert_eq!(txn.count(b"").unwrap(), 1);
        txn.abort();
    }

    #[test]
    fn test_range_in_transaction() {
        let (mut store, _dir) = create_test_store();
        store.set(b"aaa", b"1").unwrap();
        store.set(b"ccc", b"3").unwrap();

        let mut txn = store.begin_transaction();
        txn.set(b"bbb", b"2").unwrap();
        txn.set(b"ddd", b"4").unwrap();

        let mut keys = Vec::new();
        txn.for_each_in_range(b"aab", b"ddd", |key, _| {
            keys.push(key.to_vec());
            Ok::<_, StorageError>(())
        })
        .unwrap();
        assert_eq!(keys, vec![b"bbb".to_vec(), b"ccc".to_vec()]);
        txn.abort();
    }

    #[test]
    fn test_conflict_detected() {
        let (mut store, _dir) = create_test_store();
        let mut other = store.share();

        let mut first = store.begin_transaction();
        let mut second = other.begin_transaction();

        first.set(b"key", b"first").unwrap();
        second.set(b"key", b"second").unwrap();

        first.commit().unwrap();
        let result = second.commit();
        assert!(matches!(result, Err(StorageError::Conflict(_))));

        assert_eq!(store.get(b"key").unwrap(), ReadResult::Found(b"first".to_vec()));
    }

    #[test]
    fn test_conflict_with_direct_write() {
        let (mut store, _dir) = create_test_store();
        store.set(b"key", b"original").unwrap();
        let mut writer = store.share();

        let mut txn = store.begin_transaction();
        txn.set(b"untouched", b"x").unwrap();
        writer.set(b"key", b"direct").unwrap();
        txn.set(b"key", b"txn").unwrap();

        let err = txn.commit().unwrap_err();
        assert!(err.is_conflict());

        // Nothing from the failed transaction was applied.
        assert_eq!(store.get(b"key").unwrap(), ReadResult::Found(b"direct".to_vec()));
        assert_eq!(store.get(b"untouched").unwrap(), ReadResult::NotFound);
    }

    #[test]
    fn test_disjoint_transactions_both_commit() {
        let (mut store, _dir) = create_test_store();
        let mut other = store.share();

        let mut first = store.begin_transaction();
        let mut second = other.begin_transaction();
        first.set(b"a", b"1").unwrap();
        second.set(b"b", b"2").unwrap();

        first.commit().unwrap();
        second.commit().unwrap();

        assert_eq!(store.count(b"").unwrap(), 2);
    }

    #[test]
    fn test_abort_discards() {
        let (mut store, _dir) = create_test_store();
        store.set(b"key", b"original").unwrap();

        let mut txn = store.begin_transaction();
        txn.set(b"key", b"changed").unwrap();
        txn.set(b"new", b"value").unwrap();
        txn.abort();

        assert_eq!(store.get(b"key").unwrap(), ReadResult::Found(b"original".to_vec()));
        assert_eq!(store.get(b"new").unwrap(), ReadResult::NotFound);
    }

    #[test]
    fn test_drop_aborts() {
        let (mut store, _dir) = create_test_store();

        {
            let mut txn = store.begin_transaction();
            txn.set(b"key", b"value").unwrap();
        }

        assert_eq!(store.get(b"key").unwrap(), ReadResult::NotFound);
    }

    #[test]
    fn test_pinned_snapshot_takes_priority() {
        let (mut store, _dir) = create_test_store();
        store.set(b"key", b"pinned").unwrap();
        let mut writer = store.share();

        store.begin_snapshot();
        writer.set(b"key", b"latest").unwrap();

        let mut txn = store.begin_transaction();
        txn.set(b"key", b"own").unwrap();
        assert_eq!(txn.get(b"key").unwrap(), ReadResult::Found(b"pinned".to_vec()));
        assert_eq!(txn.count(b"key").unwrap(), 1);
        txn.abort();
    }
}
