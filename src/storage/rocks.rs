// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! RocksDB-backed store facade.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rocksdb::{
    DBRawIteratorWithThreadMode, OptimisticTransactionOptions, Options, WriteBatchWithTransaction,
    WriteOptions, DB,
};
use tracing::{debug, info};

use crate::stats::SnapshotId;
use crate::txn::Transaction;

use super::{
    scan, Engine, KeyValue, KeyValueReader, ReadResult, Snapshot, SnapshotReader, StorageError,
    StoreOptions, WriteBatch,
};

/// Transactional key-value store over a RocksDB optimistic transaction database.
///
/// A `Store` reads and writes the engine directly. Atomic multi-key writes go
/// through a [`WriteBatch`] or a [`Transaction`], both of which borrow the
/// store mutably: at most one of them can be open on a store at a time, and
/// the store's own write methods are unavailable while one is.
///
/// While a snapshot is active ([`begin_snapshot`](Self::begin_snapshot)) all
/// reads, including those made through an open batch or transaction, observe
/// the engine as it was when the snapshot began.
pub struct Store {
    snapshot: Option<Snapshot>,
    engine: Arc<Engine>,
    engine_opts: Arc<Options>,
    options: StoreOptions,
    write_opts: WriteOptions,
    path: PathBuf,
}

impl Store {
    /// Opens or creates a store at the given path with default options.
    pub fn open_default(path: &Path) -> Result<Self, StorageError> {
        Self::open(path, StoreOptions::default())
    }

    /// Opens or creates a store at the given path.
    pub fn open(path: &Path, options: StoreOptions) -> Result<Self, StorageError> {
        let engine_opts = options.engine_options();
        let engine = Engine::open(&engine_opts, path).map_err(|source| StorageError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        info!(
            path = %path.display(),
            block_cache = ?options.block_cache,
            statistics = options.enable_statistics,
            durability = ?options.durability,
            "Opened store"
        );

        Ok(Self {
            snapshot: None,
            engine: Arc::new(engine),
            engine_opts: Arc::new(engine_opts),
            write_opts: options.durability.write_options(),
            options,
            path: path.to_path_buf(),
        })
    }

    /// Irreversibly deletes all on-disk state at `path`.
    ///
    /// No store may be open on `path`.
    pub fn destroy(path: &Path) -> Result<(), StorageError> {
        DB::destroy(&Options::default(), path)?;
        info!(path = %path.display(), "Destroyed store");
        Ok(())
    }

    /// Creates another writable store on the same engine.
    ///
    /// The new store starts without a snapshot, even if this one has one.
    pub fn share(&self) -> Store {
        Store {
            snapshot: None,
            engine: Arc::clone(&self.engine),
            engine_opts: Arc::clone(&self.engine_opts),
            options: self.options.clone(),
            write_opts: self.options.durability.write_options(),
            path: self.path.clone(),
        }
    }

    /// Returns the path the store was opened at.
    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the options the store was opened with.
    #[inline]
    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    /// Pins all reads on this store to the current engine state.
    ///
    /// If a snapshot is already active it is ended and replaced.
    pub fn begin_snapshot(&mut self) {
        // End the old one first so its registration never overlaps the new one.
        self.end_snapshot();
        self.snapshot = Some(Snapshot::capture(
            &self.engine,
            self.options.snapshot_statistics.as_ref(),
        ));
    }

    /// Unpins reads. Does nothing when no snapshot is active.
    pub fn end_snapshot(&mut self) {
        self.snapshot = None;
    }

    /// Returns the identity of the active snapshot.
    #[inline]
    pub fn active_snapshot(&self) -> Option<SnapshotId> {
        self.snapshot.as_ref().map(Snapshot::id)
    }

    /// Returns a read-only view of the current engine state.
    ///
    /// The reader holds its own snapshot and a share of the engine, so it
    /// stays valid after this store is dropped.
    pub fn snapshot(&self) -> SnapshotReader {
        SnapshotReader::new(Snapshot::capture(
            &self.engine,
            self.options.snapshot_statistics.as_ref(),
        ))
    }

    /// Starts a write batch. Writes are buffered until [`WriteBatch::commit`].
    pub fn begin_write_batch(&mut self) -> WriteBatch<'_> {
        debug!(path = %self.path.display(), "Began write batch");
        WriteBatch::new(self, WriteBatchWithTransaction::default())
    }

    /// Starts an optimistic transaction.
    ///
    /// Commit fails with [`StorageError::Conflict`] if any key the
    /// transaction wrote was committed by someone else after it began.
    pub fn begin_transaction(&mut self) -> Transaction<'_> {
        let this: &Store = self;

        let mut txn_opts = OptimisticTransactionOptions::new();
        txn_opts.set_snapshot(true);
        let txn = this.engine.transaction_opt(&this.write_opts, &txn_opts);
        // Taken after the engine transaction so reads never see older state
        // than the one commit validates against.
        let start = Snapshot::capture(&this.engine, None);

        debug!(path = %this.path.display(), "Began transaction");
        Transaction::new(txn, start, this.snapshot.as_ref())
    }

    /// Flushes memtables to durable storage.
    pub fn flush(&self) -> Result<(), StorageError> {
        self.engine.flush()?;
        Ok(())
    }

    /// Returns the engine's human-readable `rocksdb.stats` report.
    pub fn engine_stats(&self) -> Result<Option<String>, StorageError> {
        Ok(self.engine.property_value("rocksdb.stats")?)
    }

    /// Returns the engine statistics dump, if statistics were enabled at open.
    pub fn statistics(&self) -> Option<String> {
        self.engine_opts.get_statistics()
    }

    pub(crate) fn engine(&self) -> &Arc<Engine> {
        &self.engine
    }

    pub(crate) fn write_options(&self) -> &WriteOptions {
        &self.write_opts
    }

    fn raw_iterator(&self) -> DBRawIteratorWithThreadMode<'_, Engine> {
        match &self.snapshot {
            Some(snapshot) => snapshot.raw_iterator(),
            None => self.engine.raw_iterator(),
        }
    }
}

impl KeyValueReader for Store {
    fn get(&self, key: &[u8]) -> Result<ReadResult, StorageError> {
        match &self.snapshot {
            Some(snapshot) => snapshot.get(key),
            None => Ok(self.engine.get(key)?.into()),
        }
    }

    fn count(&self, prefix: &[u8]) -> Result<usize, StorageError> {
        scan::count_prefix(self.raw_iterator(), prefix)
    }

    fn for_each<F, E>(&self, f: F) -> Result<(), E>
    where
        F: FnMut(&[u8], &[u8]) -> Result<(), E>,
        E: From<StorageError>,
    {
        scan::visit(self.raw_iterator(), None, None, f)
    }

    fn for_each_in_range<F, E>(&self, begin: &[u8], end: &[u8], f: F) -> Result<(), E>
    where
        F: FnMut(&[u8], &[u8]) -> Result<(), E>,
        E: From<StorageError>,
    {
        scan::visit(self.raw_iterator(), Some(begin), Some(end), f)
    }
}

impl KeyValue for Store {
    fn set(&mut self, key: &[u8], value: &[u8]) -> Result<(), StorageError> {
        self.engine.put_opt(key, value, &self.write_opts)?;
        Ok(())
    }

    fn erase(&mut self, key: &[u8]) -> Result<(), StorageError> {
        self.engine.delete_opt(key, &self.write_opts)?;
        Ok(())
    }
}
