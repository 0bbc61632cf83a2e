// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Point-in-time snapshots and the read-only facade built on them.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use rocksdb::{DBRawIteratorWithThreadMode, ReadOptions, SnapshotWithThreadMode};
use tracing::debug;

use crate::stats::{SnapshotId, SnapshotRegistration, SnapshotStatistics};

use super::{scan, Engine, KeyValueReader, ReadResult, StorageError};

/// An engine snapshot that owns a share of the engine it was taken from.
///
/// Reads through a snapshot see the engine exactly as it was when the
/// snapshot was created. Dropping it releases the engine snapshot and ends
/// its statistics registration.
pub struct Snapshot {
    // Drop order matters: the engine snapshot goes before the engine handle.
    view: SnapshotWithThreadMode<'static, Engine>,
    registration: Option<SnapshotRegistration>,
    id: SnapshotId,
    created_at: Instant,
    engine: Arc<Engine>,
}

impl Snapshot {
    /// Takes a snapshot of `engine`, registering it with `stats` if given.
    pub(crate) fn capture(engine: &Arc<Engine>, stats: Option<&Arc<SnapshotStatistics>>) -> Self {
        let engine = Arc::clone(engine);
        let view = engine.snapshot();
        // SAFETY: `view` borrows the engine inside the `Arc` allocation, which
        // never moves. The snapshot keeps its own clone of that `Arc` and the
        // `view` field is dropped before it, so the borrow cannot dangle.
        let view = unsafe {
            std::mem::transmute::<
                SnapshotWithThreadMode<'_, Engine>,
                SnapshotWithThreadMode<'static, Engine>,
            >(view)
        };

        let id = SnapshotId::next();
        let registration = stats.map(|stats| stats.register(id));
        debug!(snapshot = %id, registered = registration.is_some(), "Began snapshot");

        Self {
            view,
            registration,
            id,
            created_at: Instant::now(),
            engine,
        }
    }

    /// Returns the snapshot identity.
    #[inline]
    pub fn id(&self) -> SnapshotId {
        self.id
    }

    /// Returns how long ago the snapshot was taken.
    #[inline]
    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }

    /// Returns true if the snapshot is tracked by a statistics registry.
    #[inline]
    pub fn is_registered(&self) -> bool {
        self.registration.is_some()
    }

    /// Read options pinned to this snapshot.
    pub(crate) fn read_options(&self) -> ReadOptions {
        let mut opts = ReadOptions::default();
        opts.set_snapshot(&self.view);
        opts
    }

    pub(crate) fn raw_iterator(&self) -> DBRawIteratorWithThreadMode<'_, Engine> {
        self.engine.raw_iterator_opt(self.read_options())
    }
}

impl Drop for Snapshot {
    fn drop(&mut self) {
        debug!(snapshot = %self.id, age_ms = self.age().as_millis() as u64, "Ended snapshot");
    }
}

impl fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snapshot")
            .field("id", &self.id)
            .field("age", &self.age())
            .field("registered", &self.is_registered())
            .finish()
    }
}

impl KeyValueReader for Snapshot {
    fn get(&self, key: &[u8]) -> Result<ReadResult, StorageError> {
        Ok(self.engine.get_opt(key, &self.read_options())?.into())
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

/// Read-only view of a store, pinned at the moment it was created.
///
/// Produced by [`Store::snapshot`](super::Store::snapshot). It shares the
/// engine with the store that created it but outlives it independently, and
/// it exposes no write methods.
#[derive(Debug)]
pub struct SnapshotReader {
    snapshot: Snapshot,
}

impl SnapshotReader {
    pub(crate) fn new(snapshot: Snapshot) -> Self {
        Self { snapshot }
    }

    /// Returns the underlying snapshot.
    #[inline]
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }
}

impl KeyValueReader for SnapshotReader {
    fn get(&self, key: &[u8]) -> Result<ReadResult, StorageError> {
        self.snapshot.get(key)
    }

    fn count(&self, prefix: &[u8]) -> Result<usize, StorageError> {
        self.snapshot.count(prefix)
    }

    fn for_each<F, E>(&self, f: F) -> Result<(), E>
    where
        F: FnMut(&[u8], &[u8]) -> Result<(), E>,
        E: From<StorageError>,
    {
        self.snapshot.for_each(f)
    }

    fn for_each_in_range<F, E>(&self, begin: &[u8], end: &[u8], f: F) -> Result<(), E>
    where
        F: FnMut(&[u8], &[u8]) -> Result<(), E>,
        E: From<StorageError>,
    {
        self.snapshot.for_each_in_range(begin, end, f)
    }
}
