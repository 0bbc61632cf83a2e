// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Registry of open read snapshots, ordered by age.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Name of the metric reported by the [`SnapshotStatistics`] `Display` impl.
pub const OLDEST_SNAPSHOT_METRIC: &str = "strontium_kv.snapshot.oldest_snapshot_ago.seconds";

static NEXT_SNAPSHOT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of an engine snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SnapshotId(pub u64);

impl SnapshotId {
    /// Allocates a fresh identifier, never reused within the process.
    #[inline]
    pub fn next() -> Self {
        Self(NEXT_SNAPSHOT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "snap-{}", self.0)
    }
}

#[derive(Debug, Default)]
struct Registry {
    by_id: HashMap<SnapshotId, Instant>,
    by_age: BTreeSet<(Instant, SnapshotId)>,
}

/// Tracks the creation time of every open snapshot.
///
/// Shared between stores through an `Arc`; all operations take one short
/// lock and are O(log n) in the number of open snapshots. Registering the
/// same identity twice, or ending one that was never registered, is a
/// bookkeeping bug and panics.
#[derive(Debug, Default)]
pub struct SnapshotStatistics {
    inner: Mutex<Registry>,
}

impl SnapshotStatistics {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `id` as opened now and returns the recorded time.
    ///
    /// # Panics
    ///
    /// Panics if `id` is already registered.
    pub fn begin_snapshot(&self, id: SnapshotId) -> Instant {
        let now = Instant::now();
        self.begin_snapshot_at(id, now);
        now
    }

    /// Records `id` as opened at `opened_at`.
    ///
    /// # Panics
    ///
    /// Panics if `id` is already registered.
    pub fn begin_snapshot_at(&self, id: SnapshotId, opened_at: Instant) {
        let mut registry = self.inner.lock();
        assert!(
            registry.by_id.insert(id, opened_at).is_none(),
            "snapshot {id} registered twice"
        );
        let inserted = registry.by_age.insert((opened_at, id));
        debug_assert!(inserted, "age index out of sync for {id}");
    }

    /// Removes `id` from the registry.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not registered.
    pub fn end_snapshot(&self, id: SnapshotId) {
        let mut registry = self.inner.lock();
        let Some(opened_at) = registry.by_id.remove(&id) else {
            panic!("snapshot {id} ended but never registered");
        };
        assert!(
            registry.by_age.remove(&(opened_at, id)),
            "age index out of sync for {id}"
        );
    }

    /// Registers `id` and returns a guard that ends it when dropped.
    pub fn register(self: &Arc<Self>, id: SnapshotId) -> SnapshotRegistration {
        let opened_at = self.begin_snapshot(id);
        SnapshotRegistration {
            stats: Arc::clone(self),
            id,
            opened_at,
        }
    }

    /// Creation time of the oldest open snapshot, `None` when none is open.
    pub fn oldest_snapshot_timestamp(&self) -> Option<Instant> {
        self.inner
            .lock()
            .by_age
            .first()
            .map(|(opened_at, _)| *opened_at)
    }

    /// Age of the oldest open snapshot.
    pub fn oldest_snapshot_age(&self) -> Option<Duration> {
        self.oldest_snapshot_timestamp()
            .map(|opened_at| opened_at.elapsed())
    }

    /// Number of currently open snapshots.
    pub fn open_snapshots(&self) -> usize {
        self.inner.lock().by_id.len()
    }
}

impl fmt::Display for SnapshotStatistics {
    /// Renders `<metric> : <seconds>\n`, reporting `-1` when nothing is open.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.oldest_snapshot_age() {
            Some(age) => writeln!(f, "{OLDEST_SNAPSHOT_METRIC} : {}", age.as_secs_f64()),
            None => writeln!(f, "{OLDEST_SNAPSHOT_METRIC} : -1"),
        }
    }
}

/// Scoped registration in a [`SnapshotStatistics`] registry.
///
/// The snapshot is deregistered when this guard drops.
#[derive(Debug)]
pub struct SnapshotRegistration {
    stats: Arc<SnapshotStatistics>,
    id: SnapshotId,
    opened_at: Instant,
}

impl SnapshotRegistration {
    /// Returns the registered identity.
    #[inline]
    pub fn id(&self) -> SnapshotId {
        self.id
    }

    /// Returns the time the registration was recorded.
    #[inline]
    pub fn opened_at(&self) -> Instant {
        self.opened_at
    }
}

impl Drop for SnapshotRegistration {
    fn drop(&mut self) {
        self.stats.end_snapshot(self.id);
    }
}
