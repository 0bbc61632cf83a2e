// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Operational statistics for open snapshots.
//!
//! Long-lived snapshots pin old engine versions and hold back compaction.
//! [`SnapshotStatistics`] keeps every open snapshot ordered by creation time
//! so a metrics collector can ask how stale the oldest one is.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use strontium_kv::stats::{SnapshotId, SnapshotStatistics};
//!
//! let stats = Arc::new(SnapshotStatistics::new());
//! let guard = stats.register(SnapshotId::next());
//! assert!(stats.oldest_snapshot_timestamp().is_some());
//!
//! drop(guard);
//! assert!(stats.oldest_snapshot_timestamp().is_none());
//! print!("{stats}");
//! ```

mod snapshot;

pub use snapshot::{SnapshotId, SnapshotRegistration, SnapshotStatistics, OLDEST_SNAPSHOT_METRIC};
