// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Transactional key-value storage over RocksDB.
//!
//! This module wraps a RocksDB optimistic transaction database behind one
//! read/write/iterate contract, shared by every kind of view:
//!
//! - [`Store`]: direct reads and writes, optionally pinned to a snapshot
//! - [`WriteBatch`]: buffered writes applied atomically, no conflict detection
//! - [`Transaction`](crate::txn::Transaction): optimistic read-write session
//!   validated at commit
//! - [`SnapshotReader`]: read-only view pinned at a point in time
//!
//! # Key Concepts
//!
//! Keys and values are raw bytes, ordered bytewise ascending. Reads pick
//! their source in priority order: the store's active snapshot, then the
//! open transaction (which sees its own writes), then the committed state.
//!
//! At most one batch or transaction is open on a store at a time. Both
//! borrow the store mutably and are consumed by `commit` or `abort`, so
//! opening a second session, or committing one twice, does not compile.
//!
//! # Example
//!
//! ```no_run
//! use strontium_kv::storage::{KeyValue, KeyValueReader, ReadResult, Store};
//! use std::path::Path;
//!
//! let mut store = Store::open_default(Path::new("/tmp/kv")).unwrap();
//! store.set(b"a", b"1").unwrap();
//!
//! let mut batch = store.begin_write_batch();
//! batch.set(b"b", b"2").unwrap();
//! batch.erase(b"a").unwrap();
//! batch.commit().unwrap();
//!
//! let reader = store.snapshot();
//! store.set(b"b", b"3").unwrap();
//!
//! match reader.get(b"b").unwrap() {
//!     ReadResult::Found(value) => assert_eq!(value, b"2"),
//!     ReadResult::NotFound => unreachable!(),
//! }
//! assert_eq!(store.count(b"").unwrap(), 1);
//! ```

mod batch;
mod error;
mod kv;
mod options;
mod rocks;
pub(crate) mod scan;
mod snapshot;

use rocksdb::{MultiThreaded, OptimisticTransactionDB};

pub use batch::WriteBatch;
pub use error::StorageError;
pub use kv::{KeyValue, KeyValueReader, ReadResult};
pub use options::{BlockCache, DurabilityMode, StoreOptions, DEFAULT_BLOCK_CACHE_BYTES};
pub use rocks::Store;
pub use snapshot::{Snapshot, SnapshotReader};

/// The engine every store, snapshot and session shares.
pub(crate) type Engine = OptimisticTransactionDB<MultiThreaded>;
