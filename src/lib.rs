// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! strontium-kv: transactional key-value storage over RocksDB
//!
//! This crate provides a uniform read/write/iterate contract over an embedded
//! RocksDB instance, with atomic write batches, optimistic transactions,
//! point-in-time snapshots, and a registry that tracks how old the oldest
//! open snapshot is.

pub mod stats;
pub mod storage;
pub mod txn;

pub use stats::{SnapshotId, SnapshotRegistration, SnapshotStatistics};
pub use storage::{
    BlockCache, DurabilityMode, KeyValue, KeyValueReader, ReadResult, Snapshot, SnapshotReader,
    StorageError, Store, StoreOptions, WriteBatch,
};
pub use txn::Transaction;
