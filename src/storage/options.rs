// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Configuration for opening a [`Store`](super::Store).

use std::fmt;
use std::sync::Arc;

use rocksdb::{BlockBasedOptions, Cache, Options, WriteOptions};

use crate::stats::SnapshotStatistics;

/// Block cache capacity used when none is configured.
pub const DEFAULT_BLOCK_CACHE_BYTES: usize = 1 << 30; // 1GB

/// Durability mode for write operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DurabilityMode {
    /// Writes go to the WAL but are not fsynced.
    /// Durable against process crashes but not power failures.
    #[default]
    WalOnly,
    /// Every write, batch commit and transaction commit is fsynced.
    FsyncEveryWrite,
}

impl DurabilityMode {
    pub(crate) fn write_options(self) -> WriteOptions {
        let mut opts = WriteOptions::default();
        opts.set_sync(self == DurabilityMode::FsyncEveryWrite);
        opts
    }
}

/// Block cache configuration.
#[derive(Clone)]
pub enum BlockCache {
    /// No block cache; every block read goes to the filesystem.
    Disabled,
    /// A private LRU cache of the given capacity in bytes.
    Capacity(usize),
    /// A cache shared with other stores.
    Shared(Cache),
}

impl BlockCache {
    /// Creates an LRU cache that can be handed to several stores.
    pub fn lru(capacity: usize) -> Self {
        BlockCache::Shared(Cache::new_lru_cache(capacity))
    }

    fn apply(&self, table_opts: &mut BlockBasedOptions) {
        match self {
            BlockCache::Disabled | BlockCache::Capacity(0) => table_opts.disable_cache(),
            BlockCache::Capacity(capacity) => {
                table_opts.set_block_cache(&Cache::new_lru_cache(*capacity));
            }
            BlockCache::Shared(cache) => table_opts.set_block_cache(cache),
        }
    }
}

impl Default for BlockCache {
    fn default() -> Self {
        BlockCache::Capacity(DEFAULT_BLOCK_CACHE_BYTES)
    }
}

impl fmt::Debug for BlockCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockCache::Disabled => f.write_str("Disabled"),
            BlockCache::Capacity(capacity) => f.debug_tuple("Capacity").field(capacity).finish(),
            BlockCache::Shared(cache) => f
                .debug_struct("Shared")
                .field("usage", &cache.get_usage())
                .finish(),
        }
    }
}

/// Options for [`Store::open`](super::Store::open).
#[derive(Debug, Clone, Default)]
pub struct StoreOptions {
    /// Block cache setup.
    pub block_cache: BlockCache,
    /// Collect engine statistics, readable through `Store::statistics`.
    pub enable_statistics: bool,
    /// Registry notified whenever a snapshot opens or closes.
    pub snapshot_statistics: Option<Arc<SnapshotStatistics>>,
    /// Durability of writes and commits.
    pub durability: DurabilityMode,
}

impl StoreOptions {
    /// Sets the block cache capacity in bytes. Zero disables caching.
    pub fn with_cache_capacity(mut self, bytes: usize) -> Self {
        self.block_cache = if bytes == 0 {
            BlockCache::Disabled
        } else {
            BlockCache::Capacity(bytes)
        };
        self
    }

    /// Disables the block cache.
    pub fn without_block_cache(mut self) -> Self {
        self.block_cache = BlockCache::Disabled;
        self
    }

    /// Uses a cache shared with other stores.
    pub fn with_shared_cache(mut self, cache: Cache) -> Self {
        self.block_cache = BlockCache::Shared(cache);
        self
    }

    /// Enables engine statistics collection.
    pub fn with_statistics(mut self) -> Self {
        self.enable_statistics = true;
        self
    }

    /// Reports snapshot lifetimes to `stats`.
    pub fn with_snapshot_statistics(mut self, stats: Arc<SnapshotStatistics>) -> Self {
        self.snapshot_statistics = Some(stats);
        self
    }

    /// Sets the durability mode.
    pub fn with_durability(mut self, durability: DurabilityMode) -> Self {
        self.durability = durability;
        self
    }

    /// Builds the engine options.
    pub(crate) fn engine_options(&self) -> Options {
        let mut opts = Options::default();
        opts.create_if_missing(true);

        let mut table_opts = BlockBasedOptions::default();
        self.block_cache.apply(&mut table_opts);
        table_opts.set_bloom_filter(10.0, false);
        opts.set_block_based_table_factory(&table_opts);

        // Most lookups hit existing keys; skip filters on the last level.
        opts.set_optimize_filters_for_hits(true);
        opts.set_use_direct_reads(false);
        opts.set_max_background_jobs(6); // 4 compactions + 2 flushes
        opts.set_bytes_per_sync(0);
        opts.set_writable_file_max_buffer_size(0);

        opts.set_max_log_file_size(100 << 20);
        opts.set_keep_log_file_num(1);

        if self.enable_statistics {
            opts.enable_statistics();
        }
        opts
    }
}
