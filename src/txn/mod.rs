// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Optimistic transactions.
//!
//! Transactions take no locks. Reads and writes proceed freely; at commit
//! the engine checks whether any key in the write set was committed by
//! another writer since the transaction began. If so the commit fails with
//! [`StorageError::Conflict`](crate::storage::StorageError::Conflict) and
//! nothing is applied.
//!
//! # Example
//!
//! ```no_run
//! use strontium_kv::storage::{KeyValue, KeyValueReader, StorageError, Store};
//! use std::path::Path;
//!
//! # fn example() -> Result<(), StorageError> {
//! let mut store = Store::open_default(Path::new("/tmp/txn"))?;
//!
//! loop {
//!     let mut txn = store.begin_transaction();
//!     let next = txn
//!         .get(b"counter")?
//!         .into_option()
//!         .map_or(1, |v| String::from_utf8_lossy(&v).parse::<i64>().unwrap_or(0) + 1);
//!     txn.set(b"counter", next.to_string().as_bytes())?;
//!
//!     match txn.commit() {
//!         Ok(()) => break,
//!         Err(err) if err.is_conflict() => continue,
//!         Err(err) => return Err(err),
//!     }
//! }
//! # Ok(())
//! # }
//! ```

mod transaction;

pub use transaction::Transaction;
