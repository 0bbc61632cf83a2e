// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Ordered scans over raw engine iterators.
//!
//! Shared by every view (store, snapshot, batch, transaction) so prefix and
//! range semantics stay identical whichever engine object backs the iterator.

use rocksdb::{DBAccess, DBRawIteratorWithThreadMode};

use super::StorageError;

/// Counts keys starting with `prefix`, scanning forward from `prefix`.
pub(crate) fn count_prefix<D: DBAccess>(
    mut iter: DBRawIteratorWithThreadMode<'_, D>,
    prefix: &[u8],
) -> Result<usize, StorageError> {
    let mut count = 0;
    iter.seek(prefix);
    while let Some(key) = iter.key() {
        // Keys sharing the prefix are contiguous in bytewise order.
        if !key.starts_with(prefix) {
            break;
        }
        count += 1;
        iter.next();
    }
    iter.status()?;
    Ok(count)
}

/// Feeds entries to `f` in key order, from `begin` (or the first key) and
/// stopping before the first key `>= end` (or at the last key).
pub(crate) fn visit<D, F, E>(
    mut iter: DBRawIteratorWithThreadMode<'_, D>,
    begin: Option<&[u8]>,
    end: Option<&[u8]>,
    mut f: F,
) -> Result<(), E>
where
    D: DBAccess,
    F: FnMut(&[u8], &[u8]) -> Result<(), E>,
    E: From<StorageError>,
{
    match begin {
        Some(begin) => iter.seek(begin),
        None => iter.seek_to_first(),
    }

    while let Some((key, value)) = iter.item() {
        if end.is_some_and(|end| key >= end) {
            break;
        }
        f(key, value)?;
        iter.next();
    }

    iter.status().map_err(StorageError::from)?;
    Ok(())
}
