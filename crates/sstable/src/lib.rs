//! # SSTable — Sorted String Table
//!
//! An immutable, on-disk sorted table of key/value records, with a dense
//! index of (key, byte-offset) pairs and a trailing [`bloom::BloomFilter`]
//! membership filter. The tree controller flushes a [`memtable::Memtable`]
//! to one of these on overflow, and merges tables together during
//! compaction; once written, an SSTable's data region is never modified.
//!
//! ## File layout (all integers little-endian)
//!
//! ```text
//! [ record ]*                                  ← data region, sorted
//!   record := u32 key_len | key_bytes | u32 value_len | value_bytes
//! [ u32 index_count ]
//! [ u32 key_len | key_bytes | u64 offset ]{index_count}
//! [ u32 index_region_size ]                    ← bytes from index_count through last entry, inclusive
//! [ u32 filter_m | u32 filter_k | filter_bits ]← filter_bits has ceil(m/8) bytes
//! ```
//!
//! `offset` is measured from the start of the file to the start of the
//! corresponding record. The trailing filter's `m`/`k` are fixed per tree
//! (the same values are passed to every [`SSTable::build`]/[`SSTable::open`]
//! call), which is what lets [`SSTable::open`] locate the filter — and from
//! there the index — by seeking backward from the end of the file without
//! reading the whole table forward first.
//!
//! Per the concurrency model, no file handle is held between calls: `open`
//! reads the trailer and index into memory and then closes the file; `get`
//! and `range` open the file fresh for each data read and let it drop at the
//! end of the call.

mod build;
mod error;
mod read;

pub use error::SstError;

use bloom::BloomFilter;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// An immutable on-disk sorted table, or a handle to one that does not (yet,
/// or any longer) exist on disk.
///
/// A missing backing file is a first-class state, not an error: per the
/// construction/loading contract, opening a path with nothing at it yields
/// an SSTable that behaves as empty for every read, and [`cleanup`] puts a
/// previously-populated table back into that same state.
///
/// [`cleanup`]: SSTable::cleanup
pub struct SSTable {
    path: PathBuf,
    index: BTreeMap<Vec<u8>, u64>,
    filter: Option<BloomFilter>,
}

impl SSTable {
    /// The path this table's file lives (or would live) at.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `true` if this handle currently describes an absent table
    /// (no backing file, or [`cleanup`](Self::cleanup) has been called).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filter.is_none()
    }

    /// Number of records in the index, `0` for an absent table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Current on-disk size in bytes, or `0` if the table is absent.
    #[must_use]
    pub fn size_bytes(&self) -> u64 {
        std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
    }

    /// Moves the backing file to `new_path` and updates this handle to track
    /// it there, without re-reading the index or filter. For callers that
    /// build to a temporary path and only want to commit to the final name
    /// once the build has succeeded.
    pub fn rename(&mut self, new_path: &Path) -> Result<(), SstError> {
        std::fs::rename(&self.path, new_path)?;
        self.path = new_path.to_path_buf();
        Ok(())
    }

    /// Deletes the backing file. Subsequent reads behave as if the table had
    /// never been built. Safe to call on an already-absent table.
    pub fn cleanup(&mut self) -> Result<(), SstError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        self.index.clear();
        self.filter = None;
        tracing::debug!(path = %self.path.display(), "sstable cleaned up");
        Ok(())
    }
}

fn ceil_div(a: u32, b: u32) -> u32 {
    (a + b - 1) / b
}

#[cfg(test)]
#[path = "tests/build_tests.rs"]
mod build_tests;

#[cfg(test)]
#[path = "tests/read_tests.rs"]
mod read_tests;
