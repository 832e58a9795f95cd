//! # Memtable
//!
//! The in-memory, ordered write buffer for the LSM tree.
//!
//! Every write lands in the memtable first. Once it holds `memtable_limit`
//! entries the tree controller flushes it to an immutable SSTable on disk and
//! starts a fresh one. There is no durability story here — the memtable is
//! pure in-memory state, and the one non-goal around crash safety (no
//! write-ahead log) means its contents are simply lost on process exit before
//! the next flush.
//!
//! ## Key properties
//! - **Sorted order**: entries are always in ascending key order (required
//!   for SSTable construction on flush).
//! - **No duplicate keys**: a `put` for an existing key replaces its value.
//! - **Entry-count sizing**: the tree controller compares [`len`](Memtable::len)
//!   against its configured limit to decide when to flush.
//!
//! ## Example
//! ```rust
//! use memtable::Memtable;
//!
//! let mut m = Memtable::new();
//! m.put(b"hello".to_vec(), b"world".to_vec());
//! assert_eq!(m.get(b"hello"), Some(b"world".as_slice()));
//! ```

use std::collections::BTreeMap;

/// An ordered, in-memory write buffer backed by a `BTreeMap`.
///
/// The tree controller decides when the memtable has grown too large (by
/// comparing [`len`](Memtable::len) against its configured limit) and when to
/// flush and clear it; the memtable itself enforces no bound.
#[derive(Debug, Default)]
pub struct Memtable {
    map: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl Memtable {
    /// Creates a new, empty memtable.
    pub fn new() -> Self {
        Self {
            map: BTreeMap::new(),
        }
    }

    /// Inserts a key-value pair, overwriting any prior value for `key`.
    pub fn put(&mut self, key: Vec<u8>, value: Vec<u8>) {
        self.map.insert(key, value);
    }

    /// Returns the current value for `key`, if present.
    pub fn get(&self, key: &[u8]) -> Option<&[u8]> {
        self.map.get(key).map(|v| v.as_slice())
    }

    /// Returns `true` if the memtable contains the given key.
    #[must_use]
    pub fn contains_key(&self, key: &[u8]) -> bool {
        self.map.contains_key(key)
    }

    /// Returns an iterator over all entries in **ascending key order**.
    pub fn iter(&self) -> impl Iterator<Item = (&[u8], &[u8])> {
        self.map.iter().map(|(k, v)| (k.as_slice(), v.as_slice()))
    }

    /// Returns an iterator over entries with `start <= key <= end`.
    ///
    /// An empty `start` means "no lower bound"; an empty `end` means "no
    /// upper bound" — keys can legitimately be empty byte strings, so this is
    /// a convention rather than a literal match on `b""`.
    pub fn iter_range<'a>(
        &'a self,
        start: &'a [u8],
        end: &'a [u8],
    ) -> impl Iterator<Item = (&'a [u8], &'a [u8])> + 'a {
        self.iter()
            .filter(move |(k, _)| (start.is_empty() || *k >= start) && (end.is_empty() || *k <= end))
    }

    /// Returns the number of entries currently buffered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if the memtable holds zero entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Removes all entries, resetting the memtable to empty.
    pub fn clear(&mut self) {
        self.map.clear();
    }
}
