//! # Tree Controller
//!
//! Orchestrates the [`memtable::Memtable`] and the per-level [`sstable::SSTable`]
//! lists into a single embedded key-value store: writes land in the memtable
//! and spill to level 0 on overflow; level 0 overflow triggers a compaction
//! that folds it into level 1; reads merge the memtable and every level,
//! newest write winning.
//!
//! There is no write-ahead log and no manifest — per the concurrency model
//! (see module docs on the data flow) the working directory itself is the
//! only persistent state, and [`Tree::open`] rebuilds its level lists by
//! listing that directory's `l{level}_{seq}.sst` files. This is a discovery
//! convenience, not a durability guarantee: a crash before a memtable flush
//! still loses whatever hadn't been flushed.
//!
//! ## Example
//! ```no_run
//! use tree::{Tree, TreeConfig};
//!
//! let mut t = Tree::open(std::path::Path::new("/tmp/mystore"), TreeConfig::default()).unwrap();
//! t.put(b"hello".to_vec(), b"world".to_vec()).unwrap();
//! assert_eq!(t.get(b"hello").unwrap(), Some(b"world".to_vec()));
//! t.close();
//! ```

mod compaction;
mod error;
mod read;
mod write;

pub use error::TreeError;

use memtable::Memtable;
use sstable::SSTable;
use std::path::{Path, PathBuf};

/// Default number of entries a memtable holds before it is flushed.
pub const DEFAULT_MEMTABLE_LIMIT: usize = 1000;

/// Default level-0 SSTable count that triggers a compaction into level 1.
pub const DEFAULT_L0_TRIGGER: usize = 2;

/// Tunables for a [`Tree`]. Mirrors the constructible, `Default`-implementing
/// config pattern the teacher exposed through named constants and setters.
#[derive(Debug, Clone, Copy)]
pub struct TreeConfig {
    /// Entry count at which the memtable is flushed to a new L0 SSTable.
    pub memtable_limit: usize,
    /// Number of L0 SSTables that triggers `compact(0)`.
    pub l0_trigger: usize,
    /// Membership filter bit count (`m`), shared by every SSTable this tree
    /// builds or opens.
    pub filter_m: u32,
    /// Membership filter hash count (`k`).
    pub filter_k: u32,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            memtable_limit: DEFAULT_MEMTABLE_LIMIT,
            l0_trigger: DEFAULT_L0_TRIGGER,
            filter_m: bloom::DEFAULT_NUM_BITS,
            filter_k: bloom::DEFAULT_NUM_HASHES,
        }
    }
}

/// The embedded LSM store: a memtable plus an ordered list of levels, each
/// holding zero or more [`SSTable`]s, rooted at a directory on disk.
pub struct Tree {
    root: PathBuf,
    config: TreeConfig,
    memtable: Memtable,
    levels: Vec<Vec<SSTable>>,
}

impl Tree {
    /// Opens (creating if necessary) the store rooted at `root`, rebuilding
    /// its level lists from any `l{level}_{seq}.sst` files already present.
    pub fn open(root: &Path, config: TreeConfig) -> Result<Tree, TreeError> {
        std::fs::create_dir_all(root)?;

        let mut by_level: Vec<Vec<(u32, PathBuf)>> = Vec::new();
        for entry in std::fs::read_dir(root)? {
            let entry = entry?;
            let name = entry.file_name();
            let Some((level, seq)) = parse_sst_filename(&name.to_string_lossy()) else {
                continue;
            };
            if by_level.len() <= level {
                by_level.resize_with(level + 1, Vec::new);
            }
            by_level[level].push((seq, entry.path()));
        }

        let mut levels = Vec::with_capacity(by_level.len());
        for mut entries in by_level {
            entries.sort_by_key(|(seq, _)| *seq);
            let mut tables = Vec::with_capacity(entries.len());
            for (_, path) in entries {
                tables.push(SSTable::open(&path, config.filter_m, config.filter_k)?);
            }
            levels.push(tables);
        }

        tracing::debug!(
            root = %root.display(),
            levels = levels.len(),
            "tree opened",
        );

        Ok(Tree {
            root: root.to_path_buf(),
            config,
            memtable: Memtable::new(),
            levels,
        })
    }

    /// Consumes the tree. There is nothing to flush or release beyond
    /// dropping in-memory state: operations already open and close file
    /// handles per call, and there is no WAL to sync.
    pub fn close(self) {}

    fn ensure_level(&mut self, level: usize) {
        if self.levels.len() <= level {
            self.levels.resize_with(level + 1, Vec::new);
        }
    }

    fn next_path(&self, level: usize, seq: usize) -> PathBuf {
        self.root.join(format!("l{}_{}.sst", level, seq))
    }
}

fn parse_sst_filename(name: &str) -> Option<(usize, u32)> {
    let rest = name.strip_prefix('l')?;
    let rest = rest.strip_suffix(".sst")?;
    let (level_str, seq_str) = rest.split_once('_')?;
    let level: usize = level_str.parse().ok()?;
    let seq: u32 = seq_str.parse().ok()?;
    Some((level, seq))
}


#[cfg(test)]
#[path = "tests/scenarios.rs"]
mod scenario_tests;

#[cfg(test)]
#[path = "tests/properties.rs"]
mod property_tests;
