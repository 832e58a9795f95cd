use crate::{Tree, TreeError};
use std::collections::BTreeMap;
use std::path::Path;

impl Tree {
    /// Looks up `key` in precedence order: memtable, then L0 newest-first,
    /// then L1, L2, … in ascending level order. The first hit wins.
    ///
    /// If a table's backing file has disappeared since it was opened (the
    /// `MissingFile` case in the error model), the stale entry is dropped
    /// and the lookup is retried once before surfacing an error.
    pub fn get(&mut self, key: &[u8]) -> Result<Option<Vec<u8>>, TreeError> {
        match self.get_once(key) {
            Err(TreeError::MissingFile(path)) => {
                self.prune_missing(&path);
                self.get_once(key).map_err(Self::missing_file_as_io)
            }
            other => other,
        }
    }

    /// Collects every (key, value) pair with `start <= key <= end`, newest
    /// write per key winning, and returns them sorted by key ascending. An
    /// empty `start`/`end` means unbounded on that side.
    pub fn range(&mut self, start: &[u8], end: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, TreeError> {
        match self.range_once(start, end) {
            Err(TreeError::MissingFile(path)) => {
                self.prune_missing(&path);
                self.range_once(start, end).map_err(Self::missing_file_as_io)
            }
            other => other,
        }
    }

    fn get_once(&self, key: &[u8]) -> Result<Option<Vec<u8>>, TreeError> {
        if let Some(v) = self.memtable.get(key) {
            return Ok(Some(v.to_vec()));
        }
        if let Some(l0) = self.levels.first() {
            for table in l0.iter().rev() {
                if let Some(v) = table.get(key)? {
                    return Ok(Some(v));
                }
            }
        }
        for level in self.levels.iter().skip(1) {
            for table in level {
                if let Some(v) = table.get(key)? {
                    return Ok(Some(v));
                }
            }
        }
        Ok(None)
    }

    fn range_once(&self, start: &[u8], end: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, TreeError> {
        let mut merged: BTreeMap<Vec<u8>, Vec<u8>> = BTreeMap::new();

        // Lowest precedence first so later inserts naturally overwrite
        // earlier ones: deepest level up to L0, oldest-to-newest within L0.
        for level in self.levels.iter().rev() {
            for table in level {
                for (k, v) in table.range(start, end)? {
                    merged.insert(k, v);
                }
            }
        }
        for (k, v) in self.memtable.iter_range(start, end) {
            merged.insert(k.to_vec(), v.to_vec());
        }

        Ok(merged.into_iter().collect())
    }

    fn prune_missing(&mut self, path: &Path) {
        for level in &mut self.levels {
            level.retain(|table| table.path() != path);
        }
    }

    fn missing_file_as_io(err: TreeError) -> TreeError {
        match err {
            TreeError::MissingFile(path) => TreeError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("sstable file still missing after retry: {}", path.display()),
            )),
            other => other,
        }
    }
}
