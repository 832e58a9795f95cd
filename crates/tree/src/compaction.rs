use crate::{Tree, TreeError};
use sstable::SSTable;
use std::collections::BTreeMap;

impl Tree {
    /// Merges level `level` into level `level + 1`, applying newest-wins
    /// precedence (records from `level` always override `level + 1`; within
    /// `level`, later list position wins). Does not cascade: level `level + 1`
    /// ends with at most one table, and no further compaction is triggered
    /// here even if a deeper level would now also be "full".
    pub(crate) fn compact(&mut self, level: usize) -> Result<(), TreeError> {
        self.ensure_level(level + 1);

        let mut merged: BTreeMap<Vec<u8>, Vec<u8>> = BTreeMap::new();
        for table in &self.levels[level + 1] {
            for (k, v) in table.all_records()? {
                merged.insert(k, v);
            }
        }
        for table in &self.levels[level] {
            for (k, v) in table.all_records()? {
                merged.insert(k, v);
            }
        }

        // Build the merged replacement before destroying anything: on a
        // build failure, both levels' original files must remain untouched.
        let final_path = self.next_path(level + 1, 0);
        let tmp_path = final_path.with_extension("sst.tmp");
        let built = if merged.is_empty() {
            None
        } else {
            Some(SSTable::build(
                &tmp_path,
                merged.into_iter().collect::<Vec<_>>(),
                self.config.filter_m,
                self.config.filter_k,
            )?)
        };

        for table in &mut self.levels[level + 1] {
            table.cleanup()?;
        }
        self.levels[level + 1].clear();
        for table in &mut self.levels[level] {
            table.cleanup()?;
        }
        self.levels[level].clear();

        if let Some(mut table) = built {
            table.rename(&final_path)?;
            self.levels[level + 1].push(table);
        }

        tracing::info!(level, next_level = level + 1, "compacted level into next");
        Ok(())
    }
}
