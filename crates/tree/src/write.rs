use crate::{Tree, TreeError};
use sstable::SSTable;

impl Tree {
    /// Writes `value` for `key`, replacing any prior value. Triggers a flush
    /// (and possibly a compaction) once the memtable reaches its configured
    /// entry limit.
    pub fn put(&mut self, key: Vec<u8>, value: Vec<u8>) -> Result<(), TreeError> {
        if key.len() > u32::MAX as usize || value.len() > u32::MAX as usize {
            return Err(TreeError::Overflow);
        }

        self.memtable.put(key, value);

        if self.memtable.len() >= self.config.memtable_limit {
            self.flush()?;
        }
        Ok(())
    }

    /// Flushes the memtable to a new level-0 SSTable, triggering a
    /// compaction if level 0 now holds more tables than `l0_trigger`.
    ///
    /// A no-op on an empty memtable: no file is created.
    pub(crate) fn flush(&mut self) -> Result<(), TreeError> {
        if self.memtable.is_empty() {
            return Ok(());
        }

        self.ensure_level(0);
        let seq = self.levels[0].len();
        let path = self.next_path(0, seq);

        let records: Vec<(Vec<u8>, Vec<u8>)> = self
            .memtable
            .iter()
            .map(|(k, v)| (k.to_vec(), v.to_vec()))
            .collect();
        let table = SSTable::build(&path, records, self.config.filter_m, self.config.filter_k)?;

        self.levels[0].push(table);
        self.memtable.clear();

        tracing::info!(level = 0, seq, "flushed memtable to sstable");

        if self.levels[0].len() > self.config.l0_trigger {
            self.compact(0)?;
        }
        Ok(())
    }
}
