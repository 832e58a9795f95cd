use crate::{SSTable, SstError};
use bloom::BloomFilter;
use byteorder::{LittleEndian, WriteBytesExt};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Seek, Write};
use std::path::Path;

impl SSTable {
    /// Builds a new SSTable at `path` from `records`, which MUST already be
    /// sorted by key ascending with duplicates resolved by the caller (the
    /// tree controller owns newest-wins resolution; this just serializes).
    ///
    /// `filter_m`/`filter_k` size the trailing membership filter and are
    /// later passed to [`SSTable::open`] to reopen the same file — they are
    /// a property of the tree, not of any one table.
    ///
    /// On any I/O failure partway through, the partially written file is
    /// removed before the error is returned, so a subsequent `open` of the
    /// same path never observes a truncated table.
    pub fn build<I>(path: &Path, records: I, filter_m: u32, filter_k: u32) -> Result<Self, SstError>
    where
        I: IntoIterator<Item = (Vec<u8>, Vec<u8>)>,
    {
        match Self::build_inner(path, records, filter_m, filter_k) {
            Ok(table) => Ok(table),
            Err(err) => {
                let _ = std::fs::remove_file(path);
                Err(err)
            }
        }
    }

    fn build_inner<I>(path: &Path, records: I, filter_m: u32, filter_k: u32) -> Result<Self, SstError>
    where
        I: IntoIterator<Item = (Vec<u8>, Vec<u8>)>,
    {
        let file = File::create(path)?;
        let mut w = BufWriter::new(file);
        let mut filter = BloomFilter::new(filter_m, filter_k);
        let mut index: BTreeMap<Vec<u8>, u64> = BTreeMap::new();
        let mut count: u32 = 0;

        for (key, value) in records {
            if key.len() > u32::MAX as usize || value.len() > u32::MAX as usize {
                return Err(SstError::Overflow);
            }

            let offset = w.stream_position()?;
            w.write_u32::<LittleEndian>(key.len() as u32)?;
            w.write_all(&key)?;
            w.write_u32::<LittleEndian>(value.len() as u32)?;
            w.write_all(&value)?;

            filter.add(&key);
            index.insert(key, offset);
            count += 1;
        }

        let index_region_start = w.stream_position()?;
        w.write_u32::<LittleEndian>(count)?;
        for (key, offset) in &index {
            w.write_u32::<LittleEndian>(key.len() as u32)?;
            w.write_all(key)?;
            w.write_u64::<LittleEndian>(*offset)?;
        }
        let index_region_end = w.stream_position()?;
        let index_region_size = (index_region_end - index_region_start) as u32;
        w.write_u32::<LittleEndian>(index_region_size)?;

        filter.write_to(&mut w)?;

        w.flush()?;
        w.into_inner().map_err(|e| e.into_error())?.sync_all()?;

        tracing::debug!(
            path = %path.display(),
            records = index.len(),
            "sstable built",
        );

        Ok(SSTable {
            path: path.to_path_buf(),
            index,
            filter: Some(filter),
        })
    }
}
