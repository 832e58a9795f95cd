use crate::{ceil_div, SSTable, SstError};
use bloom::BloomFilter;
use byteorder::{LittleEndian, ReadBytesExt};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::ops::Bound;
use std::path::Path;

impl SSTable {
    /// Opens the SSTable at `path`, loading its index and membership filter
    /// into memory.
    ///
    /// If `path` does not exist, returns an SSTable that behaves as empty
    /// for every subsequent operation — this is the normal "level is empty"
    /// case, not an error.
    ///
    /// `filter_m`/`filter_k` must match the values the table (if present)
    /// was built with; they are how the filter section — and from there the
    /// index — are located from the end of the file.
    pub fn open(path: &Path, filter_m: u32, filter_k: u32) -> Result<Self, SstError> {
        if !path.exists() {
            return Ok(SSTable {
                path: path.to_path_buf(),
                index: BTreeMap::new(),
                filter: None,
            });
        }

        let mut file = File::open(path)?;
        let filesize = file.metadata()?.len();
        let filter_size = 8 + ceil_div(filter_m, 8) as u64;

        if filesize < filter_size + 4 {
            return Err(SstError::corrupt(path, "file too small to hold filter and index trailer"));
        }

        let filter_start = filesize - filter_size;
        file.seek(SeekFrom::Start(filter_start))?;
        let filter = BloomFilter::read_from(&mut file)?;
        if filter.num_bits() != filter_m || filter.num_hashes() != filter_k {
            return Err(SstError::corrupt(path, "filter header does not match expected m/k"));
        }

        file.seek(SeekFrom::Start(filter_start - 4))?;
        let index_region_size = file.read_u32::<LittleEndian>()? as u64;
        if index_region_size + 4 > filter_start {
            return Err(SstError::corrupt(path, "index_region_size points before start of file"));
        }
        let index_region_start = filter_start - 4 - index_region_size;

        file.seek(SeekFrom::Start(index_region_start))?;
        let count = file.read_u32::<LittleEndian>()?;
        let mut index = BTreeMap::new();
        let mut remaining = index_region_size.saturating_sub(4);

        for _ in 0..count {
            if remaining < 4 {
                return Err(SstError::corrupt(path, "index entry truncated"));
            }
            let key_len = file.read_u32::<LittleEndian>()? as u64;
            remaining -= 4;
            if key_len > remaining.saturating_sub(8) {
                return Err(SstError::corrupt(path, "index key_len runs past index region"));
            }
            let mut key = vec![0u8; key_len as usize];
            file.read_exact(&mut key)?;
            remaining -= key_len;
            let offset = file.read_u64::<LittleEndian>()?;
            remaining -= 8;
            if offset >= index_region_start {
                return Err(SstError::corrupt(path, "index offset points outside data region"));
            }
            index.insert(key, offset);
        }

        tracing::debug!(path = %path.display(), records = index.len(), "sstable opened");

        Ok(SSTable {
            path: path.to_path_buf(),
            index,
            filter: Some(filter),
        })
    }

    /// Point lookup. Consults the membership filter first; a negative result
    /// short-circuits without touching the index or the file.
    pub fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, SstError> {
        let Some(filter) = &self.filter else {
            return Ok(None);
        };
        if !filter.might_contain(key) {
            return Ok(None);
        }
        let Some(&offset) = self.index.get(key) else {
            return Ok(None);
        };
        let (on_disk_key, value) = self.read_record(offset)?;
        if on_disk_key != key {
            return Err(SstError::corrupt(&self.path, "index offset led to a mismatching key"));
        }
        Ok(Some(value))
    }

    /// Range scan over `start..=end`, inclusive on both ends. An empty
    /// `start` or `end` means unbounded on that side (keys can legitimately
    /// be the empty string, so this is a convention, not a literal match).
    pub fn range(&self, start: &[u8], end: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, SstError> {
        if self.filter.is_none() {
            return Ok(Vec::new());
        }

        let lower = if start.is_empty() {
            Bound::Unbounded
        } else {
            Bound::Included(start.to_vec())
        };
        let upper = if end.is_empty() {
            Bound::Unbounded
        } else {
            Bound::Included(end.to_vec())
        };

        let mut out = Vec::new();
        for (key, &offset) in self.index.range((lower, upper)) {
            let (on_disk_key, value) = self.read_record(offset)?;
            if &on_disk_key != key {
                return Err(SstError::corrupt(&self.path, "index offset led to a mismatching key"));
            }
            out.push((key.clone(), value));
        }
        Ok(out)
    }

    /// Reads every record in the table, in ascending key order. Used by
    /// compaction to fold a whole level's contents into a merged map.
    pub fn all_records(&self) -> Result<Vec<(Vec<u8>, Vec<u8>)>, SstError> {
        self.range(b"", b"")
    }

    fn read_record(&self, offset: u64) -> Result<(Vec<u8>, Vec<u8>), SstError> {
        let mut file = File::open(&self.path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SstError::Missing(self.path.clone())
            } else {
                SstError::Io(e)
            }
        })?;
        let filesize = file.metadata()?.len();
        file.seek(SeekFrom::Start(offset))?;

        if offset + 4 > filesize {
            return Err(SstError::corrupt(&self.path, "record offset runs past end of file"));
        }
        let key_len = file.read_u32::<LittleEndian>()? as u64;
        if offset + 4 + key_len + 4 > filesize {
            return Err(SstError::corrupt(&self.path, "record key_len runs past end of file"));
        }
        let mut key = vec![0u8; key_len as usize];
        file.read_exact(&mut key)?;

        let value_len = file.read_u32::<LittleEndian>()? as u64;
        if offset + 4 + key_len + 4 + value_len > filesize {
            return Err(SstError::corrupt(&self.path, "record value_len runs past end of file"));
        }
        let mut value = vec![0u8; value_len as usize];
        file.read_exact(&mut value)?;

        Ok((key, value))
    }
}
