use std::path::PathBuf;

/// Errors produced by SSTable construction, loading, and reads.
#[derive(Debug, thiserror::Error)]
pub enum SstError {
    /// The filesystem rejected a read/write/seek.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A decoded length prefix would read past end-of-file, or the index
    /// claims an offset outside the data region.
    #[error("corrupt sstable at {path}: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    /// A file the caller expected to be present has disappeared.
    #[error("missing file: {}", .0.display())]
    Missing(PathBuf),

    /// A key or value exceeds the 2^32 - 1 byte length-prefix limit.
    #[error("key or value exceeds maximum length of 2^32 - 1 bytes")]
    Overflow,
}

impl SstError {
    pub(crate) fn corrupt(path: &std::path::Path, reason: impl Into<String>) -> Self {
        SstError::Corrupt {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }
}
