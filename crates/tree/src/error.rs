use sstable::SstError;
use std::path::PathBuf;

/// Errors surfaced by the tree controller.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    /// The filesystem rejected a read/write/seek.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A decoded length prefix would read past end-of-file, or an index
    /// claims an offset outside its data region. The offending file is left
    /// on disk and named in the error.
    #[error("corrupt sstable at {path}: {reason}")]
    CorruptSSTable { path: PathBuf, reason: String },

    /// A file referenced by a level's table list has disappeared. `get`/
    /// `range` retry once after dropping the stale entry; this variant
    /// reaches the caller only if that retry also failed.
    #[error("missing file: {}", .0.display())]
    MissingFile(PathBuf),

    /// A key or value longer than 2^32 - 1 bytes was passed to `put`.
    #[error("key or value exceeds maximum length of 2^32 - 1 bytes")]
    Overflow,
}

impl From<SstError> for TreeError {
    fn from(err: SstError) -> Self {
        match err {
            SstError::Io(e) => TreeError::Io(e),
            SstError::Corrupt { path, reason } => TreeError::CorruptSSTable { path, reason },
            SstError::Missing(path) => TreeError::MissingFile(path),
            SstError::Overflow => TreeError::Overflow,
        }
    }
}
