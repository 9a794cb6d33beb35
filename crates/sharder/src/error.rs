use std::path::PathBuf;
use thiserror::Error;

/// Result type for sharder operations
pub type Result<T> = std::result::Result<T, SharderError>;

/// Errors that can occur while indexing or writing shards
#[derive(Error, Debug)]
pub enum SharderError {
    /// A listed input file cannot be opened. Fatal before any output exists.
    #[error("Cannot open input file {path}: {source}")]
    InputNotFound {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A compilation-unit marker appeared before any project marker, so
    /// there is no project to attribute the unit to.
    #[error("Compilation unit marker at byte {offset} precedes any project marker")]
    StructuralViolation { offset: u64 },

    /// An input stream did not declare exactly one project, breaking the
    /// stream-order-equals-project-order precondition the writer relies on.
    #[error("Input stream {stream} declares {found} project markers, expected exactly 1")]
    StreamMisalignment { stream: usize, found: usize },

    /// Writing a shard file failed; the remaining output for that shard is
    /// abandoned rather than silently truncated.
    #[error("Failed writing shard {shard}: {source}")]
    ShardWrite {
        shard: usize,
        source: std::io::Error,
    },

    /// IO error while scanning an input stream
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
