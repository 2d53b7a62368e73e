//! Error types for DAG encoding and resolution.

use std::path::PathBuf;

use mdag_types::{CodecError, ConfigError, ObjectId, ObjectTag};

/// Errors that can occur while encoding or resolving a DAG.
#[derive(Debug, thiserror::Error)]
pub enum DagError {
    /// Store operation failed.
    #[error("store error: {0}")]
    Store(#[from] mdag_store::StoreError),

    /// Encoding an object failed.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// A stored value could not be decoded as an object.
    #[error("corrupt object {id}: {source}")]
    CorruptObject {
        id: ObjectId,
        #[source]
        source: CodecError,
    },

    /// A parent's tag disagrees with the shape of the child it points to.
    #[error("tag mismatch for {id}: parent recorded {expected}")]
    TagMismatch { id: ObjectId, expected: ObjectTag },

    /// A tag that is not allowed where it appears (a tree inside a file).
    #[error("unexpected {tag} link in {parent}")]
    UnexpectedTag { parent: ObjectId, tag: ObjectTag },

    /// Stored bytes do not hash to the key they were read from.
    #[error("hash mismatch for {id}: computed {computed}")]
    HashMismatch { id: ObjectId, computed: ObjectId },

    /// A filesystem entry that is neither a regular file nor a directory.
    #[error("unsupported node kind at {}", path.display())]
    UnsupportedNodeKind { path: PathBuf },

    /// Reading a filesystem node failed.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Walking a directory failed.
    #[error("directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),

    /// Invalid chunking configuration.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Convenience alias for DAG results.
pub type DagResult<T> = Result<T, DagError>;
