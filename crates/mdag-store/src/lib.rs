//! Content-addressed key-value storage for merkledag.
//!
//! The store is a plain synchronous map from [`ObjectId`] to encoded object
//! bytes. It never interprets values; encoding, hashing and tree shape are
//! the concern of the crates above it.
//!
//! # Storage Backends
//!
//! All backends implement the [`KvStore`] trait:
//!
//! - [`InMemoryKvStore`] -- `HashMap`-based store for tests and embedding
//! - [`FsKvStore`] -- loose-object directory, one file per key
//!
//! # Design Rules
//!
//! 1. Values are immutable once written under a key.
//! 2. Writing the same key twice is safe; callers skip the write when
//!    [`KvStore::has`] already reports the key (see [`put_if_absent`]).
//! 3. All I/O errors are propagated, never silently ignored.
//!
//! [`ObjectId`]: mdag_types::ObjectId

pub mod error;
pub mod fs;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use fs::FsKvStore;
pub use memory::InMemoryKvStore;
pub use traits::{put_if_absent, KvStore};
