//! Merkle DAG encoding and path resolution.
//!
//! Ingest splits a [`Node`] (a file or a directory hierarchy) into
//! content-addressed [`Object`]s and writes them to a [`KvStore`]:
//!
//! - a file no larger than the chunk size becomes a single blob;
//! - a larger file becomes a list tree of bounded fan-out whose leaves are
//!   blobs of at most `chunk_size` bytes;
//! - a directory becomes a tree whose named links point at file roots and
//!   sub-trees.
//!
//! Resolution walks the reverse direction: given a root hash and a path it
//! descends through trees and concatenates the blobs under the matching
//! file, in the order they were produced.
//!
//! # Entry Points
//!
//! - [`add`] and [`hash_to_file`]: free functions over explicit collaborators
//! - [`Dag`]: owns a store, config and hasher for repeated use
//!
//! [`Object`]: mdag_types::Object
//! [`KvStore`]: mdag_store::KvStore

pub mod builder;
pub mod dag;
pub mod directory;
pub mod error;
pub mod ingest;
pub mod node;
pub mod resolver;

pub use builder::{tree_height, DagBuilder, StoredObject};
pub use dag::Dag;
pub use error::{DagError, DagResult};
pub use ingest::add;
pub use node::{DirNode, FileNode, Node, NodeKind};
pub use resolver::{hash_to_file, Resolver};
