//! [`Dag`]: a store, a configuration and a hasher bundled for repeated use.

use std::path::Path;

use mdag_crypto::{new_hasher, DagHasher};
use mdag_store::KvStore;
use mdag_types::{DagConfig, Object, ObjectId};

use crate::error::DagResult;
use crate::ingest::add;
use crate::node::Node;
use crate::resolver::Resolver;

/// High-level handle over one store.
///
/// The hasher is chosen from `config.hash_algorithm` and owned by the
/// handle, so one `Dag` serves one caller at a time. Reads through
/// [`Dag::hash_to_file`] re-hash every value against its key.
pub struct Dag<S: KvStore> {
    store: S,
    config: DagConfig,
    hasher: Box<dyn DagHasher>,
}

impl<S: KvStore> Dag<S> {
    /// Open a handle, validating `config`.
    pub fn new(store: S, config: DagConfig) -> DagResult<Self> {
        config.validate()?;
        let hasher = new_hasher(config.hash_algorithm);
        Ok(Self {
            store,
            config,
            hasher,
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &DagConfig {
        &self.config
    }

    /// Ingest a node and return its root hash.
    pub fn add(&mut self, node: &Node) -> DagResult<ObjectId> {
        add(&self.store, node, self.hasher.as_mut(), &self.config)
    }

    /// Load a file or directory from disk and ingest it.
    pub fn add_path(&mut self, path: &Path) -> DagResult<ObjectId> {
        let node = Node::from_path(path)?;
        self.add(&node)
    }

    /// Resolve `path` under the tree `root`, verifying every value read.
    pub fn hash_to_file(&mut self, root: &ObjectId, path: &str) -> DagResult<Option<Vec<u8>>> {
        Resolver::new(&self.store, &self.config)
            .verify_with(self.hasher.as_mut())
            .hash_to_file(root, path)
    }

    /// Bytes of a file ingested on its own.
    pub fn file_bytes(&mut self, root: &ObjectId) -> DagResult<Vec<u8>> {
        Resolver::new(&self.store, &self.config)
            .verify_with(self.hasher.as_mut())
            .file_bytes(root)
    }

    /// Fetch and decode a single object.
    pub fn read_object(&mut self, id: &ObjectId) -> DagResult<Object> {
        Resolver::new(&self.store, &self.config)
            .verify_with(self.hasher.as_mut())
            .read_object(id)
    }

    pub fn into_store(self) -> S {
        self.store
    }
}
