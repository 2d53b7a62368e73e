//! Ingest entry point.

use mdag_crypto::DagHasher;
use mdag_store::KvStore;
use mdag_types::{DagConfig, ObjectId};
use tracing::info;

use crate::builder::DagBuilder;
use crate::error::DagResult;
use crate::node::Node;

/// Encode `node` into `store` and return its root hash.
///
/// A file yields the hash of its blob or list root; a directory yields the
/// hash of its tree. Objects written before a failure stay in the store
/// unreferenced.
pub fn add(
    store: &dyn KvStore,
    node: &Node,
    hasher: &mut dyn DagHasher,
    config: &DagConfig,
) -> DagResult<ObjectId> {
    config.validate()?;
    let mut builder = DagBuilder::new(store, hasher, config);
    let root = match node {
        Node::File(file) => builder.store_file(file)?,
        Node::Directory(dir) => builder.store_dir(dir)?,
    };
    info!(
        name = node.name(),
        kind = ?node.kind(),
        size = node.size(),
        root = %root.id,
        "ingested"
    );
    Ok(root.id)
}
