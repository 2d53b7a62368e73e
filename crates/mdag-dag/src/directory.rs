//! Directory encoding: one tree object per directory.

use mdag_types::{Link, Object, ObjectTag};
use tracing::debug;

use crate::builder::{DagBuilder, StoredObject};
use crate::error::DagResult;
use crate::node::{DirNode, Node};

impl DagBuilder<'_> {
    /// Encode a directory and everything below it.
    ///
    /// Entries keep the directory's iteration order. Files are tagged `blob`
    /// or `list` by the shape of their root; sub-directories are tagged
    /// `tree`. Each link carries the child's name and reported size.
    pub fn store_dir(&mut self, dir: &DirNode) -> DagResult<StoredObject> {
        let mut entries = Vec::with_capacity(dir.len());
        for child in dir.iter() {
            let (tag, stored) = match child {
                Node::File(file) => {
                    let stored = self.store_file(file)?;
                    (ObjectTag::for_file_object(&stored.object), stored)
                }
                Node::Directory(sub) => (ObjectTag::Tree, self.store_dir(sub)?),
            };
            entries.push((tag, Link::new(child.name(), stored.id, child.size())));
        }

        let tree = self.persist(Object::with_entries(entries))?;
        debug!(
            dir = dir.name(),
            entries = dir.len(),
            id = %tree.id.short_hex(),
            "tree stored"
        );
        Ok(tree)
    }
}
