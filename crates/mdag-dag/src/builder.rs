//! File chunking: turns one file's bytes into a blob or a list tree.
//!
//! A file of at most `chunk_size` bytes is a single blob. Anything larger is
//! cut into `ceil(len / chunk_size)` chunks and linked under list objects of
//! at most `fan_out` children each, using the smallest height whose capacity
//! `fan_out^height` covers every chunk.
//!
//! # Invariants
//!
//! - Every object is written under the digest of its canonical encoding,
//!   and only when the store does not already hold that key.
//! - Sibling subtrees cover disjoint, contiguous byte ranges: the cursor
//!   returned by each child advances the next sibling's offset.
//! - The resulting shape and every hash are a pure function of the bytes
//!   and `(chunk_size, fan_out)`.

use mdag_crypto::{digest, DagHasher};
use mdag_store::{put_if_absent, KvStore};
use mdag_types::{DagConfig, Link, Object, ObjectId, ObjectTag};
use tracing::{debug, trace};

use crate::error::DagResult;
use crate::node::FileNode;

/// An object that has been written to the store, with its content address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredObject {
    pub id: ObjectId,
    pub object: Object,
}

/// Smallest height `h >= 1` such that `fan_out^h` chunks cover `len` bytes.
pub fn tree_height(len: usize, chunk_size: usize, fan_out: usize) -> u32 {
    let chunks = len.div_ceil(chunk_size).max(1);
    let mut height = 1;
    let mut capacity = fan_out;
    while capacity < chunks {
        capacity = capacity.saturating_mul(fan_out);
        height += 1;
    }
    height
}

/// Encodes files and directories into a store.
///
/// The builder borrows its collaborators for the duration of one ingest. The
/// hasher is reset before every object it digests.
pub struct DagBuilder<'a> {
    store: &'a dyn KvStore,
    hasher: &'a mut dyn DagHasher,
    config: &'a DagConfig,
}

impl<'a> DagBuilder<'a> {
    pub fn new(store: &'a dyn KvStore, hasher: &'a mut dyn DagHasher, config: &'a DagConfig) -> Self {
        Self {
            store,
            hasher,
            config,
        }
    }

    pub fn config(&self) -> &DagConfig {
        self.config
    }

    /// Encode one file and return its root object.
    pub fn store_file(&mut self, file: &FileNode) -> DagResult<StoredObject> {
        let bytes = file.bytes();
        if bytes.len() <= self.config.chunk_size {
            return self.store_blob(bytes);
        }

        let height = tree_height(bytes.len(), self.config.chunk_size, self.config.fan_out);
        let (root, consumed) = self.store_list(height, bytes, 0)?;
        debug_assert_eq!(consumed, bytes.len());
        debug!(
            file = file.name(),
            len = bytes.len(),
            height,
            root = %root.id.short_hex(),
            "file chunked"
        );
        Ok(root)
    }

    /// Encode the subtree of the given height starting at `offset`.
    ///
    /// Returns the subtree's root and the number of bytes it consumed. At
    /// height 1 a remainder that fits in one chunk comes back as a bare blob,
    /// which the parent tags `blob`.
    pub fn store_list(
        &mut self,
        height: u32,
        bytes: &[u8],
        offset: usize,
    ) -> DagResult<(StoredObject, usize)> {
        let chunk_size = self.config.chunk_size;
        let fan_out = self.config.fan_out;
        let mut entries = Vec::with_capacity(fan_out.min(64));
        let mut cursor = offset;

        if height <= 1 {
            let remaining = bytes.len() - offset;
            if remaining <= chunk_size {
                let blob = self.store_blob(&bytes[offset..])?;
                return Ok((blob, remaining));
            }
            while entries.len() < fan_out && cursor < bytes.len() {
                let end = (cursor + chunk_size).min(bytes.len());
                let blob = self.store_blob(&bytes[cursor..end])?;
                entries.push((ObjectTag::Blob, Link::unnamed(blob.id, (end - cursor) as u64)));
                cursor = end;
            }
        } else {
            while entries.len() < fan_out && cursor < bytes.len() {
                let (child, consumed) = self.store_list(height - 1, bytes, cursor)?;
                let tag = ObjectTag::for_file_object(&child.object);
                entries.push((tag, Link::unnamed(child.id, consumed as u64)));
                cursor += consumed;
            }
        }

        let children = entries.len();
        let list = self.persist(Object::with_entries(entries))?;
        debug!(
            height,
            children,
            offset,
            consumed = cursor - offset,
            id = %list.id.short_hex(),
            "list stored"
        );
        Ok((list, cursor - offset))
    }

    /// Encode and digest an object without writing it.
    pub fn object_id(&mut self, object: &Object) -> DagResult<ObjectId> {
        let encoded = object.encode()?;
        Ok(digest(&encoded, &mut *self.hasher))
    }

    fn store_blob(&mut self, payload: &[u8]) -> DagResult<StoredObject> {
        self.persist(Object::blob(payload))
    }

    /// Encode, digest and write `object` unless its key is already present.
    pub(crate) fn persist(&mut self, object: Object) -> DagResult<StoredObject> {
        let encoded = object.encode()?;
        let id = digest(&encoded, &mut *self.hasher);
        let written = put_if_absent(self.store, &id, &encoded)?;
        trace!(id = %id.short_hex(), len = encoded.len(), written, "object persisted");
        Ok(StoredObject { id, object })
    }
}
