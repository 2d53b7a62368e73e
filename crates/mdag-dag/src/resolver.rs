//! Path resolution: root hash + path back to a file's bytes.
//!
//! The root is decoded as a tree and the path is split on the configured
//! separator. Component 0 names the root itself and is skipped; each later
//! component is matched against link names in order. The tag recorded for
//! the matching link decides what to fetch next, so no object is fetched
//! just to learn its kind.
//!
//! NotFound is `Ok(None)`: an absent root, a component with no matching
//! link, or a path that ends on a directory. Store failures, undecodable
//! records and tags that disagree with the objects they describe are
//! errors.

use mdag_crypto::{digest, DagHasher};
use mdag_store::KvStore;
use mdag_types::{CodecError, DagConfig, Object, ObjectId, ObjectTag};
use tracing::debug;

use crate::error::{DagError, DagResult};

/// Resolve `path` under the tree `root`.
///
/// Convenience wrapper over [`Resolver::hash_to_file`] without read
/// verification.
pub fn hash_to_file(
    store: &dyn KvStore,
    root: &ObjectId,
    path: &str,
    config: &DagConfig,
) -> DagResult<Option<Vec<u8>>> {
    Resolver::new(store, config).hash_to_file(root, path)
}

/// Reads files back out of a store.
pub struct Resolver<'a> {
    store: &'a dyn KvStore,
    config: &'a DagConfig,
    verifier: Option<&'a mut dyn DagHasher>,
}

impl<'a> Resolver<'a> {
    pub fn new(store: &'a dyn KvStore, config: &'a DagConfig) -> Self {
        Self {
            store,
            config,
            verifier: None,
        }
    }

    /// Re-hash every value read and reject those that do not match their key.
    ///
    /// The hasher must implement the algorithm the DAG was built with.
    pub fn verify_with(mut self, hasher: &'a mut dyn DagHasher) -> Self {
        self.verifier = Some(hasher);
        self
    }

    /// Resolve `path` under the tree `root`.
    pub fn hash_to_file(&mut self, root: &ObjectId, path: &str) -> DagResult<Option<Vec<u8>>> {
        if !self.store.has(root)? {
            debug!(root = %root.short_hex(), "root not in store");
            return Ok(None);
        }
        let tree = self.read_object(root)?;
        let components: Vec<&str> = path.split(self.config.path_separator).collect();
        let found = self.resolve_in_tree(root, &tree, &components, 1)?;
        debug!(
            root = %root.short_hex(),
            path,
            found = found.is_some(),
            "path resolved"
        );
        Ok(found)
    }

    fn resolve_in_tree(
        &mut self,
        id: &ObjectId,
        tree: &Object,
        components: &[&str],
        cursor: usize,
    ) -> DagResult<Option<Vec<u8>>> {
        let Some(wanted) = components.get(cursor) else {
            return Ok(None);
        };
        let last = cursor + 1 == components.len();
        let entries = tree.entries().map_err(|source| DagError::CorruptObject {
            id: id.clone(),
            source,
        })?;

        for (tag, link) in entries {
            if link.name != *wanted {
                continue;
            }
            match tag {
                ObjectTag::Tree => {
                    let child = self.read_object(&link.hash)?;
                    if let Some(bytes) =
                        self.resolve_in_tree(&link.hash, &child, components, cursor + 1)?
                    {
                        return Ok(Some(bytes));
                    }
                }
                // A file only matches when the path ends on it.
                ObjectTag::Blob | ObjectTag::List if !last => continue,
                ObjectTag::Blob => return self.read_blob(&link.hash).map(Some),
                ObjectTag::List => {
                    let list = self.read_list(&link.hash)?;
                    return self.expand_list(&link.hash, &list).map(Some);
                }
            }
        }
        Ok(None)
    }

    /// Concatenate every blob under a list, in link order.
    pub fn expand_list(&mut self, id: &ObjectId, list: &Object) -> DagResult<Vec<u8>> {
        let corrupt = |source: CodecError| DagError::CorruptObject {
            id: id.clone(),
            source,
        };
        // Sizes are only checked for consistency, never used to allocate.
        list.total_size().map_err(corrupt)?;
        let entries = list.entries().map_err(corrupt)?;
        let mut out = Vec::new();
        for (tag, link) in entries {
            match tag {
                ObjectTag::Blob => out.extend_from_slice(&self.read_blob(&link.hash)?),
                ObjectTag::List => {
                    let nested = self.read_list(&link.hash)?;
                    out.extend(self.expand_list(&link.hash, &nested)?);
                }
                ObjectTag::Tree => {
                    return Err(DagError::UnexpectedTag {
                        parent: id.clone(),
                        tag,
                    })
                }
            }
        }
        Ok(out)
    }

    /// Bytes of a file object reached through a link with the given tag.
    pub fn read_tagged(&mut self, id: &ObjectId, tag: ObjectTag) -> DagResult<Vec<u8>> {
        match tag {
            ObjectTag::Blob => self.read_blob(id),
            ObjectTag::List => {
                let list = self.read_list(id)?;
                self.expand_list(id, &list)
            }
            ObjectTag::Tree => Err(DagError::UnexpectedTag {
                parent: id.clone(),
                tag,
            }),
        }
    }

    /// Bytes of a file whose root hash came straight from ingest.
    ///
    /// A file root carries no parent tag, so its shape decides: a blob is
    /// returned as is, anything else is expanded as a list.
    pub fn file_bytes(&mut self, root: &ObjectId) -> DagResult<Vec<u8>> {
        let object = self.read_object(root)?;
        if object.is_blob() {
            Ok(object.data)
        } else {
            self.expand_list(root, &object)
        }
    }

    /// Fetch and decode one object.
    pub fn read_object(&mut self, id: &ObjectId) -> DagResult<Object> {
        let bytes = self.store.get(id)?;
        if let Some(hasher) = self.verifier.as_deref_mut() {
            let computed = digest(&bytes, hasher);
            if computed != *id {
                return Err(DagError::HashMismatch {
                    id: id.clone(),
                    computed,
                });
            }
        }
        Object::decode(&bytes).map_err(|source| DagError::CorruptObject {
            id: id.clone(),
            source,
        })
    }

    fn read_blob(&mut self, id: &ObjectId) -> DagResult<Vec<u8>> {
        let object = self.read_object(id)?;
        if !object.is_blob() {
            return Err(DagError::TagMismatch {
                id: id.clone(),
                expected: ObjectTag::Blob,
            });
        }
        Ok(object.data)
    }

    fn read_list(&mut self, id: &ObjectId) -> DagResult<Object> {
        let object = self.read_object(id)?;
        if object.is_blob() {
            return Err(DagError::TagMismatch {
                id: id.clone(),
                expected: ObjectTag::List,
            });
        }
        Ok(object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::DagBuilder;
    use crate::ingest::add;
    use crate::node::Node;
    use crate::testutil::pattern;
    use mdag_crypto::Blake3Hasher;
    use mdag_store::InMemoryKvStore;
    use mdag_types::Link;
    use proptest::prelude::*;

    fn ingest(store: &InMemoryKvStore, config: &DagConfig, node: &Node) -> ObjectId {
        add(store, node, &mut Blake3Hasher::new(), config).unwrap()
    }

    fn persist(store: &InMemoryKvStore, object: Object) -> ObjectId {
        let config = DagConfig::default();
        let mut hasher = Blake3Hasher::new();
        DagBuilder::new(store, &mut hasher, &config)
            .persist(object)
            .unwrap()
            .id
    }

    fn fidelity_tree() -> (Node, Vec<u8>, Vec<u8>) {
        let a = pattern(3 * 1024);
        let b = pattern(300 * 1024);
        let root = Node::dir(
            "root",
            vec![
                Node::file("a", a.clone()),
                Node::file("b", b.clone()),
                Node::dir("c", vec![Node::file("d", Vec::new())]),
            ],
        );
        (root, a, b)
    }

    #[test]
    fn directory_fidelity() {
        let store = InMemoryKvStore::new();
        let config = DagConfig::default();
        let (node, a, b) = fidelity_tree();
        let root = ingest(&store, &config, &node);

        assert_eq!(hash_to_file(&store, &root, "/c/d", &config).unwrap(), Some(Vec::new()));
        assert_eq!(hash_to_file(&store, &root, "/a", &config).unwrap(), Some(a));
        assert_eq!(hash_to_file(&store, &root, "/b", &config).unwrap(), Some(b));
        assert_eq!(hash_to_file(&store, &root, "/missing", &config).unwrap(), None);
    }

    #[test]
    fn absent_root_is_not_found() {
        let store = InMemoryKvStore::new();
        let config = DagConfig::default();
        let root = ObjectId::from([0x42; 32]);
        assert_eq!(hash_to_file(&store, &root, "/a", &config).unwrap(), None);
    }

    #[test]
    fn path_ending_on_directory_is_not_found() {
        let store = InMemoryKvStore::new();
        let config = DagConfig::default();
        let (node, _, _) = fidelity_tree();
        let root = ingest(&store, &config, &node);
        assert_eq!(hash_to_file(&store, &root, "/c", &config).unwrap(), None);
        assert_eq!(hash_to_file(&store, &root, "", &config).unwrap(), None);
    }

    #[test]
    fn path_continuing_past_file_is_not_found() {
        let store = InMemoryKvStore::new();
        let config = DagConfig::default();
        let (node, _, _) = fidelity_tree();
        let root = ingest(&store, &config, &node);
        assert_eq!(hash_to_file(&store, &root, "/a/extra", &config).unwrap(), None);
        assert_eq!(hash_to_file(&store, &root, "/b/extra", &config).unwrap(), None);
    }

    #[test]
    fn duplicate_names_fall_through() {
        let store = InMemoryKvStore::new();
        let config = DagConfig::default();
        let node = Node::dir(
            "root",
            vec![
                Node::dir("x", vec![Node::file("other", b"nope".to_vec())]),
                Node::dir("x", vec![Node::file("target", b"found".to_vec())]),
            ],
        );
        let root = ingest(&store, &config, &node);
        assert_eq!(
            hash_to_file(&store, &root, "/x/target", &config).unwrap(),
            Some(b"found".to_vec())
        );
    }

    #[test]
    fn custom_separator() {
        let store = InMemoryKvStore::new();
        let config = DagConfig {
            path_separator: '\\',
            ..DagConfig::default()
        };
        let (node, a, _) = fidelity_tree();
        let root = ingest(&store, &config, &node);
        assert_eq!(hash_to_file(&store, &root, "root\\a", &config).unwrap(), Some(a));
        assert_eq!(hash_to_file(&store, &root, "/a", &config).unwrap(), None);
    }

    #[test]
    fn multi_level_file_under_directory() {
        let store = InMemoryKvStore::new();
        let config = DagConfig::with_bounds(4, 3);
        let big = pattern(4 * 27 + 5);
        let node = Node::dir("r", vec![Node::dir("s", vec![Node::file("big", big.clone())])]);
        let root = ingest(&store, &config, &node);
        assert_eq!(hash_to_file(&store, &root, "/s/big", &config).unwrap(), Some(big));
    }

    #[test]
    fn corrupt_root_is_an_error() {
        let store = InMemoryKvStore::new();
        let config = DagConfig::default();
        let root = ObjectId::from([7; 32]);
        store.put(&root, b"\x01\x02garbage").unwrap();
        let err = hash_to_file(&store, &root, "/a", &config).unwrap_err();
        assert!(matches!(err, DagError::CorruptObject { .. }));
    }

    #[test]
    fn missing_child_is_a_store_error() {
        let store = InMemoryKvStore::new();
        let config = DagConfig::default();
        let dangling = ObjectId::from([9; 32]);
        let root = persist(
            &store,
            Object::with_entries(vec![(ObjectTag::Blob, Link::new("a", dangling, 1))]),
        );
        let err = hash_to_file(&store, &root, "/a", &config).unwrap_err();
        assert!(matches!(err, DagError::Store(ref e) if e.is_not_found()));
    }

    #[test]
    fn blob_tag_on_list_is_mismatch() {
        let store = InMemoryKvStore::new();
        let config = DagConfig::default();
        let chunk = persist(&store, Object::blob(b"xy".to_vec()));
        let list = persist(
            &store,
            Object::with_entries(vec![(ObjectTag::Blob, Link::unnamed(chunk, 2))]),
        );
        let root = persist(
            &store,
            Object::with_entries(vec![(ObjectTag::Blob, Link::new("f", list, 2))]),
        );
        let err = hash_to_file(&store, &root, "/f", &config).unwrap_err();
        assert!(matches!(
            err,
            DagError::TagMismatch {
                expected: ObjectTag::Blob,
                ..
            }
        ));
    }

    #[test]
    fn tree_inside_list_is_rejected() {
        let store = InMemoryKvStore::new();
        let config = DagConfig::default();
        let sub = persist(&store, Object::default());
        let list = persist(
            &store,
            Object::with_entries(vec![(ObjectTag::Tree, Link::unnamed(sub, 0))]),
        );
        let root = persist(
            &store,
            Object::with_entries(vec![(ObjectTag::List, Link::new("f", list, 0))]),
        );
        let err = hash_to_file(&store, &root, "/f", &config).unwrap_err();
        assert!(matches!(
            err,
            DagError::UnexpectedTag {
                tag: ObjectTag::Tree,
                ..
            }
        ));
    }

    #[test]
    fn overflowing_link_sizes_are_corrupt() {
        let store = InMemoryKvStore::new();
        let config = DagConfig::default();
        let chunk = persist(&store, Object::blob(b"xy".to_vec()));
        let list = persist(
            &store,
            Object::with_entries(vec![
                (ObjectTag::Blob, Link::unnamed(chunk.clone(), u64::MAX)),
                (ObjectTag::Blob, Link::unnamed(chunk, 2)),
            ]),
        );
        let root = persist(
            &store,
            Object::with_entries(vec![(ObjectTag::List, Link::new("f", list.clone(), 4))]),
        );

        let mut hasher = Blake3Hasher::new();
        let err = Resolver::new(&store, &config)
            .verify_with(&mut hasher)
            .hash_to_file(&root, "/f")
            .unwrap_err();
        assert!(matches!(
            err,
            DagError::CorruptObject {
                ref id,
                source: CodecError::SizeOverflow { links: 2 },
            } if *id == list
        ));
    }

    #[test]
    fn huge_link_size_is_not_preallocated() {
        let store = InMemoryKvStore::new();
        let config = DagConfig::default();
        let chunk = persist(&store, Object::blob(b"xy".to_vec()));
        let list = persist(
            &store,
            Object::with_entries(vec![(ObjectTag::Blob, Link::unnamed(chunk, 1 << 40))]),
        );
        let root = persist(
            &store,
            Object::with_entries(vec![(ObjectTag::List, Link::new("f", list, 1 << 40))]),
        );
        // Recorded sizes are not what comes back; the blobs are.
        assert_eq!(
            hash_to_file(&store, &root, "/f", &config).unwrap(),
            Some(b"xy".to_vec())
        );
    }

    #[test]
    fn verification_catches_tampered_values() {
        let store = InMemoryKvStore::new();
        let config = DagConfig::default();
        let root = ingest(&store, &config, &Node::dir("r", vec![Node::file("a", b"aaa".to_vec())]));
        let tree = Object::decode(&store.get(&root).unwrap()).unwrap();
        let blob_id = tree.links[0].hash.clone();
        store.put(&blob_id, &Object::blob(b"bbb".to_vec()).encode().unwrap()).unwrap();

        // Unverified reads trust the store.
        assert_eq!(
            hash_to_file(&store, &root, "/a", &config).unwrap(),
            Some(b"bbb".to_vec())
        );

        let mut hasher = Blake3Hasher::new();
        let err = Resolver::new(&store, &config)
            .verify_with(&mut hasher)
            .hash_to_file(&root, "/a")
            .unwrap_err();
        assert!(matches!(err, DagError::HashMismatch { ref id, .. } if *id == blob_id));
    }

    #[test]
    fn file_roots_read_back_directly() {
        let store = InMemoryKvStore::new();
        let config = DagConfig::with_bounds(8, 4);
        for len in [0, 7, 8, 9, 32, 31, 33, 64, 128, 129, 8 * 4 * 4 * 2 + 3] {
            let bytes = pattern(len);
            let root = ingest(&store, &config, &Node::file("f", bytes.clone()));
            let back = Resolver::new(&store, &config).file_bytes(&root).unwrap();
            assert_eq!(back, bytes, "length {len}");
        }
    }

    proptest! {
        #[test]
        fn round_trip_through_directory(
            bytes in proptest::collection::vec(any::<u8>(), 0..400),
            chunk_size in 1usize..9,
            fan_out in 2usize..5,
        ) {
            let store = InMemoryKvStore::new();
            let config = DagConfig::with_bounds(chunk_size, fan_out);
            let node = Node::dir("r", vec![Node::file("f", bytes.clone())]);
            let root = ingest(&store, &config, &node);
            prop_assert_eq!(hash_to_file(&store, &root, "/f", &config).unwrap(), Some(bytes));
        }
    }
}
