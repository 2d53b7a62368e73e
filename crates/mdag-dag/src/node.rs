//! Source nodes: the files and directories handed to ingest.
//!
//! A [`Node`] is a closed union of [`FileNode`] and [`DirNode`]. Directory
//! children are kept in the order they were supplied; that order is what
//! ends up in the encoded tree, so callers that need byte-stable roots must
//! supply a stable order. [`Node::from_path`] sorts by file name.

use std::fs;
use std::path::Path;

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{DagError, DagResult};

/// Kind of a source node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    File,
    Directory,
}

/// A file: a name and its full contents.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileNode {
    name: String,
    data: Vec<u8>,
}

impl FileNode {
    pub fn new(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

/// A directory: a name and an ordered list of children.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DirNode {
    name: String,
    children: Vec<Node>,
}

impl DirNode {
    pub fn new(name: impl Into<String>, children: Vec<Node>) -> Self {
        Self {
            name: name.into(),
            children,
        }
    }

    /// Append a child at the end of the listing.
    pub fn push(&mut self, child: Node) {
        self.children.push(child);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Total bytes of every file below this directory.
    pub fn size(&self) -> u64 {
        self.children.iter().map(Node::size).sum()
    }

    /// Children in listing order.
    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.children.iter()
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

/// A file or a directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    File(FileNode),
    Directory(DirNode),
}

impl Node {
    /// Shorthand for a file node.
    pub fn file(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self::File(FileNode::new(name, data))
    }

    /// Shorthand for a directory node.
    pub fn dir(name: impl Into<String>, children: Vec<Node>) -> Self {
        Self::Directory(DirNode::new(name, children))
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Self::File(_) => NodeKind::File,
            Self::Directory(_) => NodeKind::Directory,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::File(f) => f.name(),
            Self::Directory(d) => d.name(),
        }
    }

    pub fn size(&self) -> u64 {
        match self {
            Self::File(f) => f.size(),
            Self::Directory(d) => d.size(),
        }
    }

    /// Load a file or directory hierarchy from disk.
    ///
    /// Directory entries are sorted by file name. Symlinks are not followed;
    /// anything that is not a regular file or a directory fails with
    /// [`DagError::UnsupportedNodeKind`].
    pub fn from_path(path: &Path) -> DagResult<Self> {
        let meta = fs::symlink_metadata(path).map_err(|source| DagError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let file_type = meta.file_type();

        if file_type.is_file() {
            let data = fs::read(path).map_err(|source| DagError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            Ok(Self::file(name, data))
        } else if file_type.is_dir() {
            let mut dir = DirNode::new(name, Vec::new());
            for entry in WalkDir::new(path)
                .min_depth(1)
                .max_depth(1)
                .sort_by_file_name()
            {
                let entry = entry?;
                dir.push(Self::from_path(entry.path())?);
            }
            debug!(path = %path.display(), children = dir.len(), "loaded directory");
            Ok(Self::Directory(dir))
        } else {
            Err(DagError::UnsupportedNodeKind {
                path: path.to_path_buf(),
            })
        }
    }
}
