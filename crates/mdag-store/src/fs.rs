use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use mdag_types::ObjectId;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::traits::KvStore;

/// Loose-object directory store.
///
/// Each value lives in its own file at `<root>/<first two hex chars>/<rest>`,
/// the same fan-out git uses for `.git/objects`. Writes land in a temporary
/// file inside `root` and are renamed into place, so a reader never sees a
/// partially written value.
#[derive(Debug, Clone)]
pub struct FsKvStore {
    root: PathBuf,
    read_only: bool,
}

impl FsKvStore {
    /// Open a writable store rooted at `root`, creating the directory.
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        debug!(root = %root.display(), "opened object directory");
        Ok(Self {
            root,
            read_only: false,
        })
    }

    /// Open an existing store without write access.
    pub fn open_read_only(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(StoreError::Io(std::io::Error::new(
                ErrorKind::NotFound,
                format!("object directory {} does not exist", root.display()),
            )));
        }
        Ok(Self {
            root,
            read_only: true,
        })
    }

    /// Directory holding the objects.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File path a key is stored at.
    pub fn object_path(&self, key: &ObjectId) -> PathBuf {
        let hex = key.to_hex();
        if hex.len() > 2 {
            self.root.join(&hex[..2]).join(&hex[2..])
        } else {
            self.root.join(hex)
        }
    }
}

impl KvStore for FsKvStore {
    fn has(&self, key: &ObjectId) -> StoreResult<bool> {
        Ok(self.object_path(key).try_exists()?)
    }

    fn get(&self, key: &ObjectId) -> StoreResult<Vec<u8>> {
        match fs::read(self.object_path(key)) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StoreError::NotFound(key.clone())),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    fn put(&self, key: &ObjectId, value: &[u8]) -> StoreResult<()> {
        if self.read_only {
            return Err(StoreError::ReadOnly);
        }
        if key.is_empty() {
            return Err(StoreError::EmptyKey);
        }
        let path = self.object_path(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut tmp = NamedTempFile::new_in(&self.root)?;
        tmp.write_all(value)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| StoreError::Io(e.error))?;
        debug!(key = %key.short_hex(), len = value.len(), "object written");
        Ok(())
    }
}
