use std::fmt;

use bincode::Options;
use serde::{Deserialize, Serialize};

use crate::error::CodecError;
use crate::id::ObjectId;

/// Width in bytes of one packed tag.
pub const TAG_WIDTH: usize = 4;

/// Kind of the object a link points to, as recorded by the parent.
///
/// The tag lives in the parent's `data` buffer so a reader knows how to
/// treat a child before fetching it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObjectTag {
    /// Leaf chunk: raw payload, no links.
    Blob,
    /// Interior node of one file's chunk tree.
    List,
    /// Directory listing.
    Tree,
}

impl ObjectTag {
    /// The wire code as text.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Blob => "blob",
            Self::List => "list",
            Self::Tree => "tree",
        }
    }

    /// The fixed-width wire code.
    pub const fn code(&self) -> &'static [u8; TAG_WIDTH] {
        match self {
            Self::Blob => b"blob",
            Self::List => b"list",
            Self::Tree => b"tree",
        }
    }

    /// Parse a wire code.
    pub fn from_code(code: &[u8]) -> Option<Self> {
        match code {
            b"blob" => Some(Self::Blob),
            b"list" => Some(Self::List),
            b"tree" => Some(Self::Tree),
            _ => None,
        }
    }

    /// Tag for a file-side child: `list` when it has links, `blob` otherwise.
    pub fn for_file_object(object: &Object) -> Self {
        if object.is_blob() {
            Self::Blob
        } else {
            Self::List
        }
    }
}

impl fmt::Display for ObjectTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pack tags into a `data` buffer, in link order.
pub fn pack_tags(tags: &[ObjectTag]) -> Vec<u8> {
    let mut data = Vec::with_capacity(tags.len() * TAG_WIDTH);
    for tag in tags {
        data.extend_from_slice(tag.code());
    }
    data
}

/// A typed reference from a parent object to a child object.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Directory entry name. Empty for list children.
    pub name: String,
    /// Content address of the child's canonical encoding.
    pub hash: ObjectId,
    /// Bytes of original content reachable under this link.
    pub size: u64,
}

impl Link {
    /// Create a named link (directory entry).
    pub fn new(name: impl Into<String>, hash: ObjectId, size: u64) -> Self {
        Self {
            name: name.into(),
            hash,
            size,
        }
    }

    /// Create an unnamed link (list child).
    pub fn unnamed(hash: ObjectId, size: u64) -> Self {
        Self {
            name: String::new(),
            hash,
            size,
        }
    }
}

/// The unit of storage.
///
/// With no links, `data` is a blob payload. With links, `data` holds exactly
/// one packed [`ObjectTag`] per link, in the same order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Object {
    pub links: Vec<Link>,
    pub data: Vec<u8>,
}

impl Object {
    /// A leaf object carrying raw payload.
    pub fn blob(data: impl Into<Vec<u8>>) -> Self {
        Self {
            links: Vec::new(),
            data: data.into(),
        }
    }

    /// A linking object built from `(tag, link)` pairs.
    ///
    /// Tags are packed here, so `data` always lines up with `links`.
    pub fn with_entries(entries: Vec<(ObjectTag, Link)>) -> Self {
        let mut links = Vec::with_capacity(entries.len());
        let mut data = Vec::with_capacity(entries.len() * TAG_WIDTH);
        for (tag, link) in entries {
            data.extend_from_slice(tag.code());
            links.push(link);
        }
        Self { links, data }
    }

    /// Returns `true` for leaf objects.
    pub fn is_blob(&self) -> bool {
        self.links.is_empty()
    }

    /// Unpack the tag buffer of a linking object.
    ///
    /// A blob has no tags. For linking objects the buffer must hold exactly
    /// `TAG_WIDTH * links.len()` bytes of known codes.
    pub fn tags(&self) -> Result<Vec<ObjectTag>, CodecError> {
        if self.is_blob() {
            return Ok(Vec::new());
        }
        if self.data.len() != TAG_WIDTH * self.links.len() {
            return Err(CodecError::TagMisaligned {
                data_len: self.data.len(),
                links: self.links.len(),
            });
        }
        self.data
            .chunks_exact(TAG_WIDTH)
            .enumerate()
            .map(|(index, code)| {
                ObjectTag::from_code(code).ok_or_else(|| CodecError::UnknownTag {
                    index,
                    code: String::from_utf8_lossy(code).into_owned(),
                })
            })
            .collect()
    }

    /// Links paired with the tags recorded for them.
    pub fn entries(&self) -> Result<Vec<(ObjectTag, &Link)>, CodecError> {
        let tags = self.tags()?;
        Ok(tags.into_iter().zip(self.links.iter()).collect())
    }

    /// Bytes of original content under this object.
    ///
    /// Link sizes come from stored records, so a sum past `u64::MAX` is
    /// reported as [`CodecError::SizeOverflow`].
    pub fn total_size(&self) -> Result<u64, CodecError> {
        if self.is_blob() {
            return Ok(self.data.len() as u64);
        }
        self.links
            .iter()
            .try_fold(0u64, |acc, link| acc.checked_add(link.size))
            .ok_or(CodecError::SizeOverflow {
                links: self.links.len(),
            })
    }

    /// Check structural integrity (tag alignment and codes).
    pub fn validate(&self) -> Result<(), CodecError> {
        self.tags().map(|_| ())
    }

    /// Canonical encoding: used for both hashing and persistence.
    pub fn encode(&self) -> Result<Vec<u8>, CodecError> {
        codec()
            .serialize(self)
            .map_err(|e| CodecError::Serialization(e.to_string()))
    }

    /// Inverse of [`Object::encode`].
    ///
    /// Truncated input, trailing bytes and misaligned tag buffers are all
    /// reported as errors.
    pub fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        let object: Self = codec()
            .deserialize(bytes)
            .map_err(|e| CodecError::Corrupt(e.to_string()))?;
        object.validate()?;
        Ok(object)
    }
}

fn codec() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_little_endian()
        .reject_trailing_bytes()
}
