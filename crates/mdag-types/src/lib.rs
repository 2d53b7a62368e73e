//! Foundation types for merkledag.
//!
//! This crate defines the record format every other merkledag crate speaks:
//! the content address of an object, the typed links between objects, and
//! the canonical codec used both to hash and to persist them.
//!
//! # Key Types
//!
//! - [`ObjectId`]: content address (digest of an object's canonical encoding)
//! - [`Link`]: named, sized reference from a parent object to a child
//! - [`Object`]: the unit of storage: links plus a data buffer
//! - [`ObjectTag`]: 4-byte kind code a parent records for each child
//! - [`DagConfig`]: chunk size, fan-out, path separator and hash algorithm
//!
//! # Object Shapes
//!
//! Kind is derived, not stored. An object with no links is a **blob** whose
//! `data` is raw payload. An object with links is a **list** (part of one
//! file's chunk tree) or a **tree** (a directory); both carry one packed tag
//! per link in `data`, and which of the two it is only shows in the tag its
//! parent recorded for it.

pub mod config;
pub mod error;
pub mod id;
pub mod object;

pub use config::{DagConfig, HashAlgorithm, DEFAULT_CHUNK_SIZE, DEFAULT_FAN_OUT};
pub use error::{CodecError, ConfigError, TypeError};
pub use id::ObjectId;
pub use object::{pack_tags, Link, Object, ObjectTag, TAG_WIDTH};
