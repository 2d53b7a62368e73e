//! Hashers for merkledag content addresses.
//!
//! A [`DagHasher`] is a resettable streaming digest. Encoders and resolvers
//! never hash directly; they go through [`digest`], which resets the hasher
//! before every object so no state leaks between unrelated hashes.
//!
//! Digests come from the `blake3` and `sha2` crates.

pub mod hasher;

pub use hasher::{digest, new_hasher, Blake3Hasher, DagHasher, Sha256Hasher};
