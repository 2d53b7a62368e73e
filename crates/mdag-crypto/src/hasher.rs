use mdag_types::{HashAlgorithm, ObjectId};
use sha2::Digest as _;

/// Resettable streaming digest.
///
/// One instance is owned by one ingest or resolve call at a time; it is not
/// shared across threads. Implementations must be deterministic.
pub trait DagHasher: Send {
    /// Discard any bytes written so far.
    fn reset(&mut self);

    /// Feed bytes into the digest.
    fn write(&mut self, bytes: &[u8]);

    /// Digest of everything written since the last reset.
    fn sum(&self) -> ObjectId;

    /// Algorithm implemented by this hasher.
    fn algorithm(&self) -> HashAlgorithm;
}

/// Reset `hasher`, write `bytes`, and return the sum.
///
/// This is the only way object ids are derived.
pub fn digest(bytes: &[u8], hasher: &mut dyn DagHasher) -> ObjectId {
    hasher.reset();
    hasher.write(bytes);
    hasher.sum()
}

/// Construct a boxed hasher for the configured algorithm.
pub fn new_hasher(algorithm: HashAlgorithm) -> Box<dyn DagHasher> {
    match algorithm {
        HashAlgorithm::Blake3 => Box::new(Blake3Hasher::new()),
        HashAlgorithm::Sha256 => Box::new(Sha256Hasher::new()),
    }
}

/// BLAKE3, 32-byte digests.
#[derive(Clone, Default)]
pub struct Blake3Hasher {
    inner: blake3::Hasher,
}

impl Blake3Hasher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DagHasher for Blake3Hasher {
    fn reset(&mut self) {
        self.inner.reset();
    }

    fn write(&mut self, bytes: &[u8]) {
        self.inner.update(bytes);
    }

    fn sum(&self) -> ObjectId {
        ObjectId::from(*self.inner.finalize().as_bytes())
    }

    fn algorithm(&self) -> HashAlgorithm {
        HashAlgorithm::Blake3
    }
}

/// SHA-256, 32-byte digests.
#[derive(Clone, Default)]
pub struct Sha256Hasher {
    inner: sha2::Sha256,
}

impl Sha256Hasher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DagHasher for Sha256Hasher {
    fn reset(&mut self) {
        sha2::Digest::reset(&mut self.inner);
    }

    fn write(&mut self, bytes: &[u8]) {
        self.inner.update(bytes);
    }

    fn sum(&self) -> ObjectId {
        ObjectId::from_digest(self.inner.clone().finalize().to_vec())
    }

    fn algorithm(&self) -> HashAlgorithm {
        HashAlgorithm::Sha256
    }
}
