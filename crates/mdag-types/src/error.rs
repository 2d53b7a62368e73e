use thiserror::Error;

/// Errors produced by identifier parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid hex string: {0}")]
    InvalidHex(String),

    #[error("object id must not be empty")]
    EmptyId,
}

/// Errors produced by the object codec.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    /// The encoded bytes are not a valid object record.
    #[error("corrupt object record: {0}")]
    Corrupt(String),

    /// The packed tag buffer does not line up with the links.
    #[error("tag buffer misaligned: {data_len} bytes of tags for {links} links")]
    TagMisaligned { data_len: usize, links: usize },

    /// A 4-byte tag code is not one of `blob`, `list`, `tree`.
    #[error("unknown tag {code:?} at link {index}")]
    UnknownTag { index: usize, code: String },

    /// Link sizes sum past `u64::MAX`.
    #[error("link sizes overflow u64 across {links} links")]
    SizeOverflow { links: usize },

    /// Serialization failure while encoding.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Errors produced while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
}
