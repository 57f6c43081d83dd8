//!
//! The closed error/status enumeration surfaced by every public operation.
//!

use thiserror::Error;

/// Every way a directory operation can fail to do exactly what was asked.
///
/// `lookup`/`delete` treat a missing key as success, not as an `Err` — see
/// each operation's own docs. Invariant violations (corrupt snapshot
/// headers, an out-of-range slot index reached through a safe API) are
/// programmer bugs and `panic!`, they never surface as an `Error` variant.
#[derive(Error, Debug)]
pub enum Error {
    /// The number string is shorter than `PREFIX_LEN`.
    #[error("number is shorter than the prefix length")]
    TooShort,

    /// The number contains non-digit characters, its prefix value falls
    /// below `OFFSET`, or it is longer than `MAX_NUMBER_LEN`.
    #[error("number is not a legal directory key")]
    Illegal,

    /// A windowed scan needed a pivot but the directory has no entries at
    /// all.
    #[error("no entry exists anywhere in the directory")]
    NotFound,

    /// A block/range/window query returned fewer entries than requested,
    /// because the directory did not contain enough of them. The partial,
    /// sorted result is still returned alongside this status.
    #[error("fewer entries were available than requested")]
    NotEnoughData,

    /// Packing a digit string failed (wrong characters, or longer than the
    /// destination capacity).
    #[error("digit string could not be packed/unpacked")]
    EncodingError,

    /// A snapshot stream did not match the expected layout (slot index
    /// mismatch, truncated entry payload).
    #[error("snapshot stream is corrupt")]
    CorruptSnapshot,

    /// The underlying file failed to open/read/write.
    #[error("i/o error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Shorthand matching the crate's `Error` type, the Rust-native form of
/// spec's `Status`.
pub type Result<T> = std::result::Result<T, Error>;
