//!
//! The fixed-size, densely packed record stored in a `Block`.
//!

use crate::digits::{self, packed_capacity};
use crate::error::Result;

/// Digits after the 6-digit prefix: up to 9 of them.
pub const POSTFIX_MAX_LEN: usize = 9;
/// Digits in a full number: `PREFIX_LEN + POSTFIX_MAX_LEN`.
pub const ALIAS_MAX_LEN: usize = 15;

/// Packed-postfix byte width: `ceil(9/2) + 1 = 6`.
pub const POSTFIX_BYTES: usize = packed_capacity(POSTFIX_MAX_LEN);
/// Packed-alias byte width: `ceil(15/2) + 1 = 9`.
pub const ALIAS_BYTES: usize = packed_capacity(ALIAS_MAX_LEN);

/// One directory record: a packed postfix and a packed alias, 15 bytes
/// total. Kept as a flat byte array rather than two nested structs so the
/// in-memory layout matches the snapshot's on-disk layout exactly, with no
/// compiler-inserted padding to reason about.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub struct Entry {
    bytes: [u8; POSTFIX_BYTES + ALIAS_BYTES],
}

impl Entry {
    /// Builds an entry from an already-packed postfix and alias.
    pub(crate) fn from_packed(postfix: &[u8], alias: &[u8]) -> Self {
        let mut bytes = [0u8; POSTFIX_BYTES + ALIAS_BYTES];
        bytes[..postfix.len()].copy_from_slice(postfix);
        bytes[POSTFIX_BYTES..POSTFIX_BYTES + alias.len()].copy_from_slice(alias);
        Self { bytes }
    }

    /// Packs `postfix`/`alias` decimal strings into a new entry.
    pub(crate) fn new(postfix: &str, alias: &str) -> Result<Self> {
        let packed_postfix = digits::pack(postfix, 0, postfix.len(), POSTFIX_MAX_LEN)?;
        let packed_alias = digits::pack(alias, 0, alias.len(), ALIAS_MAX_LEN)?;
        Ok(Self::from_packed(&packed_postfix, &packed_alias))
    }

    /// An entry carrying only a packed postfix, for use as a `Block::search`
    /// key. Its alias bytes are zeroed and must never be read back out —
    /// `Ord`/`Eq` only ever look at `postfix_bytes()`.
    pub(crate) fn search_key(postfix: &str) -> Result<Self> {
        let packed_postfix = digits::pack(postfix, 0, postfix.len(), POSTFIX_MAX_LEN)?;
        Ok(Self::from_packed(&packed_postfix, &[]))
    }

    #[inline(always)]
    pub(crate) fn postfix_bytes(&self) -> &[u8] {
        &self.bytes[..POSTFIX_BYTES]
    }

    #[inline(always)]
    pub(crate) fn alias_bytes(&self) -> &[u8] {
        &self.bytes[POSTFIX_BYTES..]
    }

    /// Decodes the postfix back to a decimal string.
    pub fn postfix(&self) -> Result<String> {
        digits::unpack(self.postfix_bytes())
    }

    /// Decodes the alias back to a decimal string.
    pub fn alias(&self) -> Result<String> {
        digits::unpack(self.alias_bytes())
    }

    /// Overwrites the alias in place, keeping the postfix (and thus this
    /// entry's position in its block) untouched.
    pub(crate) fn set_alias(&mut self, alias: &str) -> Result<()> {
        let packed_alias = digits::pack(alias, 0, alias.len(), ALIAS_MAX_LEN)?;
        self.bytes[POSTFIX_BYTES..POSTFIX_BYTES + packed_alias.len()]
            .copy_from_slice(&packed_alias);
        Ok(())
    }

    /// Serializes to the 15-byte snapshot payload layout.
    #[inline(always)]
    pub(crate) fn to_raw(self) -> [u8; POSTFIX_BYTES + ALIAS_BYTES] {
        self.bytes
    }

    /// Deserializes from the 15-byte snapshot payload layout.
    #[inline(always)]
    pub(crate) fn from_raw(bytes: [u8; POSTFIX_BYTES + ALIAS_BYTES]) -> Self {
        Self { bytes }
    }
}

/// Entries order strictly on postfix bytes, length byte first and then
/// nibbles. This matches numeric order only among postfixes of equal
/// decimal length — a shorter postfix always sorts before a longer one
/// regardless of value, since its length byte is smaller. Blocks are never
/// mixed-length in practice (`insert`/`lookup` always address a fixed
/// number length), so this is not observable in normal use.
impl Ord for Entry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.postfix_bytes().cmp(other.postfix_bytes())
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
