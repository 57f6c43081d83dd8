//!
//! Binary snapshot/restore codec.
//!
//! Layout: one record per directory slot, in ascending slot order, each:
//!
//! ```text
//! prefix_value : u64 big-endian
//! cap          : u64 big-endian
//! len          : u64 big-endian
//! entries      : len * 15 raw bytes (Entry::to_raw layout)
//! ```
//!
//! There is no magic number, version tag, or checksum — restoring into a
//! directory built from a different `Config` (different `max_number_len`,
//! in particular) is undefined. Callers own matching the `Config` across a
//! snapshot/restore pair. Restoring is not safe to run concurrently with
//! any other operation against the same `Directory`: the caller must
//! quiesce all other access first.
//!

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};

use crate::block::Block;
use crate::directory::Directory;
use crate::entry::{Entry, ALIAS_BYTES, POSTFIX_BYTES};
use crate::error::{Error, Result};

const ENTRY_RAW_LEN: usize = POSTFIX_BYTES + ALIAS_BYTES;

/// Writes every slot of `directory` to `path`, locking one shard at a time
/// (so a concurrent writer sees a consistent-per-shard, not
/// consistent-whole-directory, snapshot).
pub fn write(directory: &Directory, path: &str) -> Result<()> {
    let file = File::create(path)?;
    let mut out = BufWriter::new(file);

    for slot_index in 0..directory.len() {
        let prefix_value = Directory::prefix_for_slot_index(slot_index) as u64;
        let guard = directory.lock(slot_index);
        let (cap, len) = match guard.as_ref() {
            Some(block) => (block.cap() as u64, block.len() as u64),
            None => (0, 0),
        };

        out.write_all(&prefix_value.to_be_bytes())?;
        out.write_all(&cap.to_be_bytes())?;
        out.write_all(&len.to_be_bytes())?;
        if let Some(block) = guard.as_ref() {
            for entry in block.entries() {
                out.write_all(&entry.to_raw())?;
            }
        }
    }
    out.flush()?;
    Ok(())
}

/// Replaces every slot of `directory` with the contents of the snapshot at
/// `path`, in file order. A slot whose record has `len == 0` is left
/// empty; every other slot gets a freshly allocated `Block` sized to the
/// record's `cap`.
pub fn read(directory: &Directory, path: &str) -> Result<()> {
    let file = File::open(path)?;
    let mut input = BufReader::new(file);

    let mut header = [0u8; 24];
    let mut raw_entry = [0u8; ENTRY_RAW_LEN];

    for slot_index in 0..directory.len() {
        input.read_exact(&mut header)?;
        let prefix_value = u64::from_be_bytes(header[0..8].try_into().unwrap());
        let cap = u64::from_be_bytes(header[8..16].try_into().unwrap()) as usize;
        let len = u64::from_be_bytes(header[16..24].try_into().unwrap()) as usize;

        if prefix_value != Directory::prefix_for_slot_index(slot_index) as u64 {
            return Err(Error::CorruptSnapshot);
        }
        if len > cap {
            return Err(Error::CorruptSnapshot);
        }

        let mut guard = directory.lock(slot_index);
        if len == 0 {
            *guard = None;
            continue;
        }

        let mut entries = Vec::with_capacity(len);
        for _ in 0..len {
            input.read_exact(&mut raw_entry)?;
            entries.push(Entry::from_raw(raw_entry));
        }
        if !entries.windows(2).all(|w| w[0] < w[1]) {
            return Err(Error::CorruptSnapshot);
        }
        *guard = Some(Block::from_parts(entries, cap, directory.grow_quantum()));
    }
    Ok(())
}
