//!
//! The fixed-size array of `(lock, optional block)` slots, one per live
//! 6-digit prefix value.
//!

use parking_lot::{Mutex, MutexGuard};

use crate::block::Block;
use crate::config::{Config, DIRECTORY_LEN, OFFSET};
use crate::error::{Error, Result};

/// One directory slot: its own mutex guarding an optionally-present block.
/// No block is ever shared across slots, and the directory owns every
/// block outright.
struct Shard {
    block: Mutex<Option<Block>>,
}

impl Shard {
    fn empty() -> Self {
        Self {
            block: Mutex::new(None),
        }
    }
}

/// The directory: `10^PREFIX_LEN - OFFSET` shards, allocated once at
/// construction and never resized — sizing the directory is a one-shot,
/// process-start decision, per spec's Non-goals (no bounded-memory
/// eviction).
///
/// Unlike the teacher's process-wide `static` database handle, this is an
/// explicit owned value: construct one with `Directory::new`/`init`, and
/// pass it (or a reference to it) to every operation. Nothing here is a
/// global.
pub struct Directory {
    shards: Vec<Shard>,
    config: Config,
}

impl Directory {
    /// Allocates a directory with all slots empty and unlocked.
    pub fn new(config: Config) -> Self {
        let shards = (0..DIRECTORY_LEN).map(|_| Shard::empty()).collect();
        Self { shards, config }
    }

    #[inline(always)]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[inline(always)]
    pub fn grow_quantum(&self) -> usize {
        self.config.grow_quantum
    }

    #[inline(always)]
    pub fn max_number_len(&self) -> usize {
        self.config.max_number_len
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.shards.len()
    }

    /// Maps a 6-digit prefix value to its slot index, rejecting prefixes
    /// below `OFFSET`.
    pub(crate) fn slot_index_for_prefix(prefix_value: u32) -> Result<usize> {
        if prefix_value < OFFSET {
            return Err(Error::Illegal);
        }
        Ok((prefix_value - OFFSET) as usize)
    }

    /// Inverse of `slot_index_for_prefix`, used by the snapshot codec.
    pub(crate) fn prefix_for_slot_index(slot_index: usize) -> u32 {
        slot_index as u32 + OFFSET
    }

    /// Locks the shard at `slot_index` for the duration of the returned
    /// guard. Panics on an out-of-range index: that can only happen from a
    /// programmer bug (an invalid prefix never makes it past
    /// `slot_index_for_prefix`).
    pub(crate) fn lock(&self, slot_index: usize) -> MutexGuard<'_, Option<Block>> {
        self.shards[slot_index].block.lock()
    }

    /// `true` if `slot_index` holds no block, without locking (racy by
    /// construction — callers that need a consistent answer must lock
    /// themselves).
    #[cfg(test)]
    pub(crate) fn is_empty_slot(&self, slot_index: usize) -> bool {
        self.shards[slot_index].block.lock().is_none()
    }
}
