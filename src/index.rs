//!
//! `NumberDirectory`: the public-facing core, translating a number into a
//! (prefix -> shard, postfix) key and driving the `Block`/`Directory`
//! layers underneath. This is the `init`/`insert`/`lookup`/`delete`/
//! `get_block`/`get_range`/`get_window_around` surface from spec §6.
//!

use crate::block::{Block, RemoveOutcome, SearchResult};
use crate::config::{Config, PREFIX_LEN};
use crate::directory::Directory;
use crate::entry::{Entry, ALIAS_MAX_LEN};
use crate::error::{Error, Result};
use crate::snapshot;

/// Outcome of `get_window_around`: whether the full requested window
/// (`before + 1 + after` entries) was available, or fewer were found.
/// Either way the returned list is sorted and duplicate-free; `NotFound`
/// (no entry anywhere in the directory) is instead surfaced as `Err`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowOutcome {
    Complete(Vec<(String, String)>),
    Partial(Vec<(String, String)>),
}

impl WindowOutcome {
    pub fn entries(&self) -> &[(String, String)] {
        match self {
            WindowOutcome::Complete(v) | WindowOutcome::Partial(v) => v,
        }
    }
}

/// The telephone-number alias directory.
pub struct NumberDirectory {
    directory: Directory,
}

fn all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

impl NumberDirectory {
    /// Creates an empty directory, then restores it from
    /// `config.snapshot_path` if one is set and the file exists.
    pub fn init(config: Config) -> Result<Self> {
        let snapshot_path = config.snapshot_path.clone();
        let mut me = Self {
            directory: Directory::new(config),
        };
        if let Some(path) = snapshot_path {
            if std::path::Path::new(&path).exists() {
                me.restore(&path)?;
            }
        }
        Ok(me)
    }

    /// Wraps an already-constructed, empty `Directory`. Mostly useful in
    /// tests that want to bypass the snapshot-restore step of `init`.
    pub fn with_directory(directory: Directory) -> Self {
        Self { directory }
    }

    #[inline(always)]
    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    fn max_number_len(&self) -> usize {
        self.directory.max_number_len()
    }

    /// Validates and splits `number` into its 6-digit prefix value and
    /// postfix string. `TooShort` if shorter than the prefix; `Illegal` if
    /// it contains non-digit characters, is longer than the configured
    /// maximum, or its prefix value falls below `OFFSET`.
    fn split_number<'a>(&self, number: &'a str) -> Result<(u32, &'a str)> {
        if number.len() < PREFIX_LEN {
            return Err(Error::TooShort);
        }
        if number.len() > self.max_number_len() || !all_digits(number) {
            return Err(Error::Illegal);
        }
        let prefix_value: u32 = number[..PREFIX_LEN].parse().map_err(|_| Error::Illegal)?;
        Ok((prefix_value, &number[PREFIX_LEN..]))
    }

    /// `parse_decimal(number[0..PREFIX_LEN]) - OFFSET`, spec §4.3.
    pub fn prefix_index_of(&self, number: &str) -> Result<usize> {
        let (prefix_value, _) = self.split_number(number)?;
        Directory::slot_index_for_prefix(prefix_value)
    }

    fn validate_alias(&self, alias: &str) -> Result<()> {
        if alias.len() < PREFIX_LEN {
            return Err(Error::TooShort);
        }
        if alias.len() > self.max_number_len().min(ALIAS_MAX_LEN) || !all_digits(alias) {
            return Err(Error::Illegal);
        }
        Ok(())
    }

    fn slot_index_and_postfix<'a>(&self, number: &'a str) -> Result<(usize, &'a str)> {
        let (prefix_value, postfix) = self.split_number(number)?;
        let slot_index = Directory::slot_index_for_prefix(prefix_value)?;
        Ok((slot_index, postfix))
    }

    /// Inserts `alias` under `number`, creating the shard's block lazily.
    /// Overwrites the alias in place if `number` already exists — this is
    /// idempotent by design, per spec §7.
    pub fn insert(&self, number: &str, alias: &str) -> Result<()> {
        let (slot_index, postfix) = self.slot_index_and_postfix(number)?;
        self.validate_alias(alias)?;
        let entry = Entry::new(postfix, alias)?;

        let mut guard = self.directory.lock(slot_index);
        let block = guard.get_or_insert_with(|| Block::new(self.directory.grow_quantum()));
        block.insert(entry);
        Ok(())
    }

    /// `Some(alias)` if `number` exists, `None` otherwise — a miss is not
    /// an error, per spec §7's `AbsentOk`.
    pub fn lookup(&self, number: &str) -> Result<Option<String>> {
        let (slot_index, postfix) = self.slot_index_and_postfix(number)?;
        let key = Entry::search_key(postfix)?;

        let guard = self.directory.lock(slot_index);
        let Some(block) = guard.as_ref() else {
            return Ok(None);
        };
        match block.search(&key) {
            SearchResult::Found(i) => Ok(Some(block.entries()[i].alias()?)),
            SearchResult::NotFound(_) => Ok(None),
        }
    }

    /// Removes `number` if present; a miss is success, not an error, per
    /// spec §7.
    pub fn delete(&self, number: &str) -> Result<()> {
        let (slot_index, postfix) = self.slot_index_and_postfix(number)?;
        let key = Entry::search_key(postfix)?;

        let mut guard = self.directory.lock(slot_index);
        let Some(block) = guard.as_mut() else {
            return Ok(());
        };
        if block.remove(&key) == RemoveOutcome::Removed && block.is_empty() {
            // Null the slot before the block is dropped (spec's Design
            // Notes: never free-then-write, as the source's last-entry
            // path did).
            let emptied = guard.take();
            drop(emptied);
        }
        Ok(())
    }

    /// A deep, directory-independent copy of the whole block backing
    /// `number`'s prefix, or `None` if that shard has no block.
    pub fn get_block(&self, number: &str) -> Result<Option<Block>> {
        let slot_index = self.prefix_index_of(number)?;
        let guard = self.directory.lock(slot_index);
        Ok(guard.clone())
    }

    /// Entries of `number`'s shard whose postfix falls in the range
    /// obtained by padding `number` with `postfix_range_len` more '0'
    /// digits (inclusive lower bound) resp. '9' digits (inclusive upper
    /// bound), per spec §4.3. Always confined to a single shard.
    ///
    /// Because entry order is lexicographic over the *packed* postfix
    /// (length byte first, nibbles after — see `entry::Entry`), a range
    /// whose padded postfix length does not match the stored entries'
    /// postfix length can legitimately come back empty: e.g. padding a
    /// 1-digit postfix out to 3 digits will never compare equal in length
    /// to a block whose entries all carry 4-digit postfixes. This mirrors
    /// the source's packed-comparison semantics exactly.
    pub fn get_range(&self, number: &str, postfix_range_len: &str) -> Result<Block> {
        let (slot_index, postfix) = self.slot_index_and_postfix(number)?;
        let range_len: usize = postfix_range_len.parse().map_err(|_| Error::Illegal)?;

        let guard = self.directory.lock(slot_index);
        let quantum = self.directory.grow_quantum();
        let Some(block) = guard.as_ref() else {
            return Ok(Block::new(quantum));
        };

        let pad_len = range_len.min(self.max_number_len().saturating_sub(PREFIX_LEN + postfix.len()));
        let lo_postfix = format!("{postfix}{}", "0".repeat(pad_len));
        let hi_postfix = format!("{postfix}{}", "9".repeat(pad_len));
        let lo_key = Entry::search_key(&lo_postfix)?;
        let hi_key = Entry::search_key(&hi_postfix)?;

        let from_idx = match block.search(&lo_key) {
            SearchResult::Found(i) => i,
            SearchResult::NotFound(i) => i,
        };
        let to_idx = match block.search(&hi_key) {
            SearchResult::Found(i) => Some(i),
            SearchResult::NotFound(0) => None,
            SearchResult::NotFound(i) => Some(i - 1),
        };

        match to_idx {
            Some(to_idx) if from_idx <= to_idx && from_idx < block.len() => {
                Ok(block.copy_range(from_idx, to_idx).unwrap_or_else(|| Block::new(quantum)))
            }
            _ => Ok(Block::new(quantum)),
        }
    }

    fn full_number(&self, slot_index: usize, entry: &Entry) -> Result<String> {
        let prefix_value = Directory::prefix_for_slot_index(slot_index);
        Ok(format!("{:0width$}{}", prefix_value, entry.postfix()?, width = PREFIX_LEN))
    }

    /// The sorted window of at most `before + 1 + after` entries centered
    /// on `number` (or on the nearest shard's edge entry if `number` is
    /// absent), holding at most one shard lock at a time. See spec §4.4
    /// for the full algorithm; this is a direct translation.
    pub fn get_window_around(
        &self,
        number: &str,
        mut before: usize,
        mut after: usize,
    ) -> Result<WindowOutcome> {
        let requested = before + 1 + after;
        let home_slot = self.prefix_index_of(number)?;
        let (_, postfix) = self.split_number(number)?;
        let pivot_key = Entry::search_key(postfix)?;

        let mut out: Vec<(String, String)> = Vec::with_capacity(requested);

        // Steps 1-2: locate the pivot and emit its block's own local
        // window, holding only that one shard's lock.
        let pivot_slot;
        {
            let guard = self.directory.lock(home_slot);
            let hit = guard.as_ref().and_then(|b| match b.search(&pivot_key) {
                SearchResult::Found(i) => Some(i),
                SearchResult::NotFound(_) => None,
            });
            if let Some(pivot_idx) = hit {
                pivot_slot = home_slot;
                let block = guard.as_ref().expect("hit implies a block");
                self.emit_local_window(block, pivot_slot, pivot_idx, &mut before, &mut after, &mut out)?;
            } else {
                drop(guard);
                match self.find_nearest_pivot(home_slot)? {
                    Some((slot, guard, idx)) => {
                        pivot_slot = slot;
                        let block = guard.as_ref().expect("pivot shard has a block");
                        self.emit_local_window(block, pivot_slot, idx, &mut before, &mut after, &mut out)?;
                    }
                    None => return Err(Error::NotFound),
                }
            }
        }

        // Step 3: extend backward, one shard lock at a time.
        let mut shard = pivot_slot;
        while before > 0 && shard > 0 {
            shard -= 1;
            let g = self.directory.lock(shard);
            if let Some(b) = g.as_ref() {
                if !b.is_empty() {
                    let take = before.min(b.len());
                    let start = b.len() - take;
                    for e in &b.entries()[start..] {
                        out.push((self.full_number(shard, e)?, e.alias()?));
                    }
                    before -= take;
                }
            }
        }

        // Step 4: extend forward, symmetric.
        let mut shard = pivot_slot;
        while after > 0 && shard + 1 < self.directory.len() {
            shard += 1;
            let g = self.directory.lock(shard);
            if let Some(b) = g.as_ref() {
                if !b.is_empty() {
                    let take = after.min(b.len());
                    for e in &b.entries()[..take] {
                        out.push((self.full_number(shard, e)?, e.alias()?));
                    }
                    after -= take;
                }
            }
        }

        // Step 5: sort — concurrent mutation of already-visited shards can
        // leave `out` out of global order, so the final sort is what
        // restores the ordering contract, not the collection order.
        out.sort();

        if out.len() >= requested {
            Ok(WindowOutcome::Complete(out))
        } else {
            Ok(WindowOutcome::Partial(out))
        }
    }

    /// Pushes the pivot block's own contribution to a window query onto
    /// `out`: up to `*before` entries below `pivot_idx`, the pivot entry
    /// itself, and up to `*after` entries above it, decrementing `before`/
    /// `after` by however many were actually available locally.
    fn emit_local_window(
        &self,
        block: &Block,
        slot: usize,
        pivot_idx: usize,
        before: &mut usize,
        after: &mut usize,
        out: &mut Vec<(String, String)>,
    ) -> Result<()> {
        let entries = block.entries();
        let lo = pivot_idx.saturating_sub(*before);
        for e in &entries[lo..pivot_idx] {
            out.push((self.full_number(slot, e)?, e.alias()?));
        }
        *before -= pivot_idx - lo;
        out.push((
            self.full_number(slot, &entries[pivot_idx])?,
            entries[pivot_idx].alias()?,
        ));
        let hi = (pivot_idx + 1 + *after).min(entries.len());
        for e in &entries[pivot_idx + 1..hi] {
            out.push((self.full_number(slot, e)?, e.alias()?));
        }
        *after -= hi - (pivot_idx + 1);
        Ok(())
    }

    /// Walks shards upward from `start` (inclusive) for the first
    /// non-empty block, taking its lowest entry as pivot; if none is found
    /// up to the end of the directory, walks downward from `start - 1`
    /// taking the highest entry of the first non-empty block found.
    /// Leaves the winning shard's lock held in the returned guard.
    fn find_nearest_pivot(
        &self,
        start: usize,
    ) -> Result<Option<(usize, parking_lot::MutexGuard<'_, Option<Block>>, usize)>> {
        for shard in start..self.directory.len() {
            let guard = self.directory.lock(shard);
            if guard.as_ref().is_some_and(|b| !b.is_empty()) {
                return Ok(Some((shard, guard, 0)));
            }
        }
        for shard in (0..start).rev() {
            let guard = self.directory.lock(shard);
            if let Some(b) = guard.as_ref() {
                if !b.is_empty() {
                    let idx = b.len() - 1;
                    return Ok(Some((shard, guard, idx)));
                }
            }
        }
        Ok(None)
    }

    /// Binary snapshot of the whole directory to `path`. See the
    /// `snapshot` module for the exact byte layout.
    pub fn snapshot(&self, path: &str) -> Result<()> {
        snapshot::write(&self.directory, path)
    }

    /// Restores the directory from a previous `snapshot`. Must not run
    /// concurrently with any other operation on this directory — see the
    /// `snapshot` module.
    pub fn restore(&mut self, path: &str) -> Result<()> {
        snapshot::read(&self.directory, path)
    }
}
