//!
//! Configuration knobs the core reads. The file reader that produces a
//! `Config` (TOML, JSON, environment, ...) is an external collaborator —
//! out of scope here, same as spec.md scopes it — but the struct itself,
//! and its defaults, belong to the core.
//!

use serde::{Deserialize, Serialize};

/// Digits used to select a shard. This version only supports the spec
/// default of 6; it is kept as a field (rather than a `const`) so a
/// `Config` round-trips cleanly through serde, and so that a future
/// version widening the directory has somewhere to put the knob.
pub const PREFIX_LEN: usize = 6;

/// `10^PREFIX_LEN`.
pub const PREFIX_SPACE: u32 = 10u32.pow(PREFIX_LEN as u32);
/// `10^(PREFIX_LEN - 1)`: prefixes below this are illegal (leading zero).
pub const OFFSET: u32 = 10u32.pow(PREFIX_LEN as u32 - 1);
/// Number of live directory slots: `10^PREFIX_LEN - OFFSET`.
pub const DIRECTORY_LEN: usize = (PREFIX_SPACE - OFFSET) as usize;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Digits used to select a shard. Must be 6 in this version; kept for
    /// documentation/forward-compatibility rather than enforced as a
    /// runtime-configurable value.
    pub prefix_len: usize,
    /// Maximum digits in a number, prefix included.
    pub max_number_len: usize,
    /// Block grow/shrink step.
    pub grow_quantum: usize,
    /// Where `Directory::init` looks for a snapshot to restore from, if
    /// any.
    pub snapshot_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prefix_len: PREFIX_LEN,
            max_number_len: crate::entry::ALIAS_MAX_LEN,
            grow_quantum: 10,
            snapshot_path: None,
        }
    }
}
