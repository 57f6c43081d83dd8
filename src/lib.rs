#![doc = include_str!("../README.md")]

pub mod block;
pub mod config;
pub mod digits;
pub mod directory;
pub mod entry;
pub mod error;
pub mod index;
pub mod snapshot;

pub use block::{Block, InsertOutcome, RemoveOutcome, SearchResult};
pub use config::Config;
pub use directory::Directory;
pub use entry::Entry;
pub use error::{Error, Result};
pub use index::{NumberDirectory, WindowOutcome};
