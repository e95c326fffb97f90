//! A sorted index of where the blocks of a distributed file are stored
//!
//! [`PlacementIndex`] holds the located blocks of one file, as reported by the metadata service.
//! It answers "which block holds this offset", merges in block locations re-fetched after a failed
//! read, and derives the view of an erasure coded file with unavailable fragments stripped out.

use once_cell::sync::OnceCell;
use slog::{Drain, Logger};

pub mod block;
pub mod config;
mod errors;
pub mod index;
pub mod merge;
pub mod search;
pub mod shared;
pub mod useful;

pub use block::{Layout, LocatedBlock, MAX_STRIPED_LOCATIONS};
pub use config::{Config, Validation};
pub use errors::{Error, Result};
pub use index::{PlacementIndex, PlacementIndexBuilder};
pub use merge::MergeStats;
pub use search::{to_insertion_index, SearchResult};
pub use shared::SharedPlacementIndex;
pub use useful::{FilterStats, UsefulBlocks};

pub use repr;

/// A logger which forwards to the `log` crate
pub fn default_logger() -> Logger {
    static INSTANCE: OnceCell<Logger> = OnceCell::new();

    INSTANCE
        .get_or_init(|| slog::Logger::root(slog_stdlog::StdLog.fuse(), slog::o!()))
        .clone()
}
