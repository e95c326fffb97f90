use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A caller broke one of the index's preconditions
///
/// These are programming errors: block lists handed to the index are expected to be validated by
/// whatever fetched them from the metadata service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("located blocks must be sorted by start offset: offset {offset} at position {position} does not follow {previous}")]
    UnsortedEntries {
        position: usize,
        previous: u64,
        offset: u64,
    },
    #[error("insert hint {hint} is past the end of {count} blocks")]
    HintOutOfRange { hint: usize, count: usize },
    #[error("new block at offset {new_offset} cannot be merged before existing block at offset {old_offset}")]
    OrderingContradiction { new_offset: u64, old_offset: u64 },
    #[error("striped block has {locations} locations but {indices} block indices")]
    IndexCountMismatch { locations: usize, indices: usize },
    #[error("striped block has {locations} locations, at most {max} are addressable")]
    TooManyLocations { locations: usize, max: usize },
    #[error("useful block list must not be empty")]
    EmptyUsefulBlocks,
    #[error("no located blocks have been loaded")]
    NoBlocks,
}
