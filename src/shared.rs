use crate::block::LocatedBlock;
use crate::errors::Result;
use crate::index::PlacementIndex;
use crate::merge::MergeStats;
use crate::search::SearchResult;
use crate::useful::FilterStats;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::sync::Arc;

/// A [`PlacementIndex`] shared between the threads of one read session
///
/// Lookups take a read lock. Merges and useful view updates take a write lock, so a reader never
/// sees a useful view without its matching last block.
#[derive(Debug, Clone)]
pub struct SharedPlacementIndex {
    inner: Arc<RwLock<PlacementIndex>>,
}

impl SharedPlacementIndex {
    pub fn new(index: PlacementIndex) -> Self {
        Self {
            inner: Arc::new(RwLock::new(index)),
        }
    }

    pub fn read(&self) -> RwLockReadGuard<'_, PlacementIndex> {
        self.inner.read()
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, PlacementIndex> {
        self.inner.write()
    }

    pub fn find(&self, offset: u64) -> SearchResult {
        self.read().find(offset)
    }

    /// The block containing `offset`, from whichever list [`PlacementIndex::find`] searches
    pub fn block_at(&self, offset: u64) -> Option<LocatedBlock> {
        let index = self.read();
        let idx = index.find(offset).position()?;
        match index.useful_blocks() {
            Some(useful) => useful.get(idx).cloned(),
            None => index.get(idx).cloned(),
        }
    }

    /// Merge `new_blocks` at the position a lookup of their first offset would return
    ///
    /// The hint is computed under the same write lock as the merge.
    pub fn merge_fetched(&self, new_blocks: Vec<LocatedBlock>) -> Result<MergeStats> {
        let mut index = self.write();
        let hint = match new_blocks.first() {
            Some(first) => index.find_in_base(first.start_offset()).insertion_index(),
            None => index.count(),
        };
        index.insert_range(hint, new_blocks)
    }

    pub fn insert_range(&self, hint: usize, new_blocks: Vec<LocatedBlock>) -> Result<MergeStats> {
        self.write().insert_range(hint, new_blocks)
    }

    pub fn refresh_useful_blocks(&self) -> FilterStats {
        self.write().refresh_useful_blocks()
    }

    pub fn set_useful_blocks(&self, blocks: Vec<LocatedBlock>) -> Result<()> {
        self.write().set_useful_blocks(blocks)
    }

    /// Copy out the useful view and its last block together
    pub fn useful_snapshot(&self) -> Option<(Vec<LocatedBlock>, Option<LocatedBlock>)> {
        let index = self.read();
        let useful = index.useful_blocks()?.to_vec();
        let last = index.last_useful_block().cloned();
        Some((useful, last))
    }
}

impl From<PlacementIndex> for SharedPlacementIndex {
    fn from(index: PlacementIndex) -> Self {
        Self::new(index)
    }
}
