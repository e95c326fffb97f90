//! The "useful" view of an erasure coded file
//!
//! Striped blocks report every location the metadata service knows of, including ones whose
//! internal block is currently unavailable. The useful view drops those locations and renumbers the
//! survivors `0..n`, keeping their order, so readers can address them directly.
//!
//! Only striped blocks make it into the view. Contiguous blocks are left out entirely, so the view
//! of a file with no striped blocks is empty rather than absent.

use crate::block::{Layout, LocatedBlock};
use crate::errors::*;
use repr::FragmentIndex;
use std::ops::Deref;

/// A derived block list, always replaced as a whole
///
/// The last useful block is read from the same list, so the two can never disagree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsefulBlocks {
    blocks: Vec<LocatedBlock>,
}

impl UsefulBlocks {
    /// Use `blocks` as the useful view verbatim
    pub fn from_vec(blocks: Vec<LocatedBlock>) -> Result<Self> {
        if blocks.is_empty() {
            return Err(Error::EmptyUsefulBlocks);
        }
        Ok(Self { blocks })
    }

    pub fn last(&self) -> Option<&LocatedBlock> {
        self.blocks.last()
    }

}

impl Deref for UsefulBlocks {
    type Target = [LocatedBlock];

    fn deref(&self) -> &Self::Target {
        &self.blocks
    }
}

/// What building the useful view left out
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct FilterStats {
    /// Striped blocks in the view
    pub kept_blocks: usize,
    /// Contiguous blocks left out of the view
    pub dropped_plain: usize,
    /// Unavailable locations removed from striped blocks
    pub dropped_fragments: usize,
}

/// Strip the unavailable locations from a striped block
///
/// Returns `None` for a contiguous block.
fn strip_unavailable(block: &LocatedBlock) -> Option<(LocatedBlock, usize)> {
    let block_indices = match block.layout() {
        Layout::Contiguous => return None,
        Layout::Striped { block_indices } => block_indices,
    };

    let available = block_indices.iter().filter(|idx| idx.is_available()).count();
    let mut locations = Vec::with_capacity(available);
    let mut indices = Vec::with_capacity(available);
    for (location, idx) in block.locations().iter().zip(block_indices) {
        if idx.is_available() {
            // Bounded by MAX_STRIPED_LOCATIONS, so never UNAVAILABLE
            indices.push(FragmentIndex(locations.len() as u8));
            locations.push(location.clone());
        }
    }

    let useful = block.with_placement(
        locations,
        Layout::Striped {
            block_indices: indices,
        },
    );
    Some((useful, block_indices.len() - available))
}

/// Build the useful view of `blocks`
pub(crate) fn useful_blocks(blocks: &[LocatedBlock]) -> (UsefulBlocks, FilterStats) {
    let mut stats = FilterStats::default();
    let mut useful = Vec::new();
    for block in blocks {
        match strip_unavailable(block) {
            Some((block, dropped)) => {
                stats.dropped_fragments += dropped;
                useful.push(block);
            }
            None => stats.dropped_plain += 1,
        }
    }
    stats.kept_blocks = useful.len();
    (UsefulBlocks { blocks: useful }, stats)
}
