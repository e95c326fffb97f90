//! Merging freshly fetched blocks into a sorted block list
//!
//! New blocks are walked in lock-step with the existing blocks starting at a hint position. A new
//! block starting before the current old block is inserted in front of it, a new block starting
//! at the same offset replaces it. Once the old blocks run out, the rest of the new blocks are
//! appended.
//!
//! The walk is done twice: once over borrowed data to check the merge is possible, then again to
//! move the blocks into place. A rejected merge never touches the list.

use crate::block::LocatedBlock;
use crate::errors::*;
use std::cmp::Ordering;

/// What a merge did to the block list
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Blocks added at offsets not already in the list
    pub inserted: usize,
    /// Existing blocks replaced by a new block with the same start offset
    pub replaced: usize,
}

pub(crate) fn check_sorted(blocks: &[LocatedBlock]) -> Result<()> {
    for (position, pair) in blocks.windows(2).enumerate() {
        let previous = pair[0].start_offset();
        let offset = pair[1].start_offset();
        if offset <= previous {
            return Err(Error::UnsortedEntries {
                position: position + 1,
                previous,
                offset,
            });
        }
    }
    Ok(())
}

/// Check that `new_blocks` can be merged into `blocks` at `hint`
fn plan(blocks: &[LocatedBlock], hint: usize, new_blocks: &[LocatedBlock]) -> Result<MergeStats> {
    if hint > blocks.len() {
        return Err(Error::HintOutOfRange {
            hint,
            count: blocks.len(),
        });
    }
    check_sorted(new_blocks)?;

    if let (Some(first), Some(prev)) = (new_blocks.first(), hint.checked_sub(1).map(|i| &blocks[i]))
    {
        if first.start_offset() <= prev.start_offset() {
            return Err(Error::OrderingContradiction {
                new_offset: first.start_offset(),
                old_offset: prev.start_offset(),
            });
        }
    }

    let mut old_blocks = blocks[hint..].iter();
    let mut old = old_blocks.next();
    let mut replaced = 0;
    for new in new_blocks {
        let old_block = match old {
            Some(old_block) => old_block,
            None => break,
        };
        match new.start_offset().cmp(&old_block.start_offset()) {
            Ordering::Less => {}
            Ordering::Equal => {
                replaced += 1;
                old = old_blocks.next();
            }
            Ordering::Greater => {
                return Err(Error::OrderingContradiction {
                    new_offset: new.start_offset(),
                    old_offset: old_block.start_offset(),
                });
            }
        }
    }

    Ok(MergeStats {
        inserted: new_blocks.len() - replaced,
        replaced,
    })
}

/// Merge `new_blocks` into `blocks`, starting the walk at `hint`
pub(crate) fn merge_range(
    blocks: &mut Vec<LocatedBlock>,
    hint: usize,
    new_blocks: Vec<LocatedBlock>,
) -> Result<MergeStats> {
    let stats = plan(blocks, hint, &new_blocks)?;

    let tail = blocks.split_off(hint);
    blocks.reserve(tail.len() + stats.inserted);
    let mut old = tail.into_iter().peekable();
    for new in new_blocks {
        if let Some(old_block) = old.peek() {
            debug_assert!(new.start_offset() <= old_block.start_offset());
            if old_block.start_offset() == new.start_offset() {
                old.next();
            }
        }
        blocks.push(new);
    }
    blocks.extend(old);

    Ok(stats)
}
