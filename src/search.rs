//! Offset lookup over a sorted block list
//!
//! Lookups report a miss the way `Collections.binarySearch` style APIs do: a negative number
//! `-(p + 1)` where `p` is the position a block starting at the requested offset would be inserted
//! at. [`SearchResult`] wraps that encoding, and [`to_insertion_index`] decodes a raw value.

use crate::block::LocatedBlock;
use std::cmp::Ordering;
use std::fmt;

/// The result of looking up the block covering an offset
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SearchResult(i64);

impl SearchResult {
    pub fn found(idx: usize) -> Self {
        SearchResult(idx as i64)
    }

    pub fn not_found(insertion_idx: usize) -> Self {
        SearchResult(-(insertion_idx as i64) - 1)
    }

    /// Wrap a raw encoded result
    pub fn from_encoded(encoded: i64) -> Self {
        SearchResult(encoded)
    }

    /// The raw encoded result: a position if non-negative, `-(insertion point + 1)` otherwise
    pub fn encoded(self) -> i64 {
        self.0
    }

    pub fn is_found(self) -> bool {
        self.0 >= 0
    }

    /// Position of the block containing the offset, if there is one
    pub fn position(self) -> Option<usize> {
        if self.is_found() {
            Some(self.0 as usize)
        } else {
            None
        }
    }

    /// Position of the found block, or where a block starting at the offset would be inserted
    pub fn insertion_index(self) -> usize {
        to_insertion_index(self.0)
    }
}

impl From<Result<usize, usize>> for SearchResult {
    fn from(res: Result<usize, usize>) -> Self {
        match res {
            Ok(idx) => SearchResult::found(idx),
            Err(idx) => SearchResult::not_found(idx),
        }
    }
}

impl From<SearchResult> for Result<usize, usize> {
    fn from(res: SearchResult) -> Self {
        match res.position() {
            Some(idx) => Ok(idx),
            None => Err(res.insertion_index()),
        }
    }
}

impl fmt::Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Decode a raw search result into a plain position
///
/// Non-negative results are returned unchanged, negative results `r` map to `-(r + 1)`.
pub fn to_insertion_index(search_result: i64) -> usize {
    if search_result >= 0 {
        search_result as usize
    } else {
        // -(r + 1) without overflowing on i64::MIN
        (!search_result) as usize
    }
}

/// Order a block against the interval `[start, end)`
///
/// The two are equal if either one contains the other, otherwise the one with the smaller start
/// is less. Ends are widened so neither interval is clipped at `u64::MAX`.
fn compare_interval(block: &LocatedBlock, start: u128, end: u128) -> Ordering {
    let block_start = u128::from(block.start_offset());
    let block_end = block_start + u128::from(block.len());
    if (block_start <= start && end <= block_end) || (start <= block_start && block_end <= end) {
        Ordering::Equal
    } else if block_start < start {
        Ordering::Less
    } else {
        Ordering::Greater
    }
}

/// Find the block containing `offset` in a list sorted by start offset
pub(crate) fn find_block(blocks: &[LocatedBlock], offset: u64) -> SearchResult {
    let start = u128::from(offset);
    blocks
        .binary_search_by(|block| compare_interval(block, start, start + 1))
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use repr::ExtendedBlock;

    fn block(start: u64, len: u64) -> LocatedBlock {
        LocatedBlock::contiguous(ExtendedBlock::new("BP", start, len, 1), start, Vec::new())
    }

    #[test]
    fn insertion_index() {
        assert_eq!(to_insertion_index(0), 0);
        assert_eq!(to_insertion_index(5), 5);
        assert_eq!(to_insertion_index(-1), 0);
        assert_eq!(to_insertion_index(-3), 2);
        assert_eq!(to_insertion_index(i64::MIN), i64::MAX as usize);
    }

    #[test]
    fn result_conversions() {
        let hit = SearchResult::found(4);
        assert_eq!(hit.encoded(), 4);
        assert_eq!(hit.position(), Some(4));
        assert_eq!(Result::<usize, usize>::from(hit), Ok(4));

        let miss = SearchResult::not_found(2);
        assert_eq!(miss.encoded(), -3);
        assert_eq!(miss.position(), None);
        assert_eq!(miss.insertion_index(), 2);
        assert_eq!(Result::<usize, usize>::from(miss), Err(2));
        assert_eq!(SearchResult::from(Err(2)), miss);
        assert_eq!(SearchResult::from_encoded(-3), miss);
    }

    #[test]
    fn lookup() {
        let blocks = [block(0, 100), block(100, 50)];
        assert_eq!(find_block(&blocks, 0), SearchResult::found(0));
        assert_eq!(find_block(&blocks, 50), SearchResult::found(0));
        assert_eq!(find_block(&blocks, 99), SearchResult::found(0));
        assert_eq!(find_block(&blocks, 120), SearchResult::found(1));
        let past_end = find_block(&blocks, 150);
        assert!(!past_end.is_found());
        assert_eq!(past_end.insertion_index(), 2);
    }

    #[test]
    fn gaps() {
        let blocks = [block(0, 10), block(20, 10), block(40, 10)];
        // The end of a block is exclusive
        assert_eq!(find_block(&blocks, 10), SearchResult::not_found(1));
        assert_eq!(find_block(&blocks, 35), SearchResult::not_found(2));
        assert_eq!(find_block(&blocks, 45), SearchResult::found(2));
        assert_eq!(find_block(&[], 45), SearchResult::not_found(0));
    }

    #[test]
    fn empty_block_contained_by_probe() {
        let blocks = [block(0, 10), block(10, 0), block(20, 10)];
        assert_eq!(find_block(&blocks, 10), SearchResult::found(1));
    }

    #[test]
    fn max_offset() {
        let blocks = [block(0, 10)];
        assert_eq!(find_block(&blocks, u64::MAX), SearchResult::not_found(1));
    }

    #[test]
    fn block_ending_at_max_offset() {
        let blocks = [block(u64::MAX - 5, 5)];
        assert!(!blocks[0].contains(u64::MAX));
        assert_eq!(find_block(&blocks, u64::MAX), SearchResult::not_found(1));
        assert_eq!(find_block(&blocks, u64::MAX - 1), SearchResult::found(0));

        let blocks = [block(u64::MAX - 5, 10)];
        assert_eq!(find_block(&blocks, u64::MAX), SearchResult::found(0));
    }
}
