use crate::errors::*;
use repr::{ExtendedBlock, FragmentIndex, Location};
use std::fmt;

/// Renumbered block indices must stay below [`FragmentIndex::UNAVAILABLE`]
pub const MAX_STRIPED_LOCATIONS: usize = FragmentIndex::UNAVAILABLE.0 as usize;

/// How a block's data is spread over its locations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Layout {
    /// Every location holds a full replica
    Contiguous,
    /// Each location holds one internal block of an erasure coded block group
    ///
    /// `block_indices[i]` is the internal block stored at `locations[i]`
    Striped { block_indices: Vec<FragmentIndex> },
}

/// A block of a file, where it starts in the file, and where it can be read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedBlock {
    block: ExtendedBlock,
    start_offset: u64,
    locations: Vec<Location>,
    corrupt: bool,
    cached_locations: Vec<Location>,
    layout: Layout,
}

impl LocatedBlock {
    pub fn contiguous(block: ExtendedBlock, start_offset: u64, locations: Vec<Location>) -> Self {
        Self {
            block,
            start_offset,
            locations,
            corrupt: false,
            cached_locations: Vec::new(),
            layout: Layout::Contiguous,
        }
    }

    /// Create a block group of an erasure coded file
    ///
    /// Fails if there is not exactly one block index per location, or if there are more locations
    /// than [`MAX_STRIPED_LOCATIONS`].
    pub fn striped(
        block: ExtendedBlock,
        start_offset: u64,
        locations: Vec<Location>,
        block_indices: Vec<FragmentIndex>,
    ) -> Result<Self> {
        if locations.len() != block_indices.len() {
            return Err(Error::IndexCountMismatch {
                locations: locations.len(),
                indices: block_indices.len(),
            });
        }
        if locations.len() > MAX_STRIPED_LOCATIONS {
            return Err(Error::TooManyLocations {
                locations: locations.len(),
                max: MAX_STRIPED_LOCATIONS,
            });
        }
        Ok(Self {
            block,
            start_offset,
            locations,
            corrupt: false,
            cached_locations: Vec::new(),
            layout: Layout::Striped { block_indices },
        })
    }

    /// The same block at the same offset, stored at different locations
    pub(crate) fn with_placement(&self, locations: Vec<Location>, layout: Layout) -> Self {
        Self {
            block: self.block.clone(),
            start_offset: self.start_offset,
            locations,
            corrupt: self.corrupt,
            cached_locations: self.cached_locations.clone(),
            layout,
        }
    }

    pub fn with_corrupt(mut self, corrupt: bool) -> Self {
        self.corrupt = corrupt;
        self
    }

    pub fn with_cached_locations(mut self, cached_locations: Vec<Location>) -> Self {
        self.cached_locations = cached_locations;
        self
    }

    pub fn block(&self) -> &ExtendedBlock {
        &self.block
    }

    pub fn start_offset(&self) -> u64 {
        self.start_offset
    }

    /// Number of bytes of the file covered by this block
    pub fn len(&self) -> u64 {
        self.block.num_bytes
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Offset one past the last byte of this block
    pub fn end_offset(&self) -> u64 {
        self.start_offset.saturating_add(self.len())
    }

    pub fn contains(&self, offset: u64) -> bool {
        self.start_offset <= offset && offset - self.start_offset < self.len()
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn is_corrupt(&self) -> bool {
        self.corrupt
    }

    /// The subset of `locations` which have the block cached in memory
    pub fn cached_locations(&self) -> &[Location] {
        &self.cached_locations
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn is_striped(&self) -> bool {
        matches!(self.layout, Layout::Striped { .. })
    }

    /// Block indices of a striped block, `None` for a contiguous block
    pub fn block_indices(&self) -> Option<&[FragmentIndex]> {
        match &self.layout {
            Layout::Contiguous => None,
            Layout::Striped { block_indices } => Some(block_indices),
        }
    }
}

impl fmt::Display for LocatedBlock {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let kind = match self.layout {
            Layout::Contiguous => "LocatedBlock",
            Layout::Striped { .. } => "LocatedStripedBlock",
        };
        write!(
            f,
            "{}{{{}; getBlockSize()={}; corrupt={}; offset={}; locs=[",
            kind,
            self.block,
            self.len(),
            self.corrupt,
            self.start_offset
        )?;
        for (i, location) in self.locations.iter().enumerate() {
            if i != 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", location)?;
        }
        f.write_str("]")?;
        if let Layout::Striped { block_indices } = &self.layout {
            f.write_str("; indices=[")?;
            for (i, idx) in block_indices.iter().enumerate() {
                if i != 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", idx)?;
            }
            f.write_str("]")?;
        }
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use repr::{DatanodeInfo, StorageType};

    fn location(n: u16) -> Location {
        Location::new(
            DatanodeInfo::new(format!("dn-{}", n), "10.0.0.1", 9866 + n),
            format!("DS-{}", n),
            StorageType::Disk,
        )
    }

    #[test]
    fn interval_is_half_open() {
        let block = LocatedBlock::contiguous(ExtendedBlock::new("BP", 1, 100, 1), 100, Vec::new());
        assert!(!block.contains(99));
        assert!(block.contains(100));
        assert!(block.contains(199));
        assert!(!block.contains(200));
        assert_eq!(block.end_offset(), 200);
    }

    #[test]
    fn striped_needs_one_index_per_location() {
        let err = LocatedBlock::striped(
            ExtendedBlock::new("BP", 1, 100, 1),
            0,
            vec![location(0), location(1)],
            vec![FragmentIndex(0)],
        )
        .unwrap_err();
        assert_eq!(
            err,
            Error::IndexCountMismatch {
                locations: 2,
                indices: 1
            }
        );
    }

    #[test]
    fn striped_location_limit() {
        let striped = |n: usize| {
            LocatedBlock::striped(
                ExtendedBlock::new("BP", 1, 100, 1),
                0,
                (0..n as u16).map(location).collect(),
                (0..n).map(|i| FragmentIndex(i as u8)).collect(),
            )
        };
        assert!(striped(MAX_STRIPED_LOCATIONS).is_ok());
        assert_eq!(
            striped(MAX_STRIPED_LOCATIONS + 2).unwrap_err(),
            Error::TooManyLocations {
                locations: 257,
                max: 255
            }
        );
    }

    #[test]
    fn contains_past_u64_max() {
        // Covers [MAX - 5, MAX + 5), so the last representable offset is inside
        let block = LocatedBlock::contiguous(ExtendedBlock::new("BP", 1, 10, 1), u64::MAX - 5, Vec::new());
        assert!(block.contains(u64::MAX));
        let block = LocatedBlock::contiguous(ExtendedBlock::new("BP", 1, 5, 1), u64::MAX - 5, Vec::new());
        assert!(!block.contains(u64::MAX));
    }

    #[test]
    fn display() {
        let block = LocatedBlock::striped(
            ExtendedBlock::new("BP", 7, 10, 3),
            0,
            vec![location(0), location(1)],
            vec![FragmentIndex(0), FragmentIndex::UNAVAILABLE],
        )
        .unwrap()
        .with_corrupt(true);
        let s = block.to_string();
        assert!(s.starts_with("LocatedStripedBlock{BP:blk_7_3; getBlockSize()=10; corrupt=true"));
        assert!(s.ends_with("; indices=[0, -1]}"));
        assert!(block.block_indices().is_some());
        assert!(LocatedBlock::contiguous(ExtendedBlock::default(), 0, Vec::new())
            .block_indices()
            .is_none());
    }
}
