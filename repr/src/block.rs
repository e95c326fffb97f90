//! Block identity

use std::fmt;

/// Identifies one block within a block pool.
///
/// The generation stamp changes every time the block is recovered or appended to, so two
/// `ExtendedBlock`s with the same `block_id` may still refer to different replicas.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ExtendedBlock {
    pub pool_id: String,
    pub block_id: u64,
    /// Number of bytes in the block
    pub num_bytes: u64,
    pub generation_stamp: u64,
}

impl ExtendedBlock {
    pub fn new<S: Into<String>>(
        pool_id: S,
        block_id: u64,
        num_bytes: u64,
        generation_stamp: u64,
    ) -> Self {
        Self {
            pool_id: pool_id.into(),
            block_id,
            num_bytes,
            generation_stamp,
        }
    }
}

impl fmt::Display for ExtendedBlock {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}:blk_{}_{}",
            self.pool_id, self.block_id, self.generation_stamp
        )
    }
}

#[test]
fn display() {
    let block = ExtendedBlock::new("BP-1", 1073741825, 128, 1001);
    assert_eq!(block.to_string(), "BP-1:blk_1073741825_1001");
}
