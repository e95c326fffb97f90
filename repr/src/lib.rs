//! Value types describing where the blocks of a distributed file live.
//!
//! These are produced by the metadata service and handed to the placement index as-is:
//!
//! * [Block identity](block/index.html)
//! * [Datanodes, storages and locations](location/index.html)
//! * [Erasure coded fragment indices](fragment/index.html)
//! * [Erasure coding policy](erasure/index.html)
//! * [Encryption info](encryption/index.html)

pub mod block;
pub mod encryption;
pub mod erasure;
pub mod fragment;
pub mod location;

pub use block::ExtendedBlock;
pub use encryption::FileEncryptionInfo;
pub use erasure::{EcSchema, ErasureCodingPolicy};
pub use fragment::FragmentIndex;
pub use location::{DatanodeInfo, Location, StorageType};
