//! Datanodes, storages and locations

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DatanodeInfo {
    pub uuid: String,
    pub host: String,
    pub xfer_port: u16,
}

impl DatanodeInfo {
    pub fn new<U: Into<String>, H: Into<String>>(uuid: U, host: H, xfer_port: u16) -> Self {
        Self {
            uuid: uuid.into(),
            host: host.into(),
            xfer_port,
        }
    }

    /// `host:port` used to open a data transfer connection
    pub fn xfer_addr(&self) -> String {
        format!("{}:{}", self.host, self.xfer_port)
    }
}

impl fmt::Display for DatanodeInfo {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.xfer_addr())
    }
}

/// The kind of medium a replica is stored on
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StorageType {
    RamDisk,
    Ssd,
    Disk,
    Archive,
    Provided,
    Nvdimm,
}

impl Default for StorageType {
    fn default() -> Self {
        StorageType::Disk
    }
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            StorageType::RamDisk => "RAM_DISK",
            StorageType::Ssd => "SSD",
            StorageType::Disk => "DISK",
            StorageType::Archive => "ARCHIVE",
            StorageType::Provided => "PROVIDED",
            StorageType::Nvdimm => "NVDIMM",
        };
        f.write_str(name)
    }
}

/// One place a block (or one fragment of a striped block) is stored
///
/// The storage id and type travel with the datanode so the per-location metadata can never get out
/// of step with the location list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    pub datanode: DatanodeInfo,
    pub storage_id: String,
    pub storage_type: StorageType,
}

impl Location {
    pub fn new<S: Into<String>>(
        datanode: DatanodeInfo,
        storage_id: S,
        storage_type: StorageType,
    ) -> Self {
        Self {
            datanode,
            storage_id: storage_id.into(),
            storage_type,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "DatanodeInfoWithStorage[{},{},{}]",
            self.datanode, self.storage_id, self.storage_type
        )
    }
}
