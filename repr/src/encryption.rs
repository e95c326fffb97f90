//! Encryption info
//!
//! Only carried through; the placement index never looks inside.

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileEncryptionInfo {
    pub cipher_suite: String,
    pub key_name: String,
    pub ez_key_version_name: String,
    pub edek: Vec<u8>,
    pub iv: Vec<u8>,
}
