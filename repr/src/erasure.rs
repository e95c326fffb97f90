//! Erasure coding policy

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EcSchema {
    /// Codec name, e.g. `rs` or `xor`
    pub codec: String,
    pub data_units: u8,
    pub parity_units: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ErasureCodingPolicy {
    pub id: u8,
    pub name: String,
    pub schema: EcSchema,
    /// Size of one striping cell in bytes
    pub cell_size: u32,
}

impl ErasureCodingPolicy {
    pub fn new<S: Into<String>>(codec: S, data_units: u8, parity_units: u8, cell_size: u32) -> Self {
        let codec = codec.into();
        let name = format!(
            "{}-{}-{}-{}k",
            codec.to_uppercase(),
            data_units,
            parity_units,
            cell_size / 1024
        );
        Self {
            id: 0,
            name,
            schema: EcSchema {
                codec,
                data_units,
                parity_units,
            },
            cell_size,
        }
    }
}

impl fmt::Display for ErasureCodingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "ErasureCodingPolicy=[Name={}, Schema=[{}, {}+{}], CellSize={}, Id={}]",
            self.name,
            self.schema.codec,
            self.schema.data_units,
            self.schema.parity_units,
            self.cell_size,
            self.id
        )
    }
}

#[test]
fn policy_name() {
    let policy = ErasureCodingPolicy::new("rs", 6, 3, 1024 * 1024);
    assert_eq!(policy.name, "RS-6-3-1024k");
    assert_eq!(policy.schema.data_units, 6);
    assert_eq!(policy.schema.parity_units, 3);
}
