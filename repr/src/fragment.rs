//! Erasure coded fragment indices
//!
//! A striped block is split into `data_units + parity_units` internal blocks. Every location of a
//! striped block carries the index of the internal block it stores. The metadata service reports
//! locations it knows about but cannot currently serve with the [`FragmentIndex::UNAVAILABLE`]
//! index.

use std::fmt;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FragmentIndex(pub u8);

impl FragmentIndex {
    /// Marks a location whose fragment cannot be read
    ///
    /// This is `-1` in the signed byte encoding used on the wire.
    pub const UNAVAILABLE: FragmentIndex = FragmentIndex(u8::MAX);

    #[inline]
    pub fn is_available(self) -> bool {
        self != Self::UNAVAILABLE
    }
}

impl fmt::Display for FragmentIndex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_available() {
            write!(f, "{}", self.0)
        } else {
            f.write_str("-1")
        }
    }
}

#[test]
fn unavailable_displays_as_minus_one() {
    assert!(FragmentIndex(8).is_available());
    assert_eq!(FragmentIndex::UNAVAILABLE.to_string(), "-1");
}
