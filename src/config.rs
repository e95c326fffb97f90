/// What to do when a caller hands the index data that breaks its ordering rules
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Validation {
    /// Log the violation and return it as an [`Error`](crate::Error)
    ///
    /// The index is left exactly as it was before the call
    Error,
    /// Log the violation and panic
    Panic,
}

impl Default for Validation {
    fn default() -> Self {
        Validation::Error
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub validation: Validation,
}
