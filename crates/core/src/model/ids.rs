use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of a fraction inside a [`FractionCatalog`](super::FractionCatalog).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FractionIndex(usize);

impl FractionIndex {
    /// Creates a new `FractionIndex`
    #[must_use]
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the underlying index
    #[must_use]
    pub fn value(&self) -> usize {
        self.0
    }
}

impl fmt::Debug for FractionIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FractionIndex({})", self.0)
    }
}

impl fmt::Display for FractionIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
