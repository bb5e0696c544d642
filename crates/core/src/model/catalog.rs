use thiserror::Error;

use crate::model::fraction::{Fraction, FractionError};
use crate::model::ids::FractionIndex;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("fraction catalog cannot be empty")]
    Empty,
    #[error(transparent)]
    Fraction(#[from] FractionError),
}

/// Immutable, ordered list of the fractions a tutorial may present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FractionCatalog {
    fractions: Vec<Fraction>,
}

impl FractionCatalog {
    /// Creates a catalog from already validated fractions.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Empty` if no fractions are given.
    pub fn new(fractions: Vec<Fraction>) -> Result<Self, CatalogError> {
        if fractions.is_empty() {
            return Err(CatalogError::Empty);
        }
        Ok(Self { fractions })
    }

    /// The built-in halves, thirds and quarters, each pictured on a single row.
    ///
    /// # Panics
    ///
    /// Panics if a built-in entry fails validation.
    #[must_use]
    pub fn standard() -> Self {
        Self::try_standard().expect("built-in fractions should be valid")
    }

    fn try_standard() -> Result<Self, CatalogError> {
        Self::new(vec![
            Fraction::new(1, 2, 1, 2, 1, "½")?,
            Fraction::new(1, 3, 1, 3, 1, "⅓")?,
            Fraction::new(2, 3, 1, 3, 2, "⅔")?,
            Fraction::new(1, 4, 1, 4, 1, "¼")?,
            Fraction::new(3, 4, 1, 4, 3, "¾")?,
        ])
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fractions.len()
    }

    /// Always false; an empty catalog cannot be constructed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fractions.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: FractionIndex) -> Option<&Fraction> {
        self.fractions.get(index.value())
    }

    /// Returns the fraction at `index`, clamped to the last entry.
    #[must_use]
    pub fn get_clamped(&self, index: FractionIndex) -> &Fraction {
        let last = self.fractions.len() - 1;
        &self.fractions[index.value().min(last)]
    }

    /// Iterates entries together with their catalog index.
    pub fn iter(&self) -> impl Iterator<Item = (FractionIndex, &Fraction)> {
        self.fractions
            .iter()
            .enumerate()
            .map(|(i, fraction)| (FractionIndex::new(i), fraction))
    }

    /// Indices of every entry except `excluded`.
    #[must_use]
    pub fn indices_except(&self, excluded: FractionIndex) -> Vec<FractionIndex> {
        (0..self.fractions.len())
            .map(FractionIndex::new)
            .filter(|index| *index != excluded)
            .collect()
    }
}

impl Default for FractionCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
