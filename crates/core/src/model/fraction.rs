use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::derivation::MAX_FACTOR;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FractionError {
    #[error("denominator must be > 0")]
    ZeroDenominator,

    #[error("numerator ({numerator}) must not exceed denominator ({denominator})")]
    ImproperFraction { numerator: u32, denominator: u32 },

    #[error("denominator ({denominator}) is too large to scale by {MAX_FACTOR}")]
    DenominatorTooLarge { denominator: u32 },

    #[error("area model grid must have at least one row and one column")]
    EmptyGrid,

    #[error("area model grid {rows}x{cols} has more cells than fit in a u32")]
    GridTooLarge { rows: u32, cols: u32 },

    #[error("filled cells ({filled}) exceed grid size ({cells})")]
    TooManyFilledCells { filled: u32, cells: u32 },

    #[error("area model shows {filled}/{cells}, which is not {numerator}/{denominator}")]
    AreaMismatch {
        numerator: u32,
        denominator: u32,
        filled: u32,
        cells: u32,
    },

    #[error("fraction label cannot be empty")]
    EmptyLabel,
}

//
// ─── FRACTION ──────────────────────────────────────────────────────────────────
//

/// A presentable fraction together with the area-model grid that pictures it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "FractionRecord")]
pub struct Fraction {
    numerator: u32,
    denominator: u32,
    grid_rows: u32,
    grid_cols: u32,
    filled_cells: u32,
    label: String,
}

impl Fraction {
    /// Creates a fraction and checks that its grid pictures the same value.
    ///
    /// # Errors
    ///
    /// Returns `FractionError` if the denominator or grid is empty, the
    /// fraction is improper, the denominator cannot be scaled by
    /// [`MAX_FACTOR`], the grid has more cells than a `u32` holds, more cells
    /// are filled than exist, or the filled share of the grid differs from
    /// `numerator/denominator`.
    pub fn new(
        numerator: u32,
        denominator: u32,
        grid_rows: u32,
        grid_cols: u32,
        filled_cells: u32,
        label: impl Into<String>,
    ) -> Result<Self, FractionError> {
        if denominator == 0 {
            return Err(FractionError::ZeroDenominator);
        }
        if numerator > denominator {
            return Err(FractionError::ImproperFraction {
                numerator,
                denominator,
            });
        }
        if denominator.checked_mul(MAX_FACTOR).is_none() {
            return Err(FractionError::DenominatorTooLarge { denominator });
        }
        if grid_rows == 0 || grid_cols == 0 {
            return Err(FractionError::EmptyGrid);
        }
        let cells = grid_rows
            .checked_mul(grid_cols)
            .ok_or(FractionError::GridTooLarge {
                rows: grid_rows,
                cols: grid_cols,
            })?;
        if filled_cells > cells {
            return Err(FractionError::TooManyFilledCells {
                filled: filled_cells,
                cells,
            });
        }
        if u64::from(numerator) * u64::from(cells)
            != u64::from(filled_cells) * u64::from(denominator)
        {
            return Err(FractionError::AreaMismatch {
                numerator,
                denominator,
                filled: filled_cells,
                cells,
            });
        }
        let label = label.into();
        if label.trim().is_empty() {
            return Err(FractionError::EmptyLabel);
        }

        Ok(Self {
            numerator,
            denominator,
            grid_rows,
            grid_cols,
            filled_cells,
            label,
        })
    }

    #[must_use]
    pub fn numerator(&self) -> u32 {
        self.numerator
    }

    #[must_use]
    pub fn denominator(&self) -> u32 {
        self.denominator
    }

    #[must_use]
    pub fn grid_rows(&self) -> u32 {
        self.grid_rows
    }

    #[must_use]
    pub fn grid_cols(&self) -> u32 {
        self.grid_cols
    }

    #[must_use]
    pub fn filled_cells(&self) -> u32 {
        self.filled_cells
    }

    /// Total number of cells in the area model. Never overflows: `new`
    /// rejects grids whose product does not fit.
    #[must_use]
    pub fn total_cells(&self) -> u32 {
        self.grid_rows * self.grid_cols
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }
}

#[derive(Deserialize)]
struct FractionRecord {
    numerator: u32,
    denominator: u32,
    grid_rows: u32,
    grid_cols: u32,
    filled_cells: u32,
    label: String,
}

impl TryFrom<FractionRecord> for Fraction {
    type Error = FractionError;

    fn try_from(record: FractionRecord) -> Result<Self, Self::Error> {
        Fraction::new(
            record.numerator,
            record.denominator,
            record.grid_rows,
            record.grid_cols,
            record.filled_cells,
            record.label,
        )
    }
}
