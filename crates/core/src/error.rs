use thiserror::Error;

use crate::model::{CatalogError, FractionError, SettingsError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Fraction(#[from] FractionError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
}
