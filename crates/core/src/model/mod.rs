mod catalog;
mod fraction;
mod ids;
mod layout;
mod settings;

pub use catalog::{CatalogError, FractionCatalog};
pub use fraction::{Fraction, FractionError};
pub use ids::FractionIndex;
pub use layout::{StepKind, StepLayout};
pub use settings::{
    IntroTimings, RevealTimings, SettingsError, TutorialSettings, TutorialSettingsDraft,
};
