#![forbid(unsafe_code)]

pub mod derivation;
pub mod error;
pub mod model;
pub mod quiz;

pub use derivation::{DerivedView, FractionPair, Operator, base_factor, derive, max_extra_lines};
pub use error::Error;
pub use quiz::{ChoiceOutcome, OptionView, QuizGenerator, QuizState, SelectionEvaluator};
