//! Error types for the tutorial crate.

use thiserror::Error;

/// Errors emitted while talking to a running `TutorialDriver`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TutorialError {
    #[error("tutorial driver is no longer accepting commands")]
    CommandChannelClosed,
    #[error("tutorial driver stopped publishing views")]
    ViewChannelClosed,
}
