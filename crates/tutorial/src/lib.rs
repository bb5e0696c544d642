#![forbid(unsafe_code)]

pub mod choreography;
pub mod driver;
pub mod error;
pub mod sequencer;

pub use choreography::{
    ChoreographyHandle, Cue, IntroChoreographer, IntroPhase, IntroView, RevealCue, RevealFlags,
    RevealPlan, RevealTimer, Slot, Timeline,
};
pub use driver::{TutorialDriver, TutorialHandle, spawn_driver};
pub use error::TutorialError;
pub use sequencer::{SequencerState, StepSequencer, TutorialCommand, ViewState};
