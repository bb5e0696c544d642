use fraction_core::QuizState;
use fraction_core::model::FractionIndex;

use crate::choreography::{IntroPhase, RevealFlags};

/// Mutable session state, owned by a `StepSequencer`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequencerState {
    pub(super) fraction_index: FractionIndex,
    pub(super) step: usize,
    pub(super) extra_line_count: u32,
    pub(super) reveal: RevealFlags,
    pub(super) intro_phase: IntroPhase,
    pub(super) quiz: Option<QuizState>,
}

impl SequencerState {
    /// Fresh state on the first step of `fraction_index`.
    #[must_use]
    pub fn initial(fraction_index: FractionIndex) -> Self {
        Self {
            fraction_index,
            step: 0,
            extra_line_count: 0,
            reveal: RevealFlags::default(),
            intro_phase: IntroPhase::MessageShown,
            quiz: None,
        }
    }

    #[must_use]
    pub fn fraction_index(&self) -> FractionIndex {
        self.fraction_index
    }

    #[must_use]
    pub fn step(&self) -> usize {
        self.step
    }

    #[must_use]
    pub fn extra_line_count(&self) -> u32 {
        self.extra_line_count
    }

    #[must_use]
    pub fn reveal(&self) -> RevealFlags {
        self.reveal
    }

    #[must_use]
    pub fn intro_phase(&self) -> IntroPhase {
        self.intro_phase
    }

    #[must_use]
    pub fn quiz(&self) -> Option<&QuizState> {
        self.quiz.as_ref()
    }
}
