use fraction_core::model::{Fraction, FractionCatalog, FractionIndex, StepKind, TutorialSettings};
use fraction_core::{DerivedView, QuizState, derive, max_extra_lines};

use super::state::SequencerState;
use crate::choreography::{IntroPhase, IntroView, RevealFlags};

/// Read-only snapshot handed to the renderer after every change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub fraction_index: FractionIndex,
    pub fraction: Fraction,
    pub step: usize,
    pub step_count: usize,
    pub step_kind: StepKind,
    pub derived: DerivedView,
    pub reveal: RevealFlags,
    pub intro_phase: IntroPhase,
    pub intro: IntroView,
    pub quiz: Option<QuizState>,
    pub coach_message: String,
    pub extra_line_count: u32,
    pub max_extra_lines: u32,
    pub can_go_prev: bool,
    pub can_go_next: bool,
    pub can_add_line: bool,
}

impl ViewState {
    pub(super) fn build(
        state: &SequencerState,
        catalog: &FractionCatalog,
        settings: &TutorialSettings,
    ) -> Self {
        let layout = settings.layout();
        let fraction = catalog.get_clamped(state.fraction_index).clone();
        let step_kind = layout.kind_at(state.step);
        let derived = derive(&fraction, layout, state.step, state.extra_line_count);
        let max_extra = max_extra_lines(&fraction);

        let coach_message = match state.intro_phase {
            IntroPhase::MessageShown | IntroPhase::Shifting => settings.intro_message(),
            IntroPhase::AreaRevealing | IntroPhase::AreaMessageShown => settings.area_message(),
            IntroPhase::NextPrompting | IntroPhase::Idle => settings.step_message(state.step),
        }
        .to_string();

        let can_add_line = step_kind == StepKind::Multiply
            && state.reveal.product_shown
            && state.extra_line_count < max_extra;

        Self {
            fraction_index: state.fraction_index,
            fraction,
            step: state.step,
            step_count: layout.step_count(),
            step_kind,
            derived,
            reveal: state.reveal,
            intro_phase: state.intro_phase,
            intro: state.intro_phase.view(),
            quiz: state.quiz.clone(),
            coach_message,
            extra_line_count: state.extra_line_count,
            max_extra_lines: max_extra,
            can_go_prev: state.step > 0,
            can_go_next: state.step < layout.last_step(),
            can_add_line,
        }
    }
}
