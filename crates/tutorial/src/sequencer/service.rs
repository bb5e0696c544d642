use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng, rng};
use tracing::{debug, trace};

use fraction_core::model::{FractionCatalog, FractionIndex, StepKind, TutorialSettings};
use fraction_core::{ChoiceOutcome, QuizGenerator, QuizState, SelectionEvaluator, max_extra_lines};

use super::state::SequencerState;
use super::view::ViewState;
use crate::choreography::{
    ChoreographyHandle, Cue, IntroChoreographer, IntroPhase, RevealFlags, RevealPlan, RevealTimer,
    Timeline,
};
use super::command::TutorialCommand;

/// Drives one tutorial session: step navigation, timed reveals, and the quiz.
///
/// Time is host-driven. Commands only change state and schedule cues; every
/// cue, including zero-delay ones, fires from [`StepSequencer::advance`].
#[derive(Debug)]
pub struct StepSequencer {
    catalog: FractionCatalog,
    settings: TutorialSettings,
    rng: StdRng,
    state: SequencerState,
    timeline: Timeline,
    reveal_timer: RevealTimer,
    intro: IntroChoreographer,
}

impl StepSequencer {
    /// Start a session on the first catalog entry with OS-seeded randomness.
    #[must_use]
    pub fn new(catalog: FractionCatalog, settings: TutorialSettings) -> Self {
        Self::with_rng(catalog, settings, StdRng::from_rng(&mut rng()))
    }

    /// Start a session with deterministic randomness.
    #[must_use]
    pub fn with_seed(catalog: FractionCatalog, settings: TutorialSettings, seed: u64) -> Self {
        Self::with_rng(catalog, settings, StdRng::seed_from_u64(seed))
    }

    #[must_use]
    pub fn with_rng(catalog: FractionCatalog, settings: TutorialSettings, rng: StdRng) -> Self {
        let reveal_timer = RevealTimer::new(*settings.reveal());
        let intro = IntroChoreographer::new(*settings.intro());
        let mut sequencer = Self {
            catalog,
            settings,
            rng,
            state: SequencerState::initial(FractionIndex::new(0)),
            timeline: Timeline::new(),
            reveal_timer,
            intro,
        };
        sequencer.enter_step();
        sequencer
    }

    /// Start on a specific fraction; out-of-range indices clamp to the last entry.
    #[must_use]
    pub fn starting_at(mut self, index: FractionIndex) -> Self {
        let last = self.catalog.len() - 1;
        self.state = SequencerState::initial(FractionIndex::new(index.value().min(last)));
        self.enter_step();
        self
    }

    #[must_use]
    pub fn state(&self) -> &SequencerState {
        &self.state
    }

    #[must_use]
    pub fn catalog(&self) -> &FractionCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn settings(&self) -> &TutorialSettings {
        &self.settings
    }

    /// Time elapsed on the sequencer's clock.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.timeline.now()
    }

    /// How long until the next pending cue fires, if any is pending.
    #[must_use]
    pub fn time_until_next_cue(&self) -> Option<Duration> {
        self.timeline
            .next_due()
            .map(|due| due.saturating_sub(self.timeline.now()))
    }

    #[must_use]
    pub fn view_state(&self) -> ViewState {
        ViewState::build(&self.state, &self.catalog, &self.settings)
    }

    /// Move the clock forward by `delta`, firing every cue that comes due.
    pub fn advance(&mut self, delta: Duration) -> ViewState {
        let until = self.timeline.now() + delta;
        self.fire_until(until);
        self.view_state()
    }

    pub fn apply(&mut self, command: TutorialCommand) -> ViewState {
        match command {
            TutorialCommand::Next => self.next(),
            TutorialCommand::Prev => self.prev(),
            TutorialCommand::Reset => self.reset(),
            TutorialCommand::Randomize => self.randomize(),
            TutorialCommand::AddLine => self.add_line(),
            TutorialCommand::ChooseOption(index) => self.choose_option(index),
        }
    }

    /// Go forward one step; a no-op on the last step.
    pub fn next(&mut self) -> ViewState {
        let target = self.settings.layout().clamp(self.state.step + 1);
        self.go_to(target)
    }

    /// Go back one step; a no-op on the first step.
    pub fn prev(&mut self) -> ViewState {
        let target = self.state.step.saturating_sub(1);
        self.go_to(target)
    }

    /// Replay the current step from scratch, dropping added lines and quiz answers.
    pub fn reset(&mut self) -> ViewState {
        debug!(step = self.state.step, "reset step");
        self.state.extra_line_count = 0;
        self.state.quiz = None;
        self.enter_step();
        self.view_state()
    }

    /// Switch to a different random fraction and start over from the first step.
    pub fn randomize(&mut self) -> ViewState {
        let current = self.state.fraction_index;
        let next = pick_other_index(current, self.catalog.len(), &mut self.rng);
        debug!(from = %current, to = %next, "randomize fraction");
        self.state = SequencerState::initial(next);
        self.enter_step();
        self.view_state()
    }

    /// Split the area model one step further, once the product is showing.
    pub fn add_line(&mut self) -> ViewState {
        if !self.view_state().can_add_line {
            trace!(step = self.state.step, "add line ignored");
            return self.view_state();
        }
        let max_extra = max_extra_lines(self.catalog.get_clamped(self.state.fraction_index));
        self.state.extra_line_count = (self.state.extra_line_count + 1).min(max_extra);
        debug!(extra = self.state.extra_line_count, "added line");
        self.view_state()
    }

    /// Answer the quiz with the option at `index`.
    pub fn choose_option(&mut self, index: usize) -> ViewState {
        if self.step_kind() != StepKind::Quiz {
            trace!(step = self.state.step, "choice ignored outside quiz step");
            return self.view_state();
        }
        if let Some(quiz) = self.state.quiz.as_ref() {
            let (quiz, outcome) = SelectionEvaluator::choose(quiz, index);
            if outcome != ChoiceOutcome::Ignored {
                debug!(index, ?outcome, "quiz choice");
            }
            self.state.quiz = Some(quiz);
        }
        self.view_state()
    }

    fn step_kind(&self) -> StepKind {
        self.settings.layout().kind_at(self.state.step)
    }

    fn go_to(&mut self, target: usize) -> ViewState {
        if target == self.state.step {
            return self.view_state();
        }
        debug!(from = self.state.step, to = target, "change step");
        self.state.step = target;
        self.enter_step();
        self.view_state()
    }

    /// Cancel whatever the previous state scheduled and start the current step's choreography.
    fn enter_step(&mut self) {
        self.reveal_timer.cancel(&mut self.timeline);
        self.state.reveal = RevealFlags::default();

        let kind = self.step_kind();
        if kind == StepKind::Intro {
            let (_, phase) = self.intro.start(&mut self.timeline);
            self.state.intro_phase = phase;
        } else {
            self.intro.cancel(&mut self.timeline);
            self.state.intro_phase = IntroPhase::Idle;
        }

        if kind == StepKind::Quiz {
            let options = QuizGenerator::new(&self.catalog)
                .build(self.state.fraction_index, &mut self.rng);
            self.state.quiz = Some(QuizState::new(options));
        }

        let plan = RevealPlan::for_step(kind, self.settings.reveal());
        self.reveal_timer.start(&mut self.timeline, plan);
    }

    fn fire_until(&mut self, until: Duration) {
        while let Some((handle, cue)) = self.timeline.pop_due(until) {
            self.apply_cue(handle, cue);
        }
    }

    fn apply_cue(&mut self, handle: ChoreographyHandle, cue: Cue) {
        match cue {
            Cue::Reveal(reveal) if self.reveal_timer.is_current(handle) => {
                trace!(?reveal, "reveal");
                self.state.reveal.apply(reveal);
            }
            Cue::Intro(phase)
                if self.intro.is_current(handle) && self.step_kind() == StepKind::Intro =>
            {
                trace!(?phase, "intro phase");
                self.state.intro_phase = phase;
            }
            _ => trace!(
                ?cue,
                slot = ?handle.slot(),
                generation = handle.generation(),
                "dropped stale cue"
            ),
        }
    }
}

/// Uniform pick among every index except `current`; a single entry maps to 0.
fn pick_other_index<R: Rng + ?Sized>(
    current: FractionIndex,
    len: usize,
    rng: &mut R,
) -> FractionIndex {
    if len <= 1 {
        return FractionIndex::new(0);
    }
    let pick = rng.random_range(0..len - 1);
    if pick >= current.value() {
        FractionIndex::new(pick + 1)
    } else {
        FractionIndex::new(pick)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fraction_core::model::{StepLayout, TutorialSettingsDraft};
    use fraction_core::{FractionPair, Operator};
    use std::collections::HashSet;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn full_at(index: usize) -> StepSequencer {
        StepSequencer::with_seed(
            FractionCatalog::standard(),
            TutorialSettings::for_layout(StepLayout::Full),
            42,
        )
        .starting_at(FractionIndex::new(index))
    }

    #[test]
    fn new_session_starts_intro_on_first_fraction() {
        let sequencer = full_at(0);
        let view = sequencer.view_state();
        assert_eq!(view.step, 0);
        assert_eq!(view.fraction.label(), "½");
        assert_eq!(view.intro_phase, IntroPhase::MessageShown);
        assert_eq!(view.reveal, RevealFlags::default());
        assert_eq!(view.quiz, None);
        assert_eq!(view.coach_message, "Here's a fraction!");
        assert!(!view.can_go_prev);
        assert!(view.can_go_next);
    }

    #[test]
    fn intro_runs_to_the_step_prompt() {
        let mut sequencer = full_at(0);
        assert_eq!(sequencer.advance(ms(1500)).intro_phase, IntroPhase::Shifting);
        let view = sequencer.advance(ms(450));
        assert_eq!(view.intro_phase, IntroPhase::AreaMessageShown);
        assert_eq!(view.coach_message, sequencer.settings().area_message());
        let view = sequencer.advance(ms(1500));
        assert_eq!(view.intro_phase, IntroPhase::NextPrompting);
        assert_eq!(view.coach_message, sequencer.settings().step_message(0));
        assert_eq!(sequencer.time_until_next_cue(), None);
    }

    #[test]
    fn next_multiplies_and_reveals_in_order() {
        let mut sequencer = full_at(0);
        let view = sequencer.next();
        assert_eq!(view.step, 1);
        assert_eq!(view.derived.factor, 2);
        assert_eq!(view.derived.left, FractionPair::new(1, 2));
        assert_eq!(view.derived.result, FractionPair::new(2, 4));
        assert_eq!(view.derived.operator, Operator::Multiply);
        assert_eq!(view.intro_phase, IntroPhase::Idle);
        assert!(view.intro.area_visible);
        assert_eq!(view.reveal, RevealFlags::default());

        let view = sequencer.advance(ms(1000));
        assert!(view.reveal.multiplier_shown && !view.reveal.equals_shown);
        let view = sequencer.advance(ms(400));
        assert!(view.reveal.equals_shown && !view.reveal.product_shown);
        let view = sequencer.advance(ms(400));
        assert!(view.reveal.is_complete());
    }

    #[test]
    fn leaving_intro_stops_its_timers() {
        let mut sequencer = full_at(0);
        sequencer.advance(ms(200));
        sequencer.next();
        let view = sequencer.advance(ms(5000));
        assert_eq!(view.intro_phase, IntroPhase::Idle);
        assert!(view.reveal.is_complete());
    }

    #[test]
    fn add_lines_scales_the_result() {
        let mut sequencer = full_at(0);
        sequencer.next();
        assert!(!sequencer.add_line().can_add_line);
        assert_eq!(sequencer.state().extra_line_count(), 0, "product not shown yet");

        sequencer.advance(ms(1800));
        sequencer.add_line();
        sequencer.add_line();
        let view = sequencer.add_line();
        assert_eq!(view.extra_line_count, 3);
        assert_eq!(view.derived.factor, 5);
        assert_eq!(view.derived.result, FractionPair::new(5, 10));
        assert_eq!(view.derived.line_count, 4);
    }

    #[test]
    fn add_line_clamps_at_max_for_thirds() {
        let mut sequencer = full_at(2);
        sequencer.next();
        sequencer.advance(ms(1800));
        for _ in 0..4 {
            sequencer.add_line();
        }
        let view = sequencer.view_state();
        assert_eq!(view.fraction.label(), "⅔");
        assert_eq!(view.extra_line_count, 3);
        assert_eq!(view.derived.factor, 6);
        assert_eq!(view.derived.result, FractionPair::new(12, 18));
        assert!(!view.can_add_line);
    }

    #[test]
    fn extra_lines_carry_into_later_steps() {
        let mut sequencer = full_at(0);
        sequencer.next();
        sequencer.advance(ms(1800));
        sequencer.add_line();
        sequencer.next();
        let view = sequencer.next();
        assert_eq!(view.step, 3);
        assert_eq!(view.derived.factor, 3);
        assert_eq!(view.derived.left, FractionPair::new(3, 6));
        assert_eq!(view.derived.operator, Operator::Divide);
        assert_eq!(view.derived.result, FractionPair::new(1, 2));
    }

    #[test]
    fn simplify_step_divides_after_a_pause() {
        let mut sequencer = full_at(0);
        sequencer.next();
        sequencer.next();
        let view = sequencer.next();
        assert!(view.derived.is_simplify_step);
        assert_eq!(view.derived.left, FractionPair::new(2, 4));
        assert_eq!(view.derived.result, FractionPair::new(1, 2));
        assert_eq!(view.reveal, RevealFlags::default());

        assert!(!sequencer.advance(ms(1999)).reveal.multiplier_shown);
        assert!(sequencer.advance(ms(1)).reveal.multiplier_shown);
        assert!(sequencer.advance(ms(800)).reveal.is_complete());
        assert!(!sequencer.next().can_go_next);
    }

    #[test]
    fn quiz_step_shows_equation_and_fresh_options() {
        let mut sequencer = full_at(3);
        sequencer.next();
        let view = sequencer.next();
        assert_eq!(view.step_kind, StepKind::Quiz);
        assert_eq!(view.reveal, RevealFlags::default());
        let view = sequencer.advance(Duration::ZERO);
        assert!(view.reveal.is_complete(), "quiz keeps the equation visible");

        let quiz = view.quiz.expect("quiz generated on entry");
        assert_eq!(quiz.options().iter().filter(|o| o.is_correct).count(), 1);
        let correct = quiz.correct_index().unwrap();
        assert_eq!(quiz.options()[correct].fraction_index, FractionIndex::new(3));
    }

    #[test]
    fn quiz_choices_are_evaluated() {
        let mut sequencer = full_at(1);
        sequencer.next();
        let quiz = sequencer.next().quiz.unwrap();
        let correct = quiz.correct_index().unwrap();
        let wrong = (correct + 1) % 3;

        let view = sequencer.choose_option(wrong);
        let quiz = view.quiz.unwrap();
        assert_eq!(quiz.wrong_choice(), Some(wrong));
        assert!(!quiz.correct_chosen());

        let quiz = sequencer.choose_option(correct).quiz.unwrap();
        assert!(quiz.correct_chosen());
        assert_eq!(quiz.wrong_choice(), None);

        let quiz = sequencer.reset().quiz.unwrap();
        assert!(!quiz.correct_chosen());
        assert_eq!(quiz.wrong_choice(), None);
    }

    #[test]
    fn choices_outside_quiz_step_are_ignored() {
        let mut sequencer = full_at(0);
        let before = sequencer.view_state();
        assert_eq!(sequencer.choose_option(0), before);
    }

    #[test]
    fn reset_replays_current_step() {
        let mut sequencer = full_at(0);
        sequencer.next();
        sequencer.advance(ms(1800));
        sequencer.add_line();

        let view = sequencer.reset();
        assert_eq!(view.step, 1);
        assert_eq!(view.extra_line_count, 0);
        assert_eq!(view.reveal, RevealFlags::default());
        assert!(sequencer.advance(ms(1800)).reveal.is_complete());
    }

    #[test]
    fn reset_on_first_step_restarts_intro() {
        let mut sequencer = full_at(0);
        sequencer.advance(ms(4000));
        let view = sequencer.reset();
        assert_eq!(view.intro_phase, IntroPhase::MessageShown);
        assert_eq!(sequencer.advance(ms(1500)).intro_phase, IntroPhase::Shifting);
    }

    #[test]
    fn quiz_options_rebuild_on_every_reentry() {
        let mut rebuilt_by_reset = 0;
        let mut rebuilt_by_revisit = 0;
        for seed in 0..20 {
            let mut sequencer = StepSequencer::with_seed(
                FractionCatalog::standard(),
                TutorialSettings::for_layout(StepLayout::Full),
                seed,
            )
            .starting_at(FractionIndex::new(2));
            sequencer.next();
            let first = sequencer.next().quiz.unwrap();
            sequencer.choose_option(first.correct_index().unwrap());

            let after_reset = sequencer.reset().quiz.unwrap();
            assert!(!after_reset.correct_chosen());
            assert_eq!(after_reset.wrong_choice(), None);
            if after_reset.options() != first.options()
                || after_reset.correct_index() != first.correct_index()
            {
                rebuilt_by_reset += 1;
            }

            sequencer.prev();
            let after_revisit = sequencer.next().quiz.unwrap();
            assert_eq!(after_revisit.options().iter().filter(|o| o.is_correct).count(), 1);
            if after_revisit.options() != after_reset.options()
                || after_revisit.correct_index() != after_reset.correct_index()
            {
                rebuilt_by_revisit += 1;
            }
        }
        assert!(rebuilt_by_reset > 0, "reset never rebuilt the quiz");
        assert!(rebuilt_by_revisit > 0, "prev then next never rebuilt the quiz");
    }

    #[test]
    fn area_message_flag_matches_coach_message_through_the_intro() {
        let mut draft = TutorialSettingsDraft::new(StepLayout::Full);
        draft.intro.area_message_ms = 300;
        let settings = draft.validate().unwrap();
        let area_message = settings.area_message().to_string();
        let mut sequencer =
            StepSequencer::with_seed(FractionCatalog::standard(), settings, 7);

        let mut seen = vec![sequencer.view_state()];
        for delta in [1500, 450, 300, 1500] {
            seen.push(sequencer.advance(ms(delta)));
        }
        let phases: Vec<_> = seen.iter().map(|view| view.intro_phase).collect();
        assert_eq!(
            phases,
            vec![
                IntroPhase::MessageShown,
                IntroPhase::Shifting,
                IntroPhase::AreaRevealing,
                IntroPhase::AreaMessageShown,
                IntroPhase::NextPrompting,
            ]
        );
        for view in &seen {
            assert_eq!(
                view.intro.area_message_visible,
                view.coach_message == area_message,
                "{:?}",
                view.intro_phase
            );
        }
    }

    #[test]
    fn stale_reveals_do_not_land_after_navigation() {
        let mut sequencer = full_at(0);
        sequencer.next();
        sequencer.advance(ms(1200));
        let view = sequencer.prev();
        assert_eq!(view.reveal, RevealFlags::default());
        let view = sequencer.advance(ms(2000));
        assert_eq!(view.reveal, RevealFlags::default());
        assert_eq!(view.step, 0);
    }

    #[test]
    fn rapid_navigation_keeps_one_chain_per_slot() {
        let mut sequencer = full_at(0);
        for _ in 0..5 {
            sequencer.next();
            sequencer.prev();
        }
        sequencer.next();
        assert_eq!(sequencer.timeline.pending_count(), 3);
        let view = sequencer.advance(ms(999));
        assert_eq!(view.reveal, RevealFlags::default());
    }

    #[test]
    fn prev_returns_to_intro_and_restarts_it() {
        let mut sequencer = full_at(0);
        sequencer.advance(ms(4000));
        sequencer.next();
        let view = sequencer.prev();
        assert_eq!(view.step, 0);
        assert_eq!(view.intro_phase, IntroPhase::MessageShown);
        assert!(!view.intro.area_visible);
    }

    #[test]
    fn navigation_saturates_at_both_ends() {
        let mut sequencer = full_at(0);
        assert_eq!(sequencer.prev().step, 0);
        for _ in 0..10 {
            sequencer.next();
        }
        assert_eq!(sequencer.view_state().step, 3);
    }

    #[test]
    fn randomize_always_picks_a_different_fraction() {
        let mut sequencer = full_at(2);
        let mut seen = HashSet::new();
        for _ in 0..100 {
            let before = sequencer.state().fraction_index();
            let view = sequencer.randomize();
            assert_ne!(view.fraction_index, before);
            seen.insert(view.fraction_index);
        }
        assert!(seen.len() >= 2);
    }

    #[test]
    fn randomize_from_index_two_never_stays() {
        for seed in 0..100 {
            let mut sequencer = StepSequencer::with_seed(
                FractionCatalog::standard(),
                TutorialSettings::default(),
                seed,
            )
            .starting_at(FractionIndex::new(2));
            assert_ne!(sequencer.randomize().fraction_index, FractionIndex::new(2));
        }
    }

    #[test]
    fn randomize_resets_everything() {
        let mut sequencer = full_at(0);
        sequencer.next();
        sequencer.advance(ms(1800));
        sequencer.add_line();
        sequencer.next();

        let view = sequencer.randomize();
        assert_eq!(view.step, 0);
        assert_eq!(view.extra_line_count, 0);
        assert_eq!(view.reveal, RevealFlags::default());
        assert_eq!(view.quiz, None);
        assert_eq!(view.intro_phase, IntroPhase::MessageShown);
    }

    #[test]
    fn single_entry_catalog_randomizes_in_place() {
        let catalog = FractionCatalog::new(vec![
            fraction_core::model::Fraction::new(1, 2, 1, 2, 1, "½").unwrap(),
        ])
        .unwrap();
        let mut sequencer = StepSequencer::with_seed(catalog, TutorialSettings::default(), 1);
        assert_eq!(sequencer.randomize().fraction_index, FractionIndex::new(0));
    }

    #[test]
    fn short_layout_stops_on_multiply() {
        let mut sequencer = StepSequencer::with_seed(
            FractionCatalog::standard(),
            TutorialSettings::for_layout(StepLayout::Short),
            9,
        );
        sequencer.next();
        let view = sequencer.next();
        assert_eq!(view.step, 1);
        assert_eq!(view.step_count, 2);
        assert_eq!(view.derived.operator, Operator::Multiply);
        assert!(!view.can_go_next);
    }

    #[test]
    fn pick_other_index_is_uniform_over_the_rest() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut counts = [0_u32; 5];
        for _ in 0..4000 {
            counts[pick_other_index(FractionIndex::new(2), 5, &mut rng).value()] += 1;
        }
        assert_eq!(counts[2], 0);
        assert!(counts.iter().enumerate().all(|(i, c)| i == 2 || *c > 800));
    }
}
