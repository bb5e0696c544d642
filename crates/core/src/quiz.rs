//! Quiz option generation and answer evaluation.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::model::{Fraction, FractionCatalog, FractionIndex};

pub const QUIZ_OPTION_COUNT: usize = 3;
const LINE_COUNT_CHOICES: std::ops::RangeInclusive<u32> = 1..=3;

/// One area-model picture offered as a quiz answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionView {
    pub fraction_index: FractionIndex,
    pub fraction: Fraction,
    pub is_correct: bool,
    pub line_count: u32,
}

/// Builds shuffled quiz options from a catalog.
pub struct QuizGenerator<'a> {
    catalog: &'a FractionCatalog,
}

impl<'a> QuizGenerator<'a> {
    #[must_use]
    pub fn new(catalog: &'a FractionCatalog) -> Self {
        Self { catalog }
    }

    /// Build one correct option for `active` and two distractors, in random order.
    ///
    /// Distractors are distinct when the catalog has at least three entries.
    /// Smaller catalogs repeat distractors, and a single-entry catalog reuses
    /// the active fraction as an (incorrect) distractor.
    pub fn build<R: Rng + ?Sized>(
        &self,
        active: FractionIndex,
        rng: &mut R,
    ) -> [OptionView; QUIZ_OPTION_COUNT] {
        let mut candidates = self.catalog.indices_except(active);
        candidates.shuffle(rng);
        let first = candidates.first().copied().unwrap_or(active);
        let second = candidates.get(1).copied().unwrap_or(first);

        let mut options = [
            self.option(active, true, rng),
            self.option(first, false, rng),
            self.option(second, false, rng),
        ];
        options.shuffle(rng);
        options
    }

    fn option<R: Rng + ?Sized>(
        &self,
        index: FractionIndex,
        is_correct: bool,
        rng: &mut R,
    ) -> OptionView {
        OptionView {
            fraction_index: index,
            fraction: self.catalog.get_clamped(index).clone(),
            is_correct,
            line_count: rng.random_range(LINE_COUNT_CHOICES),
        }
    }
}

/// Quiz progress for the current visit of the quiz step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizState {
    options: [OptionView; QUIZ_OPTION_COUNT],
    correct_chosen: bool,
    wrong_choice: Option<usize>,
    chosen_line_count: Option<u32>,
}

impl QuizState {
    #[must_use]
    pub fn new(options: [OptionView; QUIZ_OPTION_COUNT]) -> Self {
        Self {
            options,
            correct_chosen: false,
            wrong_choice: None,
            chosen_line_count: None,
        }
    }

    #[must_use]
    pub fn options(&self) -> &[OptionView; QUIZ_OPTION_COUNT] {
        &self.options
    }

    #[must_use]
    pub fn correct_chosen(&self) -> bool {
        self.correct_chosen
    }

    /// Index of the most recent wrong pick, if the learner has not yet answered correctly.
    #[must_use]
    pub fn wrong_choice(&self) -> Option<usize> {
        self.wrong_choice
    }

    /// Line count of the correctly chosen picture.
    #[must_use]
    pub fn chosen_line_count(&self) -> Option<u32> {
        self.chosen_line_count
    }

    #[must_use]
    pub fn correct_index(&self) -> Option<usize> {
        self.options.iter().position(|option| option.is_correct)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceOutcome {
    Correct,
    Wrong,
    /// Index out of range, or the quiz was already answered.
    Ignored,
}

/// Applies a learner's pick to a quiz state.
pub struct SelectionEvaluator;

impl SelectionEvaluator {
    /// Returns the updated state and what the pick meant.
    ///
    /// Wrong picks may be retried without limit; a correct pick is final.
    #[must_use]
    pub fn choose(state: &QuizState, index: usize) -> (QuizState, ChoiceOutcome) {
        let mut next = state.clone();
        if state.correct_chosen {
            return (next, ChoiceOutcome::Ignored);
        }
        let Some(option) = state.options.get(index) else {
            return (next, ChoiceOutcome::Ignored);
        };

        if option.is_correct {
            next.correct_chosen = true;
            next.wrong_choice = None;
            next.chosen_line_count = Some(option.line_count);
            (next, ChoiceOutcome::Correct)
        } else {
            next.wrong_choice = Some(index);
            (next, ChoiceOutcome::Wrong)
        }
    }
}
