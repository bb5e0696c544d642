use serde::{Deserialize, Serialize};

/// What a single tutorial step does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    /// Introduce the fraction and its area model.
    Intro,
    /// Multiply by `n/n` and segment the area model.
    Multiply,
    /// Match the scaled fraction to an area-model picture.
    Quiz,
    /// Divide back down to the original fraction.
    Simplify,
}

/// Which steps the tutorial walks through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepLayout {
    /// Intro and multiply only.
    Short,
    /// Intro, multiply, quiz, simplify.
    #[default]
    Full,
}

const SHORT_STEPS: &[StepKind] = &[StepKind::Intro, StepKind::Multiply];
const FULL_STEPS: &[StepKind] = &[
    StepKind::Intro,
    StepKind::Multiply,
    StepKind::Quiz,
    StepKind::Simplify,
];

impl StepLayout {
    #[must_use]
    pub fn steps(self) -> &'static [StepKind] {
        match self {
            StepLayout::Short => SHORT_STEPS,
            StepLayout::Full => FULL_STEPS,
        }
    }

    #[must_use]
    pub fn step_count(self) -> usize {
        self.steps().len()
    }

    #[must_use]
    pub fn last_step(self) -> usize {
        self.step_count() - 1
    }

    #[must_use]
    pub fn has_quiz_step(self) -> bool {
        self.steps().contains(&StepKind::Quiz)
    }

    /// Kind of the step at `step`, clamped to the last step.
    #[must_use]
    pub fn kind_at(self, step: usize) -> StepKind {
        let steps = self.steps();
        steps[step.min(steps.len() - 1)]
    }

    /// Clamp a step index into `[0, step_count)`.
    #[must_use]
    pub fn clamp(self, step: usize) -> usize {
        step.min(self.last_step())
    }

    /// Messages shown by the coach for each step when none are configured.
    #[must_use]
    pub fn default_messages(self) -> Vec<String> {
        let messages: &[&str] = match self {
            StepLayout::Short => &[
                "This is our fraction! Click the forward button to see how to simplify!",
                "Let's multiply the numerator and denominator!",
            ],
            StepLayout::Full => &[
                "This is our fraction! Click the forward button to see how to simplify!",
                "Let's multiply the numerator and denominator! Add lines to split the area into more pieces.",
                "Which picture shows our new fraction?",
                "Now divide the numerator and denominator to get back to the simplest form!",
            ],
        };
        messages.iter().map(|m| (*m).to_string()).collect()
    }
}
