use std::time::Duration;

use fraction_core::model::{RevealTimings, StepKind};

use super::{ChoreographyHandle, Cue, Generations, Slot, Timeline};

/// One link of the multiplier → equals → product chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RevealCue {
    Multiplier,
    Equals,
    Product,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RevealFlags {
    pub multiplier_shown: bool,
    pub equals_shown: bool,
    pub product_shown: bool,
}

impl RevealFlags {
    #[must_use]
    pub fn all_shown() -> Self {
        Self {
            multiplier_shown: true,
            equals_shown: true,
            product_shown: true,
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        *self == Self::all_shown()
    }

    pub fn apply(&mut self, cue: RevealCue) {
        match cue {
            RevealCue::Multiplier => self.multiplier_shown = true,
            RevealCue::Equals => self.equals_shown = true,
            RevealCue::Product => self.product_shown = true,
        }
    }
}

/// How a step reveals its equation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealPlan {
    /// No equation on this step.
    Hidden,
    /// Animate the chain, starting `base_delay` after the step is entered.
    Animated { base_delay: Duration },
    /// Show the whole equation at once.
    Immediate,
}

impl RevealPlan {
    #[must_use]
    pub fn for_step(kind: StepKind, timings: &RevealTimings) -> Self {
        match kind {
            StepKind::Intro => RevealPlan::Hidden,
            StepKind::Multiply => RevealPlan::Animated {
                base_delay: Duration::ZERO,
            },
            StepKind::Quiz => RevealPlan::Immediate,
            StepKind::Simplify => RevealPlan::Animated {
                base_delay: timings.simplify_pause(),
            },
        }
    }
}

/// Schedules the reveal chain for the current step.
#[derive(Debug)]
pub struct RevealTimer {
    timings: RevealTimings,
    generations: Generations,
}

impl RevealTimer {
    #[must_use]
    pub fn new(timings: RevealTimings) -> Self {
        Self {
            timings,
            generations: Generations::new(Slot::Reveal),
        }
    }

    /// Cancel the previous chain and schedule `plan`.
    pub fn start(&mut self, timeline: &mut Timeline, plan: RevealPlan) -> ChoreographyHandle {
        let handle = self.generations.begin(timeline);
        let offsets = match plan {
            RevealPlan::Hidden => return handle,
            RevealPlan::Immediate => [Duration::ZERO; 3],
            RevealPlan::Animated { base_delay } => [
                base_delay + self.timings.multiplier(),
                base_delay + self.timings.equals(),
                base_delay + self.timings.product(),
            ],
        };
        let cues = [RevealCue::Multiplier, RevealCue::Equals, RevealCue::Product];
        for (delay, cue) in offsets.into_iter().zip(cues) {
            timeline.schedule(handle, delay, Cue::Reveal(cue));
        }
        handle
    }

    /// Drop the live chain's pending cues, if any.
    pub fn cancel(&mut self, timeline: &mut Timeline) -> Option<ChoreographyHandle> {
        self.generations.end(timeline)
    }

    #[must_use]
    pub fn is_current(&self, handle: ChoreographyHandle) -> bool {
        self.generations.is_current(handle)
    }
}
