use fraction_core::model::IntroTimings;

use super::{ChoreographyHandle, Cue, Generations, Slot, Timeline};

/// Where the intro choreography of the first step currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntroPhase {
    /// Not on the first step; everything is resolved.
    Idle,
    MessageShown,
    Shifting,
    AreaRevealing,
    AreaMessageShown,
    NextPrompting,
}

/// Presentation flags implied by an [`IntroPhase`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntroView {
    pub message_visible: bool,
    pub shifted: bool,
    pub area_visible: bool,
    pub area_message_visible: bool,
    pub prompt_visible: bool,
}

impl IntroPhase {
    #[must_use]
    pub fn view(self) -> IntroView {
        let (message_visible, shifted, area_visible, area_message_visible, prompt_visible) =
            match self {
                IntroPhase::Idle => (false, true, true, false, false),
                IntroPhase::MessageShown => (true, false, false, false, false),
                IntroPhase::Shifting => (true, true, false, false, false),
                IntroPhase::AreaRevealing => (false, true, true, true, false),
                IntroPhase::AreaMessageShown => (false, true, true, true, false),
                IntroPhase::NextPrompting => (false, true, true, false, true),
            };
        IntroView {
            message_visible,
            shifted,
            area_visible,
            area_message_visible,
            prompt_visible,
        }
    }
}

/// Runs the timed intro sequence shown on the first step.
#[derive(Debug)]
pub struct IntroChoreographer {
    timings: IntroTimings,
    generations: Generations,
}

impl IntroChoreographer {
    #[must_use]
    pub fn new(timings: IntroTimings) -> Self {
        Self {
            timings,
            generations: Generations::new(Slot::Intro),
        }
    }

    /// Cancel any running intro, schedule a fresh one, and return its first phase.
    pub fn start(&mut self, timeline: &mut Timeline) -> (ChoreographyHandle, IntroPhase) {
        let handle = self.generations.begin(timeline);
        let timings = &self.timings;
        let phases = [
            (timings.shift_at(), IntroPhase::Shifting),
            (timings.area_reveal_at(), IntroPhase::AreaRevealing),
            (timings.area_message_at(), IntroPhase::AreaMessageShown),
            (timings.prompt_at(), IntroPhase::NextPrompting),
        ];
        for (delay, phase) in phases {
            timeline.schedule(handle, delay, Cue::Intro(phase));
        }
        (handle, IntroPhase::MessageShown)
    }

    /// Stop the running intro. The caller snaps its phase to [`IntroPhase::Idle`].
    pub fn cancel(&mut self, timeline: &mut Timeline) -> Option<ChoreographyHandle> {
        self.generations.end(timeline)
    }

    #[must_use]
    pub fn is_current(&self, handle: ChoreographyHandle) -> bool {
        self.generations.is_current(handle)
    }
}
