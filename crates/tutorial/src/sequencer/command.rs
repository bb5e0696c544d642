/// User input forwarded by the presentation layer.
///
/// [`StepSequencer::apply`](super::StepSequencer::apply) maps each variant
/// onto the matching method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TutorialCommand {
    Next,
    Prev,
    Reset,
    Randomize,
    AddLine,
    /// Pick the quiz option at this index.
    ChooseOption(usize),
}
