mod command;
mod service;
mod state;
mod view;

pub use command::TutorialCommand;
pub use service::StepSequencer;
pub use state::SequencerState;
pub use view::ViewState;
