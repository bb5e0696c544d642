//! Runs a [`StepSequencer`] on the tokio clock.
//!
//! The driver owns the sequencer. Commands arrive on an unbounded channel and
//! every changed [`ViewState`] is published on a watch channel, so a renderer
//! only ever reads snapshots.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::error::TutorialError;
use crate::sequencer::{StepSequencer, TutorialCommand, ViewState};

pub struct TutorialDriver {
    sequencer: StepSequencer,
    commands: mpsc::UnboundedReceiver<TutorialCommand>,
    views: watch::Sender<ViewState>,
}

/// Renderer-side end of a running driver.
#[derive(Clone)]
pub struct TutorialHandle {
    commands: mpsc::UnboundedSender<TutorialCommand>,
    views: watch::Receiver<ViewState>,
}

impl TutorialDriver {
    #[must_use]
    pub fn new(sequencer: StepSequencer) -> (Self, TutorialHandle) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (view_tx, view_rx) = watch::channel(sequencer.view_state());
        let driver = Self {
            sequencer,
            commands: command_rx,
            views: view_tx,
        };
        let handle = TutorialHandle {
            commands: command_tx,
            views: view_rx,
        };
        (driver, handle)
    }

    /// Process commands and timers until every `TutorialHandle` is dropped.
    ///
    /// Returns the sequencer so callers can inspect the final state.
    pub async fn run(mut self) -> StepSequencer {
        info!("tutorial driver started");
        let mut last = Instant::now();
        loop {
            let wait = self.sequencer.time_until_next_cue();
            tokio::select! {
                command = self.commands.recv() => {
                    self.catch_up(&mut last);
                    let Some(command) = command else {
                        break;
                    };
                    debug!(?command, "tutorial command");
                    let view = self.sequencer.apply(command);
                    self.publish(view);
                }
                () = sleep_for(wait) => {
                    self.catch_up(&mut last);
                }
            }
        }
        info!("tutorial driver stopped");
        self.sequencer
    }

    fn catch_up(&mut self, last: &mut Instant) {
        let now = Instant::now();
        let elapsed = now.duration_since(*last);
        *last = now;
        let view = self.sequencer.advance(elapsed);
        self.publish(view);
    }

    fn publish(&self, view: ViewState) {
        self.views.send_if_modified(|current| {
            if *current == view {
                false
            } else {
                *current = view;
                true
            }
        });
    }
}

async fn sleep_for(wait: Option<Duration>) {
    match wait {
        Some(wait) => tokio::time::sleep(wait).await,
        None => std::future::pending().await,
    }
}

/// Spawn a driver for `sequencer` on the current tokio runtime.
#[must_use]
pub fn spawn_driver(sequencer: StepSequencer) -> (TutorialHandle, JoinHandle<StepSequencer>) {
    let (driver, handle) = TutorialDriver::new(sequencer);
    (handle, tokio::spawn(driver.run()))
}

impl TutorialHandle {
    /// # Errors
    ///
    /// Returns `TutorialError::CommandChannelClosed` if the driver has stopped.
    pub fn send(&self, command: TutorialCommand) -> Result<(), TutorialError> {
        self.commands
            .send(command)
            .map_err(|_| TutorialError::CommandChannelClosed)
    }

    /// Latest published snapshot.
    #[must_use]
    pub fn view(&self) -> ViewState {
        self.views.borrow().clone()
    }

    /// Wait for the next published snapshot.
    ///
    /// # Errors
    ///
    /// Returns `TutorialError::ViewChannelClosed` once the driver has stopped.
    pub async fn changed(&mut self) -> Result<ViewState, TutorialError> {
        self.views
            .changed()
            .await
            .map_err(|_| TutorialError::ViewChannelClosed)?;
        Ok(self.views.borrow_and_update().clone())
    }
}
