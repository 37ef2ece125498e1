//! Runs a submission off the UI thread.
//!
//! The worker owns a clone of the client and sends exactly one outcome back.
//! Only the UI thread touches the controller.

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use tracing::error;

use crate::api::DecisionService;
use crate::domain::{DecisionRequest, DecisionResponse};
use crate::error::{DecisionError, NetworkError};

pub type Outcome = Result<DecisionResponse, DecisionError>;

pub struct Pending {
    rx: Receiver<Outcome>,
}

impl Pending {
    pub fn spawn<S>(service: S, request: DecisionRequest) -> Self
    where
        S: DecisionService + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let outcome = service.submit(&request);
            // The receiver is gone only if the UI already quit.
            let _ = tx.send(outcome);
        });
        Self { rx }
    }

    /// Non-blocking check for the outcome.
    pub fn poll(&self) -> Option<Outcome> {
        match self.rx.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                error!("submission worker exited without reporting");
                Some(Err(NetworkError::Transport(
                    "submission worker stopped unexpectedly".to_string(),
                )
                .into()))
            }
        }
    }
}
