//! The form controller: owns the form, the submission state and the result
//! region, and mediates between them and the decision service.
//!
//! The controller never performs I/O on its own except in
//! [`FormController::submit_with`]. Front-ends that must stay responsive
//! split a submission into [`FormController::begin_submit`] and
//! [`FormController::finish_submit`] and run the service call in between.

use tracing::{debug, info, warn};

use crate::api::DecisionService;
use crate::domain::{DecisionRequest, DecisionResponse};
use crate::error::{DecisionError, ValidationError};
use crate::form::FormState;
use crate::render::{ErrorCard, ResultCard};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitState {
    Idle,
    Submitting,
}

/// What the result region currently shows.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultView {
    Empty,
    Result(ResultCard),
    Error(ErrorCard),
}

/// Outcome of [`FormController::begin_submit`].
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitStart {
    /// A submission is already in flight; nothing changed.
    Busy,
    /// Validation failed; the error card is showing.
    Invalid(ValidationError),
    /// The controller is now `Submitting`; send this request.
    Ready(DecisionRequest),
}

#[derive(Debug, Clone)]
pub struct FormController {
    form: FormState,
    state: SubmitState,
    view: ResultView,
    last_request: Option<DecisionRequest>,
    last_outcome: Option<Result<DecisionResponse, DecisionError>>,
}

impl Default for FormController {
    fn default() -> Self {
        Self::new(FormState::default())
    }
}

impl FormController {
    pub fn new(form: FormState) -> Self {
        Self {
            form,
            state: SubmitState::Idle,
            view: ResultView::Empty,
            last_request: None,
            last_outcome: None,
        }
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    /// Mutable access to the fields. Edits are ignored while submitting.
    pub fn form_mut(&mut self) -> Option<&mut FormState> {
        match self.state {
            SubmitState::Idle => Some(&mut self.form),
            SubmitState::Submitting => None,
        }
    }

    pub fn state(&self) -> SubmitState {
        self.state
    }

    pub fn is_submitting(&self) -> bool {
        self.state == SubmitState::Submitting
    }

    pub fn view(&self) -> &ResultView {
        &self.view
    }

    pub fn last_request(&self) -> Option<&DecisionRequest> {
        self.last_request.as_ref()
    }

    pub fn last_outcome(&self) -> Option<&Result<DecisionResponse, DecisionError>> {
        self.last_outcome.as_ref()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.form.validate()
    }

    pub fn build_request(&self) -> DecisionRequest {
        self.form.build_request()
    }

    /// Idle -> Submitting, if the form is valid.
    pub fn begin_submit(&mut self) -> SubmitStart {
        if self.is_submitting() {
            debug!("submit ignored: request already in flight");
            return SubmitStart::Busy;
        }

        if let Err(err) = self.form.validate() {
            info!(violations = err.violations.len(), "form validation failed");
            self.render_error(&DecisionError::Validation(err.clone()));
            return SubmitStart::Invalid(err);
        }

        let request = self.form.build_request();
        self.view = ResultView::Empty;
        self.state = SubmitState::Submitting;
        self.last_request = Some(request.clone());
        self.last_outcome = None;
        SubmitStart::Ready(request)
    }

    /// Submitting -> Idle, rendering whichever way the call went.
    pub fn finish_submit(&mut self, outcome: Result<DecisionResponse, DecisionError>) {
        if !self.is_submitting() {
            warn!("submission result arrived while idle; ignoring");
            return;
        }
        self.state = SubmitState::Idle;

        match &outcome {
            Ok(response) => self.render_result(response),
            Err(err) => {
                warn!(error = %err, "decision submission failed");
                self.render_error(err);
            }
        }
        self.last_outcome = Some(outcome);
    }

    /// Run a whole submission synchronously against `service`.
    pub fn submit_with(
        &mut self,
        service: &dyn DecisionService,
    ) -> Result<DecisionResponse, DecisionError> {
        let request = match self.begin_submit() {
            SubmitStart::Ready(request) => request,
            SubmitStart::Invalid(err) => return Err(err.into()),
            SubmitStart::Busy => return Err(DecisionError::InFlight),
        };

        let outcome = service.submit(&request);
        self.finish_submit(outcome.clone());
        outcome
    }

    pub fn render_result(&mut self, response: &DecisionResponse) {
        self.view = ResultView::Result(ResultCard::from_response(response));
    }

    pub fn render_error(&mut self, err: &DecisionError) {
        self.view = ResultView::Error(ErrorCard::from_error(err));
    }

    /// The error card's dismiss action; also clears a result card.
    pub fn dismiss(&mut self) {
        self.view = ResultView::Empty;
    }

    /// Clear every field and the result region. Ignored while submitting.
    pub fn reset(&mut self) {
        if self.is_submitting() {
            debug!("reset ignored: request in flight");
            return;
        }
        self.form.reset();
        self.view = ResultView::Empty;
        info!("form reset");
    }
}
