use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::domain::lead_form_data::LeadFormData;
use crate::intake::{SubmissionError, FAILURE_MESSAGE};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormState {
    Idle,
    Submitting,
    Succeeded,
    Failed { message: String },
}

#[derive(thiserror::Error, Debug)]
pub enum FormError {
    #[error("A submission is already in flight.")]
    InFlight,
    #[error("The form has already been submitted.")]
    AlreadySubmitted,
    #[error(transparent)]
    Submission(#[from] SubmissionError),
}

/// The lead form as the visitor sees it: the typed values plus the state of
/// the last submission.
#[derive(Debug)]
pub struct LeadForm {
    fields: Mutex<LeadFormData>,
    state: Mutex<FormState>,
}

// A panic while holding the lock leaves plain data behind, still usable.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Moves the form out of `Submitting` when a submission never settles, either
/// because its future was dropped or because `submit_lead` panicked.
struct SubmittingGuard<'a> {
    state: &'a Mutex<FormState>,
    settled: bool,
}

impl<'a> SubmittingGuard<'a> {
    fn new(state: &'a Mutex<FormState>) -> Self {
        SubmittingGuard {
            state,
            settled: false,
        }
    }

    fn settle(&mut self) {
        self.settled = true;
    }
}

impl Drop for SubmittingGuard<'_> {
    fn drop(&mut self) {
        if !self.settled {
            *lock(self.state) = FormState::Failed {
                message: FAILURE_MESSAGE.to_string(),
            };
        }
    }
}

impl Default for LeadForm {
    fn default() -> Self {
        LeadForm::new(LeadFormData::default())
    }
}

impl LeadForm {
    pub fn new(fields: LeadFormData) -> Self {
        LeadForm {
            fields: Mutex::new(fields),
            state: Mutex::new(FormState::Idle),
        }
    }

    pub fn state(&self) -> FormState {
        lock(&self.state).clone()
    }

    pub fn fields(&self) -> LeadFormData {
        lock(&self.fields).clone()
    }

    pub fn update(&self, edit: impl FnOnce(&mut LeadFormData)) {
        edit(&mut *lock(&self.fields));
    }

    /// Whether the submit trigger is enabled.
    pub fn can_submit(&self) -> bool {
        matches!(
            *lock(&self.state),
            FormState::Idle | FormState::Failed { .. }
        )
    }

    /// Hands the current values to `submit_lead` and records the outcome.
    ///
    /// Only one submission runs at a time: calls made while one is in flight
    /// return [`FormError::InFlight`] without invoking `submit_lead`. On
    /// success the fields are cleared and the form stays in
    /// [`FormState::Succeeded`]. A submission that is cancelled or panics
    /// leaves the form in [`FormState::Failed`] so it can be submitted again.
    pub async fn submit<F, Fut>(&self, submit_lead: F) -> Result<(), FormError>
    where
        F: FnOnce(LeadFormData) -> Fut,
        Fut: Future<Output = Result<(), SubmissionError>>,
    {
        {
            let mut state = lock(&self.state);
            match *state {
                FormState::Submitting => return Err(FormError::InFlight),
                FormState::Succeeded => return Err(FormError::AlreadySubmitted),
                FormState::Idle | FormState::Failed { .. } => *state = FormState::Submitting,
            }
        }

        let mut guard = SubmittingGuard::new(&self.state);
        let result = submit_lead(self.fields()).await;
        guard.settle();

        match result {
            Ok(()) => {
                lock(&self.fields).clear();
                *lock(&self.state) = FormState::Succeeded;
                Ok(())
            }
            Err(err) => {
                *lock(&self.state) = FormState::Failed {
                    message: err.user_message().to_string(),
                };
                Err(err.into())
            }
        }
    }
}
