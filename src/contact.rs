//! Public contact form: draft, required-field check and the
//! idle / sending / success / error cycle.

use crate::api::models::ContactRequest;
use std::time::Duration;
use thiserror::Error;

/// How long the success banner stays before the form goes back to idle.
pub const SUCCESS_RESET: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitPhase {
    #[default]
    Idle,
    Sending,
    Success,
    Error,
}

impl SubmitPhase {
    /// Sending and the success banner both hold the send button.
    pub fn accepts_submit(self) -> bool {
        !matches!(self, SubmitPhase::Sending | SubmitPhase::Success)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("please fill in: {}", .0.join(", "))]
    Missing(Vec<&'static str>),
    #[error("the last message is still being sent")]
    Busy,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub content: String,
}

impl ContactDraft {
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("name", &self.name),
            ("email", &self.email),
            ("phone", &self.phone),
            ("message", &self.content),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect()
    }

    pub fn to_request(&self) -> ContactRequest {
        ContactRequest {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            content: self.content.clone(),
        }
    }
}

#[derive(Debug, Default)]
pub struct ContactForm {
    pub draft: ContactDraft,
    phase: SubmitPhase,
}

impl ContactForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SubmitPhase {
        self.phase
    }

    /// Moves to `Sending` and hands out the payload to post.
    pub fn begin_submit(&mut self) -> Result<ContactRequest, FormError> {
        if !self.phase.accepts_submit() {
            return Err(FormError::Busy);
        }
        let missing = self.draft.missing_fields();
        if !missing.is_empty() {
            return Err(FormError::Missing(missing));
        }
        self.phase = SubmitPhase::Sending;
        Ok(self.draft.to_request())
    }

    /// Records the server answer. On success the draft is cleared and the
    /// caller schedules [`ContactForm::settle`] after [`SUCCESS_RESET`].
    pub fn finish(&mut self, accepted: bool) -> SubmitPhase {
        if self.phase != SubmitPhase::Sending {
            return self.phase;
        }
        if accepted {
            self.draft = ContactDraft::default();
            self.phase = SubmitPhase::Success;
        } else {
            self.phase = SubmitPhase::Error;
        }
        self.phase
    }

    /// Success → Idle. Other phases are left alone, so a late timer cannot
    /// clobber a submit that started in the meantime.
    pub fn settle(&mut self) -> SubmitPhase {
        if self.phase == SubmitPhase::Success {
            self.phase = SubmitPhase::Idle;
        }
        self.phase
    }
}
