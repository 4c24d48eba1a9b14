//! Lead-capture modal opened from a slide's call to action.

use chrono::{DateTime, Utc};
use shared::domain::{CapturedLead, LeadForm};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LeadFormError {
    #[error("lead form is not open")]
    NotOpen,
    #[error("lead form was already submitted")]
    AlreadySubmitted,
    #[error("name is required")]
    MissingName,
    #[error("phone is required")]
    MissingPhone,
    #[error("invalid e-mail address '{0}'")]
    InvalidEmail(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LeadModalState {
    #[default]
    Closed,
    Editing {
        course_interest: String,
    },
    Submitting {
        course_interest: String,
        form: LeadForm,
        attempt: u64,
    },
    Submitted {
        course_interest: String,
        attempt: u64,
    },
}

#[derive(Debug, Default)]
pub struct LeadCapture {
    state: LeadModalState,
    last_attempt: u64,
    captured: Vec<CapturedLead>,
}

impl LeadCapture {
    pub fn state(&self) -> &LeadModalState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        self.state != LeadModalState::Closed
    }

    pub fn captured(&self) -> &[CapturedLead] {
        &self.captured
    }

    /// Returns `false` when the modal is already open.
    pub fn open(&mut self, course_interest: impl Into<String>) -> bool {
        if self.is_open() {
            return false;
        }
        self.state = LeadModalState::Editing {
            course_interest: course_interest.into(),
        };
        true
    }

    /// Returns `false` when the modal was already closed.
    pub fn close(&mut self) -> bool {
        if !self.is_open() {
            return false;
        }
        self.state = LeadModalState::Closed;
        true
    }

    /// Validate and begin the (simulated) submission. The returned attempt
    /// number identifies the pending submission for the follow-up timers.
    pub fn submit(&mut self, form: LeadForm) -> Result<u64, LeadFormError> {
        let course_interest = match &self.state {
            LeadModalState::Closed => return Err(LeadFormError::NotOpen),
            LeadModalState::Editing { course_interest } => course_interest.clone(),
            LeadModalState::Submitting { .. } | LeadModalState::Submitted { .. } => {
                return Err(LeadFormError::AlreadySubmitted)
            }
        };

        let form = validate(form)?;
        self.last_attempt += 1;
        self.state = LeadModalState::Submitting {
            course_interest,
            form,
            attempt: self.last_attempt,
        };
        Ok(self.last_attempt)
    }

    /// Submitting -> Submitted, recording the lead.
    pub fn complete_submission(
        &mut self,
        attempt: u64,
        captured_at: DateTime<Utc>,
    ) -> Option<CapturedLead> {
        let LeadModalState::Submitting {
            course_interest,
            form,
            attempt: pending,
        } = &self.state
        else {
            return None;
        };
        if *pending != attempt {
            return None;
        }

        let lead = CapturedLead {
            form: form.clone(),
            course_interest: course_interest.clone(),
            captured_at,
        };
        self.state = LeadModalState::Submitted {
            course_interest: course_interest.clone(),
            attempt,
        };
        self.captured.push(lead.clone());
        Some(lead)
    }

    /// Submitted -> Closed once the confirmation has been shown.
    pub fn finish(&mut self, attempt: u64) -> bool {
        match &self.state {
            LeadModalState::Submitted {
                attempt: shown, ..
            } if *shown == attempt => {
                self.state = LeadModalState::Closed;
                true
            }
            _ => false,
        }
    }
}

fn validate(form: LeadForm) -> Result<LeadForm, LeadFormError> {
    let form = LeadForm {
        name: form.name.trim().to_string(),
        email: form.email.trim().to_string(),
        phone: form.phone.trim().to_string(),
    };

    if form.name.is_empty() {
        return Err(LeadFormError::MissingName);
    }
    if form.phone.is_empty() {
        return Err(LeadFormError::MissingPhone);
    }

    let valid_email = form
        .email
        .split_once('@')
        .is_some_and(|(local, domain)| {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@')
        });
    if !valid_email {
        return Err(LeadFormError::InvalidEmail(form.email));
    }

    Ok(form)
}
