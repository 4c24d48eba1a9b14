//! Engine -> operator events and UI error modeling.

use std::path::PathBuf;

use shared::{
    domain::{CapturedLead, OfferId, TaskKey, TaskStatus},
    error::ErrorCode,
};

#[derive(Debug, Clone)]
pub enum UiEvent {
    SlideChanged {
        index: usize,
        total: usize,
        offer_id: OfferId,
    },
    OffersChanged {
        total: usize,
    },
    AutoplayChanged {
        running: bool,
    },
    TaskStatusChanged {
        key: TaskKey,
        status: TaskStatus,
    },
    OfferCreated {
        offer_id: OfferId,
        course: String,
    },
    ImageUpdated {
        offer_id: OfferId,
    },
    PromptCopied {
        offer_id: OfferId,
    },
    LeadModalChanged {
        open: bool,
        course_interest: String,
    },
    LeadCaptured(CapturedLead),
    Exported {
        path: PathBuf,
        count: usize,
    },
    Imported {
        count: usize,
    },
    Info(String),
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    GenerateCopy,
    GenerateImage,
    GeneratePrompt,
    Import,
    Export,
    Lead,
}

#[derive(Debug, Clone)]
pub struct UiError {
    code: ErrorCode,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn new(code: ErrorCode, context: UiErrorContext, message: impl Into<String>) -> Self {
        Self {
            code,
            context,
            message: message.into(),
        }
    }

    /// Classify a free-form failure message, typically a collaborator error.
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let code = if message_lower.contains("api key")
            || message_lower.contains("credential")
            || message_lower.contains("401")
            || message_lower.contains("403")
            || message_lower.contains("permission denied")
        {
            ErrorCode::MissingConfiguration
        } else if message_lower.contains("invalid")
            || message_lower.contains("malformed")
            || message_lower.contains("not valid json")
            || message_lower.contains("must contain")
            || message_lower.contains("appears more than once")
        {
            ErrorCode::Validation
        } else if message_lower.contains("timeout")
            || message_lower.contains("timed out")
            || message_lower.contains("connection")
            || message_lower.contains("request failed")
            || message_lower.contains("unavailable")
            || message_lower.contains("api error")
            || message_lower.contains("empty response")
        {
            ErrorCode::Collaborator
        } else {
            ErrorCode::Internal
        };

        Self {
            code,
            context,
            message,
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
