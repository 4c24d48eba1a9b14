use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque offer identity. Seed data uses short numeric strings, generated
/// offers use UUIDs; both are compared as plain strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OfferId(pub String);

impl OfferId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OfferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One advertising campaign, rendered as a single carousel slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    pub id: OfferId,
    pub course: String,
    pub headline: String,
    pub subtitle: String,
    pub discount: String,
    pub cta_text: String,
    pub color_from: String,
    pub color_to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Offer {
    /// Copy of this offer with only the image replaced.
    pub fn with_image(&self, image: impl Into<String>) -> Self {
        Self {
            image: Some(image.into()),
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    CopyGeneration,
    ImageGeneration,
    PromptGeneration,
}

impl TaskKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskKind::CopyGeneration => "copy_generation",
            TaskKind::ImageGeneration => "image_generation",
            TaskKind::PromptGeneration => "prompt_generation",
        }
    }
}

/// Status slot identity: copy generation has no target because the offer it
/// produces does not exist yet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskKey {
    pub kind: TaskKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<OfferId>,
}

impl TaskKey {
    pub fn copy() -> Self {
        Self {
            kind: TaskKind::CopyGeneration,
            target: None,
        }
    }

    pub fn image(offer_id: OfferId) -> Self {
        Self {
            kind: TaskKind::ImageGeneration,
            target: Some(offer_id),
        }
    }

    pub fn prompt(offer_id: OfferId) -> Self {
        Self {
            kind: TaskKind::PromptGeneration,
            target: Some(offer_id),
        }
    }
}

impl fmt::Display for TaskKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.target {
            Some(target) => write!(f, "{}:{}", self.kind.as_str(), target),
            None => f.write_str(self.kind.as_str()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Idle,
    Running,
    Succeeded,
    Failed,
}

impl TaskStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskStatus::Succeeded | TaskStatus::Failed)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadForm {
    pub name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapturedLead {
    pub form: LeadForm,
    pub course_interest: String,
    pub captured_at: DateTime<Utc>,
}
