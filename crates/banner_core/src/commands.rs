//! Operator commands queued to the engine.

use std::path::PathBuf;

use shared::domain::{LeadForm, OfferId};
use tokio::sync::oneshot;

use crate::engine::EngineSnapshot;

#[derive(Debug)]
pub enum Command {
    Next,
    Previous,
    GoTo {
        index: usize,
    },
    /// Pointer entered (`true`) or left (`false`) the banner.
    SetHover {
        hovering: bool,
    },
    OpenLeadModal,
    CloseLeadModal,
    SubmitLead {
        form: LeadForm,
    },
    GenerateCopy {
        course: String,
    },
    GenerateImage {
        offer_id: OfferId,
        course: String,
    },
    GeneratePrompt {
        offer_id: OfferId,
        course: String,
    },
    Export {
        path: Option<PathBuf>,
    },
    ImportFile {
        path: PathBuf,
    },
    ImportDocument {
        document: String,
    },
    Snapshot {
        reply: oneshot::Sender<EngineSnapshot>,
    },
    Shutdown,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Next => "next",
            Command::Previous => "previous",
            Command::GoTo { .. } => "go_to",
            Command::SetHover { .. } => "set_hover",
            Command::OpenLeadModal => "open_lead_modal",
            Command::CloseLeadModal => "close_lead_modal",
            Command::SubmitLead { .. } => "submit_lead",
            Command::GenerateCopy { .. } => "generate_copy",
            Command::GenerateImage { .. } => "generate_image",
            Command::GeneratePrompt { .. } => "generate_prompt",
            Command::Export { .. } => "export",
            Command::ImportFile { .. } => "import_file",
            Command::ImportDocument { .. } => "import_document",
            Command::Snapshot { .. } => "snapshot",
            Command::Shutdown => "shutdown",
        }
    }
}
