pub mod autoplay;
pub mod carousel;
pub mod commands;
pub mod engine;
pub mod events;
pub mod lead;
pub mod orchestration;
pub mod tracker;

pub use commands::Command;
pub use engine::{EngineConfig, EngineError, EngineHandle, EngineSnapshot};
pub use events::{UiError, UiErrorContext, UiEvent};
pub use orchestration::dispatch_command;

/// Destination for text the operator copies out of the banner (image prompts).
pub trait ClipboardSink: Send + Sync {
    fn write_text(&self, text: &str) -> anyhow::Result<()>;
}
