//! Generation collaborators: the traits the banner engine calls for campaign
//! copy, images and photography briefs, plus the Gemini-backed adapter.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use shared::protocol::{CopyBundle, GeneratedImage, ImageRequest};
use tracing::{error, warn};

pub mod error;
pub mod gemini;
pub mod prompts;

pub use error::GenAiError;
pub use gemini::{GeminiClient, GeminiConfig};

#[async_trait]
pub trait CopyGenerator: Send + Sync {
    async fn generate_copy(&self, course: &str) -> Result<CopyBundle>;
}

#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// `Ok(None)` means the service answered but produced no image.
    async fn generate_image(&self, request: &ImageRequest) -> Result<Option<GeneratedImage>>;
}

#[async_trait]
pub trait PromptTextGenerator: Send + Sync {
    /// `Ok(None)` means the service answered without any text.
    async fn generate_text(&self, prompt: &str) -> Result<Option<String>>;
}

/// Copy generator that never leaves the caller without a bundle: inner
/// failures, or a missing inner generator, yield the canned copy.
pub struct FallbackCopywriter {
    inner: Option<Arc<dyn CopyGenerator>>,
}

impl FallbackCopywriter {
    pub fn new(inner: Arc<dyn CopyGenerator>) -> Self {
        Self { inner: Some(inner) }
    }

    pub fn canned_only() -> Self {
        Self { inner: None }
    }
}

#[async_trait]
impl CopyGenerator for FallbackCopywriter {
    async fn generate_copy(&self, course: &str) -> Result<CopyBundle> {
        let Some(inner) = &self.inner else {
            warn!(course, "no copy generator configured; using canned copy");
            return Ok(prompts::fallback_copy(course));
        };

        match inner.generate_copy(course).await {
            Ok(bundle) => Ok(bundle),
            Err(err) => {
                error!(course, "copy generation failed, using canned copy: {err:#}");
                Ok(prompts::fallback_copy(course))
            }
        }
    }
}

/// The collaborator set handed to the engine. Image and prompt generation are
/// absent when no credential is configured.
#[derive(Clone)]
pub struct GenerationBackends {
    pub copy: Arc<dyn CopyGenerator>,
    pub images: Option<Arc<dyn ImageGenerator>>,
    pub prompts: Option<Arc<dyn PromptTextGenerator>>,
}

impl GenerationBackends {
    /// Wire the Gemini adapter when `config` carries a credential, otherwise
    /// fall back to canned copy only.
    pub fn from_config(config: GeminiConfig) -> Result<Self, GenAiError> {
        if config.api_key.is_none() {
            warn!("generation credential missing; image and prompt generation disabled");
            return Ok(Self {
                copy: Arc::new(FallbackCopywriter::canned_only()),
                images: None,
                prompts: None,
            });
        }

        let client = Arc::new(GeminiClient::new(config)?);
        Ok(Self {
            copy: Arc::new(FallbackCopywriter::new(client.clone())),
            images: Some(client.clone() as Arc<dyn ImageGenerator>),
            prompts: Some(client as Arc<dyn PromptTextGenerator>),
        })
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
