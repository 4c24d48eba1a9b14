//! HTTP adapter for the Gemini `generateContent` and Imagen `predict`
//! endpoints.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use serde_json::json;
use shared::protocol::{CopyBundle, GeneratedImage, ImageRequest};
use url::Url;

use crate::{error::GenAiError, prompts, CopyGenerator, ImageGenerator, PromptTextGenerator};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_IMAGE_MODEL: &str = "imagen-4.0-generate-001";

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub text_model: String,
    pub image_model: String,
    pub request_timeout: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.into(),
            text_model: DEFAULT_TEXT_MODEL.into(),
            image_model: DEFAULT_IMAGE_MODEL.into(),
            request_timeout: Duration::from_secs(60),
        }
    }
}

pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    text_model: String,
    image_model: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<serde_json::Value>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Prediction {
    #[serde(default)]
    bytes_base64_encoded: Option<String>,
    #[serde(default)]
    mime_type: Option<String>,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, GenAiError> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|source| GenAiError::InvalidBaseUrl {
            url: base_url.clone(),
            source,
        })?;

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            http,
            base_url,
            api_key: config.api_key.unwrap_or_default(),
            text_model: config.text_model,
            image_model: config.image_model,
        })
    }

    async fn generate_content(
        &self,
        prompt: &str,
        generation_config: Option<serde_json::Value>,
    ) -> Result<Option<String>, GenAiError> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".into()),
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
            generation_config,
        };

        let response = self
            .http
            .post(format!(
                "{}/models/{}:generateContent",
                self.base_url, self.text_model
            ))
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await?;
        let response: GenerateContentResponse = Self::parse_response(response).await?;

        let text: String = response
            .candidates
            .into_iter()
            .next()
            .map(|candidate| {
                candidate
                    .content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect()
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            Ok(None)
        } else {
            Ok(Some(text))
        }
    }

    async fn predict_image(
        &self,
        request: &ImageRequest,
    ) -> Result<Option<GeneratedImage>, GenAiError> {
        let body = json!({
            "instances": [{ "prompt": request.prompt }],
            "parameters": {
                "sampleCount": request.options.number_of_images,
                "aspectRatio": request.options.aspect_ratio,
                "outputMimeType": request.options.output_mime_type,
            }
        });

        let response = self
            .http
            .post(format!("{}/models/{}:predict", self.base_url, self.image_model))
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await?;
        let response: PredictResponse = Self::parse_response(response).await?;

        let Some(prediction) = response.predictions.into_iter().next() else {
            return Ok(None);
        };
        let Some(encoded) = prediction
            .bytes_base64_encoded
            .filter(|encoded| !encoded.is_empty())
        else {
            return Ok(None);
        };

        let bytes = STANDARD
            .decode(encoded.as_bytes())
            .map_err(|err| GenAiError::Decode(format!("image payload is not base64: {err}")))?;

        Ok(Some(GeneratedImage {
            mime_type: prediction
                .mime_type
                .unwrap_or_else(|| request.options.output_mime_type.clone()),
            bytes,
        }))
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, GenAiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(GenAiError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json::<T>().await?)
    }
}

fn copy_response_schema() -> serde_json::Value {
    json!({
        "responseMimeType": "application/json",
        "responseSchema": {
            "type": "OBJECT",
            "properties": {
                "headline": { "type": "STRING" },
                "subtitle": { "type": "STRING" },
                "discount": { "type": "STRING" },
                "ctaText": { "type": "STRING" },
                "colorFrom": {
                    "type": "STRING",
                    "description": "Tailwind class starting with 'from-', e.g., 'from-purple-900'"
                },
                "colorTo": {
                    "type": "STRING",
                    "description": "Tailwind class starting with 'to-', e.g., 'to-purple-600'"
                }
            },
            "required": ["headline", "subtitle", "discount", "ctaText", "colorFrom", "colorTo"]
        }
    })
}

#[async_trait]
impl CopyGenerator for GeminiClient {
    async fn generate_copy(&self, course: &str) -> Result<CopyBundle> {
        let text = self
            .generate_content(&prompts::copywriting_prompt(course), Some(copy_response_schema()))
            .await?
            .ok_or(GenAiError::EmptyResponse)?;

        let bundle = serde_json::from_str::<CopyBundle>(&text)
            .map_err(|err| GenAiError::Decode(format!("copy bundle is not valid JSON: {err}")))?;
        Ok(bundle)
    }
}

#[async_trait]
impl ImageGenerator for GeminiClient {
    async fn generate_image(&self, request: &ImageRequest) -> Result<Option<GeneratedImage>> {
        Ok(self.predict_image(request).await?)
    }
}

#[async_trait]
impl PromptTextGenerator for GeminiClient {
    async fn generate_text(&self, prompt: &str) -> Result<Option<String>> {
        Ok(self.generate_content(prompt, None).await?)
    }
}
