use serde::{Deserialize, Serialize};

/// Campaign copy returned by the copy-generation collaborator. Every field is
/// optional on the wire; callers substitute their own defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CopyBundle {
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub discount: Option<String>,
    #[serde(default)]
    pub cta_text: Option<String>,
    #[serde(default)]
    pub color_from: Option<String>,
    #[serde(default)]
    pub color_to: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageOptions {
    pub number_of_images: u32,
    pub aspect_ratio: String,
    pub output_mime_type: String,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            number_of_images: 1,
            aspect_ratio: "9:16".into(),
            output_mime_type: "image/png".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRequest {
    pub prompt: String,
    pub options: ImageOptions,
}

/// Raw image bytes as produced by the image collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl GeneratedImage {
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
