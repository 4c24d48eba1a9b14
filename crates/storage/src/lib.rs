//! Campaign file storage: JSON export/import of the flat offer list and the
//! built-in seed campaigns.

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use shared::domain::{Offer, OfferId};
use thiserror::Error;

mod seed;

pub use seed::default_offers;

pub const DEFAULT_EXPORT_FILE_NAME: &str = "vestibular-campaigns.json";

/// Reasons an import document is rejected. The caller's offer list must be
/// left untouched for every variant.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("campaign file is not valid JSON: {0}")]
    MalformedJson(#[source] serde_json::Error),
    #[error("campaign file must contain a JSON array of offers")]
    NotAnArray,
    #[error("offer at position {index} is invalid: {source}")]
    InvalidOffer {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("offer id '{0}' appears more than once")]
    DuplicateId(OfferId),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to read campaign file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write campaign file '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode campaigns: {0}")]
    Encode(#[source] serde_json::Error),
    #[error(transparent)]
    Import(#[from] ImportError),
}

/// Serialize offers the way the export file stores them: a pretty-printed array.
pub fn encode_offers(offers: &[Offer]) -> Result<String, StorageError> {
    serde_json::to_string_pretty(offers).map_err(StorageError::Encode)
}

/// Parse and validate an import document.
pub fn decode_offers(raw: &str) -> Result<Vec<Offer>, ImportError> {
    let value: serde_json::Value = serde_json::from_str(raw).map_err(ImportError::MalformedJson)?;
    let serde_json::Value::Array(items) = value else {
        return Err(ImportError::NotAnArray);
    };

    let mut offers = Vec::with_capacity(items.len());
    let mut seen = HashSet::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let offer: Offer = serde_json::from_value(item)
            .map_err(|source| ImportError::InvalidOffer { index, source })?;
        if !seen.insert(offer.id.clone()) {
            return Err(ImportError::DuplicateId(offer.id));
        }
        offers.push(offer);
    }

    Ok(offers)
}

/// File-backed export/import of the campaign list.
#[derive(Debug, Clone)]
pub struct CampaignStore {
    default_export_path: PathBuf,
}

impl Default for CampaignStore {
    fn default() -> Self {
        Self::new(DEFAULT_EXPORT_FILE_NAME)
    }
}

impl CampaignStore {
    pub fn new(default_export_path: impl Into<PathBuf>) -> Self {
        Self {
            default_export_path: default_export_path.into(),
        }
    }

    /// Write `offers` to `path` (or the default export path), creating parent
    /// directories as needed. Returns the path written.
    pub async fn export(
        &self,
        path: Option<&Path>,
        offers: &[Offer],
    ) -> Result<PathBuf, StorageError> {
        let path = path.unwrap_or(&self.default_export_path).to_path_buf();
        let document = encode_offers(offers)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| StorageError::Write {
                    path: path.clone(),
                    source,
                })?;
        }

        tokio::fs::write(&path, document)
            .await
            .map_err(|source| StorageError::Write {
                path: path.clone(),
                source,
            })?;

        tracing::info!(path = %path.display(), count = offers.len(), "exported campaigns");
        Ok(path)
    }

    pub async fn import(&self, path: &Path) -> Result<Vec<Offer>, StorageError> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| StorageError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let offers = decode_offers(&raw)?;
        tracing::info!(path = %path.display(), count = offers.len(), "imported campaigns");
        Ok(offers)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
