use std::{collections::HashMap, fs, io, path::Path, path::PathBuf, time::Duration};

use anyhow::Context;
use banner_core::EngineConfig;
use genai_client::{gemini, GeminiConfig};

pub const DEFAULT_CONFIG_FILE: &str = "banner.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_key: Option<String>,
    pub gemini_base_url: String,
    pub text_model: String,
    pub image_model: String,
    pub autoplay_interval_ms: u64,
    pub export_path: PathBuf,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: None,
            gemini_base_url: gemini::DEFAULT_BASE_URL.into(),
            text_model: gemini::DEFAULT_TEXT_MODEL.into(),
            image_model: gemini::DEFAULT_IMAGE_MODEL.into(),
            autoplay_interval_ms: 5000,
            export_path: PathBuf::from(storage::DEFAULT_EXPORT_FILE_NAME),
            log_level: "info".into(),
        }
    }
}

impl Settings {
    pub fn gemini_config(&self) -> GeminiConfig {
        GeminiConfig {
            api_key: self.api_key.clone(),
            base_url: self.gemini_base_url.clone(),
            text_model: self.text_model.clone(),
            image_model: self.image_model.clone(),
            ..GeminiConfig::default()
        }
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            autoplay_interval: Duration::from_millis(self.autoplay_interval_ms),
            ..EngineConfig::default()
        }
    }
}

/// Defaults, then `path` if it exists, then the process environment.
pub fn load_settings(path: &Path) -> anyhow::Result<Settings> {
    load_settings_with(path, |key| std::env::var(key).ok())
}

pub fn load_settings_with(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    match fs::read_to_string(path) {
        Ok(raw) => {
            let file_cfg = toml::from_str::<HashMap<String, String>>(&raw)
                .with_context(|| format!("failed to parse {}", path.display()))?;
            apply_file(&mut settings, &file_cfg);
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read {}", path.display()));
        }
    }

    apply_env(&mut settings, env);
    Ok(settings)
}

fn apply_file(settings: &mut Settings, file_cfg: &HashMap<String, String>) {
    if let Some(v) = file_cfg.get("api_key") {
        settings.api_key = non_blank(v);
    }
    if let Some(v) = file_cfg.get("gemini_base_url") {
        settings.gemini_base_url = v.clone();
    }
    if let Some(v) = file_cfg.get("text_model") {
        settings.text_model = v.clone();
    }
    if let Some(v) = file_cfg.get("image_model") {
        settings.image_model = v.clone();
    }
    if let Some(parsed) = file_cfg
        .get("autoplay_interval_ms")
        .and_then(|v| v.parse::<u64>().ok())
    {
        settings.autoplay_interval_ms = parsed;
    }
    if let Some(v) = file_cfg.get("export_path") {
        settings.export_path = PathBuf::from(v);
    }
    if let Some(v) = file_cfg.get("log_level") {
        settings.log_level = v.clone();
    }
}

fn apply_env(settings: &mut Settings, env: impl Fn(&str) -> Option<String>) {
    // Later names win.
    for key in ["API_KEY", "GEMINI_API_KEY", "APP__API_KEY"] {
        if let Some(v) = env(key) {
            settings.api_key = non_blank(&v);
        }
    }

    if let Some(v) = env("APP__GEMINI_BASE_URL") {
        settings.gemini_base_url = v;
    }
    if let Some(v) = env("APP__TEXT_MODEL") {
        settings.text_model = v;
    }
    if let Some(v) = env("APP__IMAGE_MODEL") {
        settings.image_model = v;
    }
    if let Some(parsed) = env("APP__AUTOPLAY_INTERVAL_MS").and_then(|v| v.parse::<u64>().ok()) {
        settings.autoplay_interval_ms = parsed;
    }
    if let Some(v) = env("APP__EXPORT_PATH") {
        settings.export_path = PathBuf::from(v);
    }
    if let Some(v) = env("APP__LOG_LEVEL") {
        settings.log_level = v;
    }
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
