use serde::Deserialize;
use std::path::PathBuf;

use crate::analysis::ApiConfig;
use crate::camera::CaptureSource;

/// On-disk configuration, all sections optional.
///
/// Lives at `~/.iriscan/config.toml`. Anything missing falls back to
/// defaults; a broken file is logged and ignored rather than aborting
/// startup.
#[derive(Debug, Default, Deserialize)]
pub struct IriscanConfig {
    pub api: Option<ApiSection>,
    pub capture: Option<CaptureSection>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ApiSection {
    pub key: Option<String>,
    pub model: Option<String>,
    pub endpoint: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CaptureSection {
    /// Grabber program + arguments emitting an encoded image on stdout.
    pub command: Option<Vec<String>>,
    /// Path to a prepared still image.
    pub path: Option<PathBuf>,
}

impl IriscanConfig {
    pub fn load() -> Option<Self> {
        let path = config_path()?;
        if !path.exists() {
            return None;
        }

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return None;
            }
        };

        match toml::from_str(&content) {
            Ok(config) => Some(config),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                None
            }
        }
    }

    /// API configuration, with `GEMINI_API_KEY` filling a missing key.
    pub fn api_config(&self) -> ApiConfig {
        let section = self.api.as_ref();
        let key = section
            .and_then(|api| api.key.clone())
            .or_else(|| std::env::var("GEMINI_API_KEY").ok())
            .unwrap_or_default();

        let mut config = ApiConfig::new(key);
        if let Some(model) = section.and_then(|api| api.model.clone()) {
            config = config.with_model(model);
        }
        if let Some(endpoint) = section.and_then(|api| api.endpoint.clone()) {
            config = config.with_endpoint(endpoint);
        }
        config
    }

    /// Capture source in priority order: grabber command, still file,
    /// built-in test frame.
    pub fn capture_source(&self) -> CaptureSource {
        let section = self.capture.as_ref();
        if let Some(command) = section.and_then(|c| c.command.clone()) {
            if !command.is_empty() {
                return CaptureSource::Command(command);
            }
        }
        if let Some(path) = section.and_then(|c| c.path.clone()) {
            return CaptureSource::File(path);
        }
        CaptureSource::TestFrame
    }
}

fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".iriscan").join("config.toml"))
}
