use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{FacturaError, Result};

/// Endpoint configuration. The store and identity services are external;
/// only their URLs are configurable here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_store_url")]
    pub store_url: String,
    #[serde(default = "default_identity_url")]
    pub identity_url: String,
}

fn default_store_url() -> String {
    "https://store.facturas.app/v1".to_string()
}

fn default_identity_url() -> String {
    "https://id.facturas.app/v1".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            store_url: default_store_url(),
            identity_url: default_identity_url(),
        }
    }
}

pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("facturas")
}

fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

/// Load settings, falling back to defaults on a missing or malformed file.
/// `FACTURAS_STORE_URL` / `FACTURAS_IDENTITY_URL` override the file.
pub fn load_settings() -> Settings {
    let path = settings_path();
    let mut settings = if path.exists() {
        let content = std::fs::read_to_string(&path).unwrap_or_default();
        serde_json::from_str(&content).unwrap_or_default()
    } else {
        Settings::default()
    };
    if let Ok(url) = std::env::var("FACTURAS_STORE_URL") {
        if !url.is_empty() {
            settings.store_url = url;
        }
    }
    if let Ok(url) = std::env::var("FACTURAS_IDENTITY_URL") {
        if !url.is_empty() {
            settings.identity_url = url;
        }
    }
    settings
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    let dir = config_dir();
    std::fs::create_dir_all(&dir)?;
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| FacturaError::Settings(e.to_string()))?;
    std::fs::write(settings_path(), format!("{json}\n"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert!(s.store_url.starts_with("https://"));
        assert!(s.identity_url.starts_with("https://"));
    }

    #[test]
    fn test_partial_file_merges_with_defaults() {
        let s: Settings =
            serde_json::from_str(r#"{"store_url": "http://localhost:9090"}"#).unwrap();
        assert_eq!(s.store_url, "http://localhost:9090");
        assert_eq!(s.identity_url, default_identity_url());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = Settings {
            store_url: "http://localhost:9090".to_string(),
            identity_url: "http://localhost:9091".to_string(),
        };
        let json = serde_json::to_string_pretty(&settings).unwrap();
        std::fs::write(&path, &json).unwrap();
        let loaded: Settings =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded.store_url, settings.store_url);
        assert_eq!(loaded.identity_url, settings.identity_url);
    }
}
