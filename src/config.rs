use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::options::TextOverrides;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the order lookup endpoint. Empty means unset.
    pub api_url: String,
    /// Width in pixels at or below which the mobile layout is used.
    pub mobile_breakpoint: Option<u32>,
    pub window: WindowConfig,
    pub texts: TextOverrides,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 860.0,
            height: 420.0,
        }
    }
}

pub fn load() -> Config {
    match config_path() {
        Some(path) => load_from(&path),
        None => {
            tracing::warn!("Could not determine home directory, using defaults");
            Config::default()
        }
    }
}

/// Read `path`, falling back to defaults (with a log line) when it is
/// missing or malformed.
pub fn load_from(path: &Path) -> Config {
    if !path.exists() {
        tracing::info!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }
    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => {
                tracing::info!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::warn!("Failed to parse config: {}, using defaults", e);
                Config::default()
            }
        },
        Err(e) => {
            tracing::warn!("Failed to read config file: {}, using defaults", e);
            Config::default()
        }
    }
}

/// `~/.config/order-tracking/config.toml` on every platform.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join("order-tracking").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_from(&dir.path().join("absent.toml"));
        assert!(config.api_url.is_empty());
        assert_eq!(config.mobile_breakpoint, None);
        assert_eq!(config.window.width, 860.0);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
api_url = "https://shop.example/api/orders"
mobile_breakpoint = 640

[texts]
title = "Track Your Order"
"#
        )
        .unwrap();

        let config = load_from(file.path());
        assert_eq!(config.api_url, "https://shop.example/api/orders");
        assert_eq!(config.mobile_breakpoint, Some(640));
        assert_eq!(config.texts.title.as_deref(), Some("Track Your Order"));
        assert_eq!(config.texts.placeholder, None);
        assert_eq!(config.window.height, 420.0);
    }

    #[test]
    fn test_malformed_file_falls_back() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "api_url = [not toml").unwrap();
        let config = load_from(file.path());
        assert!(config.api_url.is_empty());
    }

    #[test]
    fn test_config_path_layout() {
        if let Some(path) = config_path() {
            assert!(path.ends_with(".config/order-tracking/config.toml"));
        }
    }
}
