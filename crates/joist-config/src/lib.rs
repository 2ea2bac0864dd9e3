//! Joist configuration system
//!
//! This crate provides centralized configuration management for Joist,
//! loading settings from `joist.toml` as an alternative to environment
//! variables.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure for Joist
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct JoistConfig {
    /// Document locations
    pub documents: DocumentConfig,
    /// Runtime behavior
    pub runtime: RuntimeConfig,
    /// Text rendering settings
    pub text: TextConfig,
    /// Demo viewer viewport
    pub viewport: ViewportConfig,
}

/// Where layout and style documents are found
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    /// Bundle directory holding `Layouts/` and `Styles/`
    pub bundle_dir: PathBuf,
    /// Optional cache directory for downloaded documents
    pub cache_dir: Option<PathBuf>,
}

/// Runtime behavior switches
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Development mode: cache-first loading and stamp revalidation
    pub development: bool,
    /// Deliver reload events to subscribed screens
    pub hot_reload: bool,
}

/// Text measurement settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    /// Font size used when a component declares none
    pub base_font_size: f64,
}

/// Viewport the demo viewer lays out against
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Width in points
    pub width: f64,
    /// Height in points
    pub height: f64,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            bundle_dir: PathBuf::from("assets"),
            cache_dir: None,
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            development: false,
            hot_reload: true,
        }
    }
}

impl Default for TextConfig {
    fn default() -> Self {
        Self { base_font_size: 17.0 }
    }
}

impl Default for ViewportConfig {
    fn default() -> Self {
        // Portrait phone
        Self { width: 390.0, height: 844.0 }
    }
}

impl JoistConfig {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the joist.toml configuration file
    ///
    /// # Returns
    /// * `Ok(JoistConfig)` - Successfully loaded configuration
    /// * `Err(String)` - Error message if loading failed
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// Load configuration from the default location (joist.toml in the
    /// current directory) or return default configuration if the file
    /// doesn't exist
    pub fn load_or_default() -> Self {
        Self::load_from_file("joist.toml").unwrap_or_default()
    }

    /// Merge configuration with environment variables
    ///
    /// Environment variables take precedence over configuration file
    /// values, so a run can be redirected without editing the file.
    pub fn merge_with_env(&mut self) {
        // Document locations
        if let Ok(dir) = std::env::var("JOIST_BUNDLE_DIR") {
            self.documents.bundle_dir = PathBuf::from(dir);
        }
        if let Ok(dir) = std::env::var("JOIST_CACHE_DIR") {
            self.documents.cache_dir = Some(PathBuf::from(dir));
        }

        // Runtime switches
        if let Ok(val) = std::env::var("JOIST_DEV") {
            self.runtime.development = val == "1" || val.eq_ignore_ascii_case("true");
        }
        if let Ok(val) = std::env::var("JOIST_HOT_RELOAD") {
            self.runtime.hot_reload = val == "1" || val.eq_ignore_ascii_case("true");
        }

        // Text settings
        if let Ok(val) = std::env::var("JOIST_FONT_SIZE") {
            if let Ok(size) = val.parse::<f64>() {
                self.text.base_font_size = size;
            }
        }

        // Viewport
        if let Ok(val) = std::env::var("JOIST_VIEWPORT_WIDTH") {
            if let Ok(width) = val.parse::<f64>() {
                self.viewport.width = width;
            }
        }
        if let Ok(val) = std::env::var("JOIST_VIEWPORT_HEIGHT") {
            if let Ok(height) = val.parse::<f64>() {
                self.viewport.height = height;
            }
        }
    }

    /// Load configuration with environment variable overrides
    ///
    /// This is the recommended way to load configuration:
    /// 1. Load from joist.toml (or use defaults if not found)
    /// 2. Override with environment variables if present
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = JoistConfig::default();
        assert_eq!(config.documents.bundle_dir, PathBuf::from("assets"));
        assert!(!config.runtime.development);
        assert!(config.runtime.hot_reload);
        assert_eq!(config.text.base_font_size, 17.0);
    }

    #[test]
    fn test_toml_serialization() {
        let config = JoistConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: JoistConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.viewport.width, 390.0);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let parsed: JoistConfig = toml::from_str(
            r#"
            [runtime]
            development = true
            "#,
        )
        .unwrap();
        assert!(parsed.runtime.development);
        assert!(parsed.runtime.hot_reload, "unset fields keep their defaults");
        assert_eq!(parsed.text.base_font_size, 17.0);
    }

    #[test]
    fn test_merge_with_env() {
        // Set environment variable
        unsafe {
            std::env::set_var("JOIST_BUNDLE_DIR", "custom-assets");
            std::env::set_var("JOIST_DEV", "true");
        }

        let mut config = JoistConfig::default();
        config.merge_with_env();

        assert_eq!(config.documents.bundle_dir, PathBuf::from("custom-assets"));
        assert!(config.runtime.development);

        // Clean up
        unsafe {
            std::env::remove_var("JOIST_BUNDLE_DIR");
            std::env::remove_var("JOIST_DEV");
        }
    }
}
