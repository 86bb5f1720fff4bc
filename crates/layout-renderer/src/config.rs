//! Renderer configuration, loadable from TOML.
//!
//! ```toml
//! web-dir = "./web"
//! templates-dir = "templates"
//! extension = "tera"
//! layout = "layouts/base.tera"
//!
//! [global-data]
//! SiteName = "Example"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;

use crate::data::DataMap;
use crate::template_index::DEFAULT_EXTENSION;

/// Template subdirectory of the web root when none is configured.
pub const DEFAULT_TEMPLATES_DIR: &str = "templates";

fn default_templates_dir() -> String {
    DEFAULT_TEMPLATES_DIR.to_string()
}

fn default_extension() -> String {
    DEFAULT_EXTENSION.to_string()
}

/// Everything needed to build a [`Renderer`](crate::Renderer).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RendererConfig {
    /// Web root; templates live in `<web_dir>/<templates_dir>`.
    pub web_dir: PathBuf,

    /// Template subdirectory of the web root. Default: "templates".
    #[serde(default = "default_templates_dir")]
    pub templates_dir: String,

    /// Extension of files indexed as templates. Default: "tera".
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Data merged under every render's page data.
    #[serde(default)]
    pub global_data: DataMap,

    /// Layout selected at startup, if any.
    pub layout: Option<String>,
}

impl RendererConfig {
    pub fn new(web_dir: impl Into<PathBuf>) -> Self {
        Self {
            web_dir: web_dir.into(),
            templates_dir: default_templates_dir(),
            extension: default_extension(),
            global_data: DataMap::new(),
            layout: None,
        }
    }

    #[must_use]
    pub fn with_global(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.global_data.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_layout(mut self, layout: impl Into<String>) -> Self {
        self.layout = Some(layout.into());
        self
    }

    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: Self = toml::from_str(&contents).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;
        tracing::debug!(?path, web_dir = ?config.web_dir, "Loaded renderer config");
        Ok(config)
    }

    /// Directory that gets indexed.
    pub fn template_root(&self) -> PathBuf {
        self.web_dir.join(&self.templates_dir)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
web-dir = "./web"
templates-dir = "views"
extension = "html"
layout = "base.html"

[global-data]
SiteName = "Example"
Year = 2024

[global-data.Owner]
name = "Ada"
"#;
        let config: RendererConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.web_dir, PathBuf::from("./web"));
        assert_eq!(config.template_root(), PathBuf::from("./web/views"));
        assert_eq!(config.extension, "html");
        assert_eq!(config.layout.as_deref(), Some("base.html"));
        assert_eq!(config.global_data["SiteName"], "Example");
        assert_eq!(config.global_data["Year"], 2024);
        assert_eq!(config.global_data["Owner"]["name"], "Ada");
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: RendererConfig = toml::from_str(r#"web-dir = "site""#).unwrap();
        assert_eq!(config.templates_dir, "templates");
        assert_eq!(config.extension, "tera");
        assert!(config.global_data.is_empty());
        assert!(config.layout.is_none());
    }

    #[test]
    fn test_builder() {
        let config = RendererConfig::new("site")
            .with_global("Name", "World")
            .with_layout("base.tera");
        assert_eq!(config.template_root(), PathBuf::from("site/templates"));
        assert_eq!(config.global_data["Name"], "World");
        assert_eq!(config.layout.as_deref(), Some("base.tera"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("renderer.toml");
        std::fs::write(&path, "web-dir = \"web\"\n[global-data]\nName = \"World\"\n").unwrap();

        let config = RendererConfig::load(&path).unwrap();
        assert_eq!(config.global_data["Name"], "World");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = RendererConfig::load(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("renderer.toml");
        std::fs::write(&path, "web-dir = [unterminated").unwrap();

        let err = RendererConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
