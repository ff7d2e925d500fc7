/// Viewer settings
///
/// Read from `config.toml` in the platform config directory
/// (`~/.config/album-viewer/` on Linux), then overridden from the command line.
/// A missing file just means defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::ui::layout::{DEFAULT_OVERLAY_MARGIN, DEFAULT_SMALL_SCREEN};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Album tree: a directory or an http(s) base URL
    pub source: String,
    /// Fragment opened at startup
    pub start: Option<String>,
    /// Pixels kept free around the full-screen overlay
    pub overlay_margin: f32,
    /// Below this width or height the compact layout is used
    pub small_screen_threshold: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            source: ".".to_string(),
            start: None,
            overlay_margin: DEFAULT_OVERLAY_MARGIN,
            small_screen_threshold: DEFAULT_SMALL_SCREEN,
        }
    }
}

impl ViewerConfig {
    /// Default location of the config file, if the platform has one
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("album-viewer").join("config.toml"))
    }

    /// Load from an explicit path, or from the default location.
    /// An explicit path must exist; the default one may be absent.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => match Self::default_path() {
                Some(path) => (path, false),
                None => return Ok(Self::default()),
            },
        };

        if !required && !path.exists() {
            return Ok(Self::default());
        }

        let text = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let config = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;

        info!("📁 Loaded config from {}", path.display());
        Ok(config)
    }

    /// Apply command line values on top of the file
    pub fn with_overrides(
        mut self,
        source: Option<String>,
        start: Option<String>,
        overlay_margin: Option<f32>,
        small_screen_threshold: Option<f32>,
    ) -> Self {
        if let Some(source) = source {
            self.source = source;
        }
        if start.is_some() {
            self.start = start;
        }
        if let Some(margin) = overlay_margin {
            self.overlay_margin = margin;
        }
        if let Some(threshold) = small_screen_threshold {
            self.small_screen_threshold = threshold;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "source = \"https://photos.example.com/\"").unwrap();

        let config = ViewerConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.source, "https://photos.example.com/");
        assert_eq!(config.overlay_margin, 10.0);
        assert_eq!(config.small_screen_threshold, 600.0);
        assert!(config.start.is_none());
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = ViewerConfig::load(Some(&dir.path().join("nope.toml")));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_bad_toml_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "overlay_margin = \"wide\"").unwrap();
        let result = ViewerConfig::load(Some(file.path()));
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_command_line_wins() {
        let config = ViewerConfig::default().with_overrides(
            Some("/srv/albums".into()),
            Some("#/trip/2".into()),
            None,
            Some(480.0),
        );
        assert_eq!(config.source, "/srv/albums");
        assert_eq!(config.start.as_deref(), Some("#/trip/2"));
        assert_eq!(config.overlay_margin, 10.0);
        assert_eq!(config.small_screen_threshold, 480.0);
    }
}
