//! Viewer configuration.
//!
//! Every field has a default, so an empty YAML document (or no file at all)
//! yields the stock viewer: a 1024x768 window, 0.01 translation steps,
//! 3 degree rotation steps and a 1.05 Z-scale factor.

use crate::types::Rgb;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors from loading or validating a [`ViewerConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Per-frame increments applied while a control is held.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Steps {
    /// Translation distance per frame, in model units.
    pub translate: f32,
    /// Rotation angle per frame, in degrees.
    pub rotate_degrees: f32,
    /// Z-scale factor per frame. Must be greater than 1; shrinking uses the reciprocal.
    pub scale: f32,
}

impl Default for Steps {
    fn default() -> Self {
        Self {
            translate: 0.01,
            rotate_degrees: 3.0,
            scale: 1.05,
        }
    }
}

impl Steps {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.translate.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "steps.translate must be finite, got {}",
                self.translate
            )));
        }
        if !self.rotate_degrees.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "steps.rotate_degrees must be finite, got {}",
                self.rotate_degrees
            )));
        }
        if !self.scale.is_finite() || self.scale <= 1.0 {
            return Err(ConfigError::Invalid(format!(
                "steps.scale must be a finite factor > 1, got {}",
                self.scale
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "objview".into(),
            width: 1024,
            height: 768,
        }
    }
}

/// Top-level viewer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub window: WindowConfig,
    pub steps: Steps,
    /// Uniform scale applied to the mesh before the interactive transform.
    pub model_scale: f32,
    pub mesh_color: Rgb,
    pub clear_color: Rgb,
    /// Start in wireframe mode.
    pub wireframe: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            steps: Steps::default(),
            model_scale: 0.15,
            mesh_color: Rgb::WHITE,
            clear_color: Rgb([0.2, 0.3, 0.3]),
            wireframe: true,
        }
    }
}

impl ViewerConfig {
    /// Parse and validate a config from YAML text.
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        // serde_yaml rejects an empty document; treat it as all-defaults.
        let config: Self = if text.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(text)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_yaml(&text)?;
        tracing::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.steps.validate()?;
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size must be non-zero, got {}x{}",
                self.window.width, self.window.height
            )));
        }
        if !self.model_scale.is_finite() || self.model_scale <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "model_scale must be positive, got {}",
                self.model_scale
            )));
        }
        Ok(())
    }

    /// Window aspect ratio as configured.
    pub fn aspect(&self) -> f32 {
        self.window.width as f32 / self.window.height as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_stock_viewer() {
        let config = ViewerConfig::default();
        assert_eq!(config.steps.translate, 0.01);
        assert_eq!(config.steps.rotate_degrees, 3.0);
        assert_eq!(config.steps.scale, 1.05);
        assert_eq!(config.window.width, 1024);
        assert_eq!(config.window.height, 768);
        assert_eq!(config.model_scale, 0.15);
        assert!(config.wireframe);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_yaml_is_default() {
        let config = ViewerConfig::from_yaml("").unwrap();
        assert_eq!(config, ViewerConfig::default());
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let config = ViewerConfig::from_yaml("steps:\n  translate: 0.05\nwireframe: false\n").unwrap();
        assert_eq!(config.steps.translate, 0.05);
        assert_eq!(config.steps.scale, 1.05);
        assert!(!config.wireframe);
        assert_eq!(config.window.title, "objview");
    }

    #[test]
    fn rejects_shrinking_scale_step() {
        let err = ViewerConfig::from_yaml("steps:\n  scale: 0.9\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_zero_window() {
        let err = ViewerConfig::from_yaml("window:\n  width: 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn load_from_file() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(tmp, "window:\n  title: Cybertruck\nmodel_scale: 0.5").unwrap();
        let config = ViewerConfig::load(tmp.path()).unwrap();
        assert_eq!(config.window.title, "Cybertruck");
        assert_eq!(config.model_scale, 0.5);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ViewerConfig::load(dir.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
