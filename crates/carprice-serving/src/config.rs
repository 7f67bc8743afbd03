//! Artifact configuration for the carprice serving layer.
//!
//! This module provides the configuration describing where the trained
//! artifacts (model spec, dense params, scaler and feature schema) live.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default model spec file name, relative to the artifact directory.
pub const MODEL_SPEC_FILENAME: &str = "model_spec.json";

/// Default dense params file, relative to the artifact directory.
pub const DENSE_PARAMS_FILENAME: &str = "dense/params.json";

/// Default scaler file name, relative to the artifact directory.
pub const SCALER_FILENAME: &str = "scaler.json";

/// Default feature schema file name, relative to the artifact directory.
pub const FEATURES_FILENAME: &str = "features.json";

/// Locations of the trained artifacts.
///
/// Relative file names are resolved against `artifact_dir`; absolute ones are
/// used as-is.
///
/// # Example
///
/// ```
/// use carprice_serving::config::ArtifactConfig;
///
/// let config = ArtifactConfig::builder()
///     .artifact_dir("/srv/carprice")
///     .scaler_file("scaler_v2.json")
///     .build();
///
/// assert_eq!(
///     config.scaler_path(),
///     std::path::PathBuf::from("/srv/carprice/scaler_v2.json")
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactConfig {
    /// Directory holding the artifacts (default: "./artifacts")
    pub artifact_dir: PathBuf,

    /// Model spec file
    pub model_spec_file: PathBuf,

    /// Dense parameter file
    pub params_file: PathBuf,

    /// Fitted scaler file
    pub scaler_file: PathBuf,

    /// Feature schema file
    pub features_file: PathBuf,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            artifact_dir: PathBuf::from("./artifacts"),
            model_spec_file: PathBuf::from(MODEL_SPEC_FILENAME),
            params_file: PathBuf::from(DENSE_PARAMS_FILENAME),
            scaler_file: PathBuf::from(SCALER_FILENAME),
            features_file: PathBuf::from(FEATURES_FILENAME),
        }
    }
}

impl ArtifactConfig {
    /// Create a configuration with default file names under `artifact_dir`.
    pub fn new(artifact_dir: impl Into<PathBuf>) -> Self {
        Self {
            artifact_dir: artifact_dir.into(),
            ..Default::default()
        }
    }

    /// Create a new configuration builder.
    pub fn builder() -> ArtifactConfigBuilder {
        ArtifactConfigBuilder::default()
    }

    /// Load a configuration from a JSON file.
    ///
    /// Missing keys take their default values.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::InvalidConfigFile(format!("{}: {e}", path.display())))?;
        serde_json::from_str(&contents)
            .map_err(|e| ConfigError::InvalidConfigFile(format!("{}: {e}", path.display())))
    }

    fn resolve(&self, file: &Path) -> PathBuf {
        if file.is_absolute() {
            file.to_path_buf()
        } else {
            self.artifact_dir.join(file)
        }
    }

    pub fn model_spec_path(&self) -> PathBuf {
        self.resolve(&self.model_spec_file)
    }

    pub fn params_path(&self) -> PathBuf {
        self.resolve(&self.params_file)
    }

    pub fn scaler_path(&self) -> PathBuf {
        self.resolve(&self.scaler_file)
    }

    pub fn features_path(&self) -> PathBuf {
        self.resolve(&self.features_file)
    }

    /// Validate the configuration against the filesystem.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.artifact_dir.is_dir() {
            return Err(ConfigError::ArtifactDirNotFound(self.artifact_dir.clone()));
        }
        for path in [
            self.model_spec_path(),
            self.params_path(),
            self.scaler_path(),
            self.features_path(),
        ] {
            if !path.is_file() {
                return Err(ConfigError::ArtifactNotFound(path));
            }
        }
        Ok(())
    }
}

/// Builder for [`ArtifactConfig`].
#[derive(Debug, Default)]
pub struct ArtifactConfigBuilder {
    artifact_dir: Option<PathBuf>,
    model_spec_file: Option<PathBuf>,
    params_file: Option<PathBuf>,
    scaler_file: Option<PathBuf>,
    features_file: Option<PathBuf>,
}

impl ArtifactConfigBuilder {
    /// Set the artifact directory.
    pub fn artifact_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.artifact_dir = Some(dir.into());
        self
    }

    /// Set the model spec file.
    pub fn model_spec_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.model_spec_file = Some(file.into());
        self
    }

    /// Set the dense params file.
    pub fn params_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.params_file = Some(file.into());
        self
    }

    /// Set the scaler file.
    pub fn scaler_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.scaler_file = Some(file.into());
        self
    }

    /// Set the feature schema file.
    pub fn features_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.features_file = Some(file.into());
        self
    }

    /// Build the configuration.
    pub fn build(self) -> ArtifactConfig {
        let default = ArtifactConfig::default();
        ArtifactConfig {
            artifact_dir: self.artifact_dir.unwrap_or(default.artifact_dir),
            model_spec_file: self.model_spec_file.unwrap_or(default.model_spec_file),
            params_file: self.params_file.unwrap_or(default.params_file),
            scaler_file: self.scaler_file.unwrap_or(default.scaler_file),
            features_file: self.features_file.unwrap_or(default.features_file),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// Artifact directory not found
    #[error("Artifact directory not found: {0}")]
    ArtifactDirNotFound(PathBuf),

    /// Artifact file not found
    #[error("Artifact file not found: {0}")]
    ArtifactNotFound(PathBuf),

    /// Invalid configuration file
    #[error("Invalid configuration file: {0}")]
    InvalidConfigFile(String),
}

impl From<ConfigError> for crate::error::ServingError {
    fn from(err: ConfigError) -> Self {
        crate::error::ServingError::ConfigError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = ArtifactConfig::default();
        assert_eq!(config.artifact_dir, PathBuf::from("./artifacts"));
        assert_eq!(
            config.model_spec_path(),
            PathBuf::from("./artifacts/model_spec.json")
        );
        assert_eq!(
            config.params_path(),
            PathBuf::from("./artifacts/dense/params.json")
        );
    }

    #[test]
    fn test_config_builder() {
        let config = ArtifactConfig::builder()
            .artifact_dir("/opt/models")
            .features_file("/etc/carprice/features.json")
            .build();

        assert_eq!(config.artifact_dir, PathBuf::from("/opt/models"));
        assert_eq!(
            config.features_path(),
            PathBuf::from("/etc/carprice/features.json")
        );
        assert_eq!(config.scaler_path(), PathBuf::from("/opt/models/scaler.json"));
    }

    #[test]
    fn test_config_validation() {
        let dir = tempdir().unwrap();
        let config = ArtifactConfig::new(dir.path().join("missing"));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ArtifactDirNotFound(_))
        ));

        let config = ArtifactConfig::new(dir.path());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ArtifactNotFound(p)) if p.ends_with("model_spec.json")
        ));

        std::fs::create_dir_all(dir.path().join("dense")).unwrap();
        for file in ["model_spec.json", "dense/params.json", "scaler.json", "features.json"] {
            std::fs::write(dir.path().join(file), "{}").unwrap();
        }
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("carprice.json");
        std::fs::write(&path, r#"{"artifact_dir": "/data/car", "scaler_file": "s.json"}"#).unwrap();

        let config = ArtifactConfig::from_json_file(&path).unwrap();
        assert_eq!(config.artifact_dir, PathBuf::from("/data/car"));
        assert_eq!(config.scaler_file, PathBuf::from("s.json"));
        assert_eq!(config.features_file, PathBuf::from(FEATURES_FILENAME));

        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            ArtifactConfig::from_json_file(&path),
            Err(ConfigError::InvalidConfigFile(_))
        ));
    }
}
