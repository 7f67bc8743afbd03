//! Carprice CLI Library
//!
//! This crate provides the command-line interface for the carprice estimator:
//!
//! - **Predict**: One-shot estimate from command-line flags
//! - **Form**: Interactive line form on stdin/stdout
//! - **Check**: Load the artifacts and report the resolved feature layout
//! - **Export demo**: Write a small self-consistent artifact set
//!
//! # Example
//!
//! ```bash
//! # Write demo artifacts and estimate a price
//! carprice export-demo --output-dir ./artifacts
//! carprice predict --year 2015 --engine-size 2.0 --mileage 50000 --make Toyota
//!
//! # Fill in the form interactively
//! carprice --artifact-dir ./artifacts form
//! ```

pub mod commands;

use std::path::PathBuf;

use anyhow::Context;
use carprice_serving::{ArtifactBundle, ArtifactConfig, PricePredictor};
use clap::{Parser, Subcommand};
use tracing::info;

pub use commands::{CheckCommand, ExportDemoCommand, FormCommand, PredictCommand};

/// Carprice - estimate the price of a used car
///
/// Encodes the car's attributes the way the model was trained, scales the
/// numeric columns and runs a pre-trained regressor.
#[derive(Parser, Debug)]
#[command(name = "carprice")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding the trained artifacts
    #[arg(
        long,
        short = 'a',
        global = true,
        env = "CARPRICE_ARTIFACT_DIR",
        default_value = "./artifacts"
    )]
    pub artifact_dir: PathBuf,

    /// JSON artifact configuration; replaces --artifact-dir when given
    #[arg(long, short = 'c', global = true, env = "CARPRICE_CONFIG")]
    pub config: Option<PathBuf>,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Estimate a price from command-line flags
    Predict(PredictCommand),

    /// Interactive form on stdin/stdout
    Form(FormCommand),

    /// Load the artifacts and report the resolved layout
    Check(CheckCommand),

    /// Write demo artifacts for smoke tests
    ExportDemo(ExportDemoCommand),
}

impl Cli {
    /// The artifact configuration selected by the global flags.
    pub fn artifact_config(&self) -> CliResult<ArtifactConfig> {
        match &self.config {
            Some(path) => ArtifactConfig::from_json_file(path)
                .with_context(|| format!("Failed to read config file {}", path.display())),
            None => Ok(ArtifactConfig::new(&self.artifact_dir)),
        }
    }
}

/// Load the artifacts named by `config` and build a predictor.
pub fn load_predictor(config: &ArtifactConfig) -> CliResult<PricePredictor> {
    let bundle = ArtifactBundle::load(config).with_context(|| {
        format!(
            "Failed to load artifacts from {}",
            config.artifact_dir.display()
        )
    })?;
    info!(columns = bundle.layout().width(), "Predictor ready");
    Ok(PricePredictor::new(bundle))
}

/// Result type alias for CLI operations
pub type CliResult<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_artifact_config_from_flag() {
        let cli = Cli::parse_from(["carprice", "--artifact-dir", "/tmp/model", "check"]);
        let config = cli.artifact_config().unwrap();
        assert_eq!(config.artifact_dir, PathBuf::from("/tmp/model"));
    }

    #[test]
    fn test_artifact_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"artifact_dir": "/srv/carprice", "scaler_file": "std_scaler.json"}}"#
        )
        .unwrap();

        let path = file.path().to_str().unwrap().to_string();
        let cli = Cli::parse_from(["carprice", "check", "--config", path.as_str()]);
        let config = cli.artifact_config().unwrap();
        assert_eq!(config.artifact_dir, PathBuf::from("/srv/carprice"));
        assert_eq!(
            config.scaler_path(),
            PathBuf::from("/srv/carprice/std_scaler.json")
        );
    }

    #[test]
    fn test_load_predictor_reports_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_predictor(&ArtifactConfig::new(dir.path())).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to load artifacts"));
    }
}
