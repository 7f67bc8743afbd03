//! Export Command Implementation
//!
//! Writes the demo artifact set so the other commands can be tried without a
//! trained model.

use anyhow::{Context, Result};
use carprice_serving::{demo_artifacts, ArtifactExporter};
use clap::Args;
use std::path::PathBuf;
use tracing::{info, warn};

/// Write demo artifacts
///
/// # Example
///
/// ```bash
/// carprice export-demo --output-dir ./artifacts --overwrite
/// ```
#[derive(Args, Debug, Clone)]
pub struct ExportDemoCommand {
    /// Output directory for the artifacts
    #[arg(long, short = 'o', default_value = "./artifacts")]
    pub output_dir: PathBuf,

    /// Overwrite an existing output directory
    #[arg(long)]
    pub overwrite: bool,
}

impl ExportDemoCommand {
    /// Execute the export command
    pub fn run(&self) -> Result<()> {
        if self.output_dir.exists() {
            if self.overwrite {
                warn!("Output path exists, overwriting: {:?}", self.output_dir);
                std::fs::remove_dir_all(&self.output_dir)
                    .context("Failed to remove existing output directory")?;
            } else {
                anyhow::bail!(
                    "Output path already exists: {:?}. Use --overwrite to replace.",
                    self.output_dir
                );
            }
        }

        let (schema, scaler, spec, params) = demo_artifacts();
        let out = ArtifactExporter::new(&self.output_dir)
            .export(&schema, &scaler, &spec, &params)
            .context("Failed to write demo artifacts")?;

        info!("Demo artifacts written to {:?}", out);
        println!("{}", out.display());
        Ok(())
    }
}
