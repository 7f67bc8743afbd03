//! Writing artifact directories.
//!
//! This module provides [`ArtifactExporter`] for laying out a model, scaler
//! and feature schema in the structure [`ArtifactBundle::load`] expects, plus
//! a small self-consistent demo set used for smoke tests.
//!
//! [`ArtifactBundle::load`]: crate::artifacts::ArtifactBundle::load

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::config::{
    DENSE_PARAMS_FILENAME, FEATURES_FILENAME, MODEL_SPEC_FILENAME, SCALER_FILENAME,
};
use crate::error::{ServingError, ServingResult};
use crate::inference::{DenseParams, LinearSpec, ModelSpec};
use crate::scaler::{ScalerArtifact, ScalerKind};
use crate::schema::FeatureSchema;

/// Manifest file written alongside the artifacts.
pub const MANIFEST_FILENAME: &str = "manifest.json";

/// Summary of an exported artifact directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportManifest {
    /// Version of the exporter that wrote the directory.
    pub version: String,

    /// Timestamp of export (Unix epoch seconds).
    pub timestamp: u64,

    /// Model family (`linear`, `mlp`).
    pub model_type: String,

    /// Number of feature columns.
    pub feature_count: usize,

    /// Names of the dense parameters, sorted.
    pub dense_params: Vec<String>,
}

/// Writes artifacts into a directory.
///
/// Structure:
/// ```text
/// output_dir/
///   manifest.json
///   features.json
///   scaler.json
///   model_spec.json
///   dense/
///     params.json
/// ```
#[derive(Debug)]
pub struct ArtifactExporter {
    output_dir: PathBuf,
}

impl ArtifactExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Write all artifacts and the manifest. Existing files are replaced.
    pub fn export(
        &self,
        schema: &FeatureSchema,
        scaler: &ScalerArtifact,
        spec: &ModelSpec,
        params: &DenseParams,
    ) -> ServingResult<PathBuf> {
        tracing::info!(
            output = %self.output_dir.display(),
            model = spec.type_name(),
            columns = schema.len(),
            "Exporting artifacts"
        );

        std::fs::create_dir_all(self.output_dir.join("dense"))?;

        write_json(&self.output_dir.join(FEATURES_FILENAME), schema)?;
        write_json(&self.output_dir.join(SCALER_FILENAME), scaler)?;
        write_json(&self.output_dir.join(MODEL_SPEC_FILENAME), spec)?;
        write_json(&self.output_dir.join(DENSE_PARAMS_FILENAME), params)?;

        let mut dense_params: Vec<String> = params.keys().cloned().collect();
        dense_params.sort();
        let manifest = ExportManifest {
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
            model_type: spec.type_name().to_string(),
            feature_count: schema.len(),
            dense_params,
        };
        write_json(&self.output_dir.join(MANIFEST_FILENAME), &manifest)?;

        Ok(self.output_dir.clone())
    }

    /// Read the manifest of an exported directory.
    pub fn load_manifest(dir: impl AsRef<Path>) -> ServingResult<ExportManifest> {
        let path = dir.as_ref().join(MANIFEST_FILENAME);
        let json = std::fs::read_to_string(&path)?;
        serde_json::from_str(&json)
            .map_err(|e| ServingError::serialization(format!("{}: {e}", path.display())))
    }
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> ServingResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| ServingError::serialization(format!("{}: {e}", path.display())))?;
    std::fs::write(path, json)?;
    Ok(())
}

/// A small linear model over the ten training columns.
///
/// Coefficients apply to standardized numeric columns; old, small-engined,
/// high-mileage cars come out negative and exercise the zero clamp.
pub fn demo_artifacts() -> (FeatureSchema, ScalerArtifact, ModelSpec, DenseParams) {
    let columns = [
        ("Year", 3000.0),
        ("Engine Size", 2500.0),
        ("Mileage", -4000.0),
        ("Make_BMW", 9000.0),
        ("Make_Ford", -1500.0),
        ("Make_Honda", 0.0),
        ("Make_Toyota", 500.0),
        ("Fuel Type_Electric", 4000.0),
        ("Fuel Type_Petrol", 800.0),
        ("Transmission_Manual", -1200.0),
    ];

    let schema = FeatureSchema::new(columns.iter().map(|(name, _)| *name));
    let scaler = ScalerArtifact {
        kind: ScalerKind::Standard {
            mean: vec![2015.0, 2.5, 80_000.0],
            scale: vec![5.0, 1.0, 50_000.0],
        },
        feature_names: Some(vec![
            "Year".to_string(),
            "Engine Size".to_string(),
            "Mileage".to_string(),
        ]),
    };
    let spec = ModelSpec::Linear(LinearSpec {
        input_dim: columns.len(),
    });

    let mut params = DenseParams::new();
    params.insert(
        "linear.weight".to_string(),
        columns.iter().map(|(_, w)| *w).collect(),
    );
    params.insert("linear.bias".to_string(), vec![18_000.0]);

    (schema, scaler, spec, params)
}
