//! Loading and cross-checking the trained artifacts.
//!
//! The model, the scaler and the feature schema are loaded once at startup and
//! shared read-only for the lifetime of the process. Any inconsistency between
//! them is reported here, before a single estimate is produced.

use std::sync::Arc;

use candle_core::Device;
use carprice_core::CategoricalField;
use tracing::info;

use crate::config::ArtifactConfig;
use crate::error::{ServingError, ServingResult};
use crate::inference::{load_model, InferenceModel};
use crate::scaler::{FittedScaler, Scaler};
use crate::schema::{ColumnLayout, FeatureSchema};

/// The three immutable collaborators of the predictor.
#[derive(Clone)]
pub struct ArtifactBundle {
    schema: Arc<FeatureSchema>,
    layout: Arc<ColumnLayout>,
    scaler: Arc<dyn Scaler>,
    model: Arc<dyn InferenceModel>,
}

impl std::fmt::Debug for ArtifactBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArtifactBundle")
            .field("schema", &self.schema)
            .field("model_input_dim", &self.model.input_dim())
            .finish_non_exhaustive()
    }
}

impl ArtifactBundle {
    /// Assemble a bundle from already-loaded parts.
    ///
    /// Resolves the schema into a column layout and checks that the model
    /// accepts rows of exactly that width.
    pub fn from_parts(
        schema: FeatureSchema,
        scaler: Arc<dyn Scaler>,
        model: Arc<dyn InferenceModel>,
    ) -> ServingResult<Self> {
        let layout = ColumnLayout::resolve(&schema)?;
        if model.input_dim() != layout.width() {
            return Err(ServingError::schema_mismatch(format!(
                "model expects {} features, schema has {} columns",
                model.input_dim(),
                layout.width()
            )));
        }
        Ok(Self {
            schema: Arc::new(schema),
            layout: Arc::new(layout),
            scaler,
            model,
        })
    }

    /// Load every artifact named by `config` and cross-check them.
    pub fn load(config: &ArtifactConfig) -> ServingResult<Self> {
        info!(dir = %config.artifact_dir.display(), "Loading artifacts");
        config.validate()?;

        let schema = FeatureSchema::load(config.features_path())?;
        info!(
            columns = schema.len(),
            path = %config.features_path().display(),
            "Loaded feature schema"
        );

        let scaler = FittedScaler::load(config.scaler_path())?;
        info!(
            kind = scaler.kind_name(),
            path = %config.scaler_path().display(),
            "Loaded scaler"
        );

        let model = load_model(config.model_spec_path(), config.params_path(), &Device::Cpu)?;
        info!(
            input_dim = model.input_dim(),
            path = %config.model_spec_path().display(),
            "Loaded model"
        );

        let bundle = Self::from_parts(schema, Arc::new(scaler), Arc::from(model))?;
        for field in CategoricalField::ALL {
            info!(
                field = %field,
                references = ?bundle.layout.reference_categories(field),
                "Reference categories"
            );
        }
        Ok(bundle)
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn layout(&self) -> &Arc<ColumnLayout> {
        &self.layout
    }

    pub fn scaler(&self) -> &dyn Scaler {
        self.scaler.as_ref()
    }

    pub fn model(&self) -> &dyn InferenceModel {
        self.model.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::{demo_artifacts, ArtifactExporter};
    use crate::schema::tests::training_schema;

    struct Identity;

    impl Scaler for Identity {
        fn transform(&self, numeric: [f64; 3]) -> ServingResult<[f64; 3]> {
            Ok(numeric)
        }
    }

    struct Constant(usize);

    impl InferenceModel for Constant {
        fn input_dim(&self) -> usize {
            self.0
        }

        fn predict(&self, _row: &[f64]) -> ServingResult<f64> {
            Ok(1.0)
        }
    }

    #[test]
    fn test_from_parts_checks_width() {
        let ok = ArtifactBundle::from_parts(
            training_schema(),
            Arc::new(Identity),
            Arc::new(Constant(10)),
        );
        assert!(ok.is_ok());

        let err = ArtifactBundle::from_parts(
            training_schema(),
            Arc::new(Identity),
            Arc::new(Constant(9)),
        )
        .unwrap_err();
        assert!(matches!(err, ServingError::SchemaMismatch(msg) if msg.contains("9 features")));
    }

    #[test]
    fn test_load_exported_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let (schema, scaler, spec, params) = demo_artifacts();
        ArtifactExporter::new(dir.path())
            .export(&schema, &scaler, &spec, &params)
            .unwrap();

        let bundle = ArtifactBundle::load(&ArtifactConfig::new(dir.path())).unwrap();
        assert_eq!(bundle.schema(), &schema);
        assert_eq!(bundle.layout().width(), 10);
        assert_eq!(bundle.model().input_dim(), 10);
    }

    #[test]
    fn test_load_fails_fast_on_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let err = ArtifactBundle::load(&ArtifactConfig::new(dir.path())).unwrap_err();
        assert!(err.is_startup_error());
    }

    #[test]
    fn test_load_fails_on_schema_model_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let (_, scaler, spec, params) = demo_artifacts();
        let short = FeatureSchema::new(
            training_schema()
                .columns()
                .iter()
                .filter(|c| c.as_str() != "Make_BMW")
                .cloned()
                .collect::<Vec<_>>(),
        );
        ArtifactExporter::new(dir.path())
            .export(&short, &scaler, &spec, &params)
            .unwrap();

        let err = ArtifactBundle::load(&ArtifactConfig::new(dir.path())).unwrap_err();
        assert!(matches!(err, ServingError::SchemaMismatch(msg) if msg.contains("9 columns")));
    }
}
