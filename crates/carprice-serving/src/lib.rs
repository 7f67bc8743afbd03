//! Serving layer for the carprice estimator.
//!
//! This crate turns raw car attributes into a price estimate using three
//! artifacts produced at training time:
//!
//! - **Feature schema**: the ordered column names the model was fitted on
//! - **Scaler**: a fitted transform of the numeric columns
//! - **Model**: a Candle-backed regressor (linear or MLP)
//!
//! # Architecture
//!
//! ```text
//! CarAttributes
//!      │  FeatureEncoder (one-hot, schema order)
//!      ▼
//! FeatureRow ──► scale_row (Year, Engine Size, Mileage only)
//!      │
//!      ▼
//! InferenceModel::predict ──► clamp at 0 ──► PriceEstimate
//! ```
//!
//! All artifacts are loaded once by [`ArtifactBundle::load`], which also checks
//! that the schema, the encoder and the model agree. A mismatch is a startup
//! error; it is never discovered while serving an estimate.
//!
//! # Quick Start
//!
//! ```no_run
//! use carprice_core::CarAttributes;
//! use carprice_serving::{ArtifactBundle, ArtifactConfig, PricePredictor};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let bundle = ArtifactBundle::load(&ArtifactConfig::new("./artifacts"))?;
//! let predictor = PricePredictor::new(bundle);
//!
//! let estimate = predictor.predict(&CarAttributes::default())?;
//! println!("{estimate}");
//! # Ok(())
//! # }
//! ```
//!
//! # Testing without artifacts
//!
//! The predictor only depends on the [`Scaler`] and [`InferenceModel`] traits,
//! so tests can assemble a bundle from fakes with [`ArtifactBundle::from_parts`].

pub mod artifacts;
pub mod config;
pub mod encoder;
pub mod error;
pub mod export;
pub mod inference;
pub mod predictor;
pub mod scaler;
pub mod schema;

pub use artifacts::ArtifactBundle;
pub use config::{ArtifactConfig, ArtifactConfigBuilder, ConfigError};
pub use encoder::{FeatureEncoder, FeatureRow};
pub use error::{ServingError, ServingResult};
pub use export::{demo_artifacts, ArtifactExporter, ExportManifest};
pub use inference::{
    build_model, load_model, Activation, DenseParams, InferenceModel, LinearSpec, MlpSpec,
    ModelSpec,
};
pub use predictor::{format_thousands, PriceEstimate, PricePredictor};
pub use scaler::{scale_row, FittedScaler, Scaler, ScalerArtifact, ScalerKind};
pub use schema::{ColumnLayout, ColumnRole, FeatureSchema, Indicator};
