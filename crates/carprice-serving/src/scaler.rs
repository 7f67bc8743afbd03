//! Fitted scaling of the numeric columns.
//!
//! The scaler is fitted during training and applied unchanged at inference
//! time. It only ever sees the three numeric fields; indicator columns pass
//! through untouched.

use std::path::Path;

use carprice_core::{normalize_column_name, NumericField};
use serde::{Deserialize, Serialize};

use crate::encoder::FeatureRow;
use crate::error::{ServingError, ServingResult};
use crate::schema::ColumnLayout;

/// Transform of the numeric sub-vector, in [`NumericField::ALL`] order.
pub trait Scaler: Send + Sync {
    fn transform(&self, numeric: [f64; 3]) -> ServingResult<[f64; 3]>;
}

/// Kind of fitted transform stored in the scaler artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScalerKind {
    /// `(x - mean) / scale`
    Standard { mean: Vec<f64>, scale: Vec<f64> },
    /// `x * scale + min`
    MinMax { min: Vec<f64>, scale: Vec<f64> },
}

/// Scaler artifact as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalerArtifact {
    #[serde(flatten)]
    pub kind: ScalerKind,
    /// Column names the scaler was fitted on; fixes the order of its vectors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
}

/// A loaded, validated scaler with parameters reordered to [`NumericField::ALL`].
#[derive(Debug, Clone, PartialEq)]
pub struct FittedScaler {
    kind: FittedKind,
}

#[derive(Debug, Clone, PartialEq)]
enum FittedKind {
    Standard { mean: [f64; 3], scale: [f64; 3] },
    MinMax { min: [f64; 3], scale: [f64; 3] },
}

fn to_triple(name: &str, values: &[f64], order: &[usize; 3]) -> ServingResult<[f64; 3]> {
    if values.len() != 3 {
        return Err(ServingError::scaler_load(format!(
            "{name} has {} values, expected 3",
            values.len()
        )));
    }
    if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
        return Err(ServingError::scaler_load(format!(
            "{name} contains a non-finite value ({bad})"
        )));
    }
    let mut out = [0.0; 3];
    for (src, &dst) in order.iter().enumerate() {
        out[dst] = values[src];
    }
    Ok(out)
}

/// Map the artifact's column order onto [`NumericField::ALL`] positions.
fn resolve_order(feature_names: Option<&[String]>) -> ServingResult<[usize; 3]> {
    let Some(names) = feature_names else {
        return Ok([0, 1, 2]);
    };
    if names.len() != 3 {
        return Err(ServingError::scaler_load(format!(
            "scaler was fitted on {} columns, expected 3",
            names.len()
        )));
    }
    let mut order = [usize::MAX; 3];
    for (src, name) in names.iter().enumerate() {
        let normalized = normalize_column_name(name);
        let field = NumericField::ALL
            .into_iter()
            .find(|f| f.aliases().contains(&normalized.as_str()))
            .ok_or_else(|| {
                ServingError::scaler_load(format!("scaler column {name:?} is not a numeric field"))
            })?;
        if order.contains(&field.index()) {
            return Err(ServingError::scaler_load(format!(
                "scaler column {name:?} appears twice"
            )));
        }
        order[src] = field.index();
    }
    Ok(order)
}

impl FittedScaler {
    /// Validate an artifact and reorder its parameters.
    pub fn from_artifact(artifact: &ScalerArtifact) -> ServingResult<Self> {
        let order = resolve_order(artifact.feature_names.as_deref())?;
        let kind = match &artifact.kind {
            ScalerKind::Standard { mean, scale } => FittedKind::Standard {
                mean: to_triple("mean", mean, &order)?,
                // A constant training column has scale 0; treat it as 1.
                scale: to_triple("scale", scale, &order)?
                    .map(|s| if s == 0.0 { 1.0 } else { s }),
            },
            ScalerKind::MinMax { min, scale } => FittedKind::MinMax {
                min: to_triple("min", min, &order)?,
                scale: to_triple("scale", scale, &order)?,
            },
        };
        Ok(Self { kind })
    }

    /// Load and validate a scaler file.
    pub fn load(path: impl AsRef<Path>) -> ServingResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            ServingError::scaler_load(format!("cannot read {}: {e}", path.display()))
        })?;
        let artifact: ScalerArtifact = serde_json::from_str(&json).map_err(|e| {
            ServingError::scaler_load(format!("invalid scaler {}: {e}", path.display()))
        })?;
        Self::from_artifact(&artifact)
    }

    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            FittedKind::Standard { .. } => "standard",
            FittedKind::MinMax { .. } => "min_max",
        }
    }
}

impl Scaler for FittedScaler {
    fn transform(&self, numeric: [f64; 3]) -> ServingResult<[f64; 3]> {
        let out = match &self.kind {
            FittedKind::Standard { mean, scale } => {
                [0, 1, 2].map(|i| (numeric[i] - mean[i]) / scale[i])
            }
            FittedKind::MinMax { min, scale } => {
                [0, 1, 2].map(|i| numeric[i] * scale[i] + min[i])
            }
        };
        Ok(out)
    }
}

/// Replace the numeric columns of `row` with the scaler output, in place.
pub fn scale_row(
    scaler: &dyn Scaler,
    layout: &ColumnLayout,
    row: &mut FeatureRow,
) -> ServingResult<()> {
    let positions = layout.numeric_positions();
    if row.len() != layout.width() {
        return Err(ServingError::internal(format!(
            "row has {} columns, layout has {}",
            row.len(),
            layout.width()
        )));
    }
    let values = row.values_mut();
    let scaled = scaler.transform(positions.map(|p| values[p]))?;
    for (p, v) in positions.into_iter().zip(scaled) {
        values[p] = v;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::FeatureEncoder;
    use crate::schema::tests::training_schema;
    use carprice_core::CarAttributes;
    use std::sync::Arc;
    use tempfile::tempdir;

    fn standard() -> ScalerArtifact {
        ScalerArtifact {
            kind: ScalerKind::Standard {
                mean: vec![2015.0, 2.5, 80_000.0],
                scale: vec![5.0, 0.5, 40_000.0],
            },
            feature_names: None,
        }
    }

    #[test]
    fn test_standard_transform() {
        let scaler = FittedScaler::from_artifact(&standard()).unwrap();
        let out = scaler.transform([2020.0, 2.0, 40_000.0]).unwrap();
        assert_eq!(out, [1.0, -1.0, -1.0]);
    }

    #[test]
    fn test_min_max_transform() {
        let artifact = ScalerArtifact {
            kind: ScalerKind::MinMax {
                min: vec![-100.0, -0.2, 0.0],
                scale: vec![0.05, 0.2, 0.000005],
            },
            feature_names: None,
        };
        let scaler = FittedScaler::from_artifact(&artifact).unwrap();
        assert_eq!(scaler.kind_name(), "min_max");
        let out = scaler.transform([2000.0, 1.0, 200_000.0]).unwrap();
        assert!((out[0] - 0.0).abs() < 1e-9);
        assert!((out[1] - 0.0).abs() < 1e-9);
        assert!((out[2] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_scale_treated_as_one() {
        let artifact = ScalerArtifact {
            kind: ScalerKind::Standard {
                mean: vec![0.0, 0.0, 0.0],
                scale: vec![0.0, 1.0, 1.0],
            },
            feature_names: None,
        };
        let scaler = FittedScaler::from_artifact(&artifact).unwrap();
        assert_eq!(scaler.transform([3.0, 4.0, 5.0]).unwrap(), [3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_feature_names_reorder_parameters() {
        let artifact = ScalerArtifact {
            kind: ScalerKind::Standard {
                mean: vec![80_000.0, 2015.0, 2.5],
                scale: vec![40_000.0, 5.0, 0.5],
            },
            feature_names: Some(vec![
                "Mileage".to_string(),
                "Year".to_string(),
                "Engine Size".to_string(),
            ]),
        };
        let reordered = FittedScaler::from_artifact(&artifact).unwrap();
        let plain = FittedScaler::from_artifact(&standard()).unwrap();
        assert_eq!(reordered, plain);
    }

    #[test]
    fn test_invalid_artifacts() {
        let short = ScalerArtifact {
            kind: ScalerKind::Standard {
                mean: vec![1.0, 2.0],
                scale: vec![1.0, 1.0, 1.0],
            },
            feature_names: None,
        };
        assert!(matches!(
            FittedScaler::from_artifact(&short),
            Err(ServingError::ScalerLoadError(_))
        ));

        let nan = ScalerArtifact {
            kind: ScalerKind::Standard {
                mean: vec![1.0, f64::NAN, 2.0],
                scale: vec![1.0, 1.0, 1.0],
            },
            feature_names: None,
        };
        assert!(FittedScaler::from_artifact(&nan).is_err());

        let mut unknown = standard();
        unknown.feature_names = Some(vec!["Year".into(), "Engine Size".into(), "Doors".into()]);
        assert!(FittedScaler::from_artifact(&unknown).is_err());

        let mut twice = standard();
        twice.feature_names = Some(vec!["Year".into(), "year".into(), "Mileage".into()]);
        assert!(FittedScaler::from_artifact(&twice).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scaler.json");
        std::fs::write(
            &path,
            r#"{"type": "standard", "mean": [2015, 2.5, 80000], "scale": [5, 0.5, 40000],
                "feature_names": ["Year", "Engine Size", "Mileage"]}"#,
        )
        .unwrap();
        let scaler = FittedScaler::load(&path).unwrap();
        assert_eq!(scaler.kind_name(), "standard");

        assert!(matches!(
            FittedScaler::load(dir.path().join("missing.json")),
            Err(ServingError::ScalerLoadError(_))
        ));
    }

    #[test]
    fn test_scale_row_leaves_indicators_untouched() {
        let layout = Arc::new(ColumnLayout::resolve(&training_schema()).unwrap());
        let encoder = FeatureEncoder::new(Arc::clone(&layout));
        let raw = encoder.encode(&CarAttributes::default());

        let mut scaled = raw.clone();
        let scaler = FittedScaler::from_artifact(&standard()).unwrap();
        scale_row(&scaler, &layout, &mut scaled).unwrap();

        assert_eq!(scaled.values()[0], 0.0);
        assert_eq!(scaled.values()[1], -1.0);
        assert_eq!(scaled.values()[2], -0.75);
        assert_eq!(&scaled.values()[3..], &raw.values()[3..]);
    }
}
