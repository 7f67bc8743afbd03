//! Encode, scale, predict, clamp.
//!
//! [`PricePredictor`] is a stateless function of its input and the loaded
//! [`ArtifactBundle`]: identical inputs always produce identical estimates.

use std::fmt;

use carprice_core::CarAttributes;
use tracing::debug;

use crate::artifacts::ArtifactBundle;
use crate::encoder::{FeatureEncoder, FeatureRow};
use crate::error::{ServingError, ServingResult};
use crate::scaler::scale_row;

/// A non-negative price estimate.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct PriceEstimate(f64);

impl PriceEstimate {
    /// Clamp a raw model output at zero. Non-finite outputs are errors.
    pub fn from_model_output(raw: f64) -> ServingResult<Self> {
        if !raw.is_finite() {
            return Err(ServingError::prediction(format!("model returned {raw}")));
        }
        // -0.0 must not survive the clamp
        Ok(Self(if raw > 0.0 { raw } else { 0.0 }))
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// The price as `$12,345.67`.
    pub fn formatted(&self) -> String {
        format!("${}", format_thousands(self.0))
    }
}

impl fmt::Display for PriceEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Predicted Car Price: {}", self.formatted())
    }
}

/// Format a non-negative amount with two decimals and comma-grouped thousands.
///
/// Rounding happens before grouping, so `999.999` becomes `1,000.00`.
pub fn format_thousands(amount: f64) -> String {
    let fixed = format!("{amount:.2}");
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", int_part),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("{sign}{grouped}.{frac_part}")
}

/// Runs the encode, scale, predict and clamp sequence against a loaded bundle.
#[derive(Debug, Clone)]
pub struct PricePredictor {
    bundle: ArtifactBundle,
    encoder: FeatureEncoder,
}

impl PricePredictor {
    pub fn new(bundle: ArtifactBundle) -> Self {
        let encoder = FeatureEncoder::new(bundle.layout().clone());
        Self { bundle, encoder }
    }

    pub fn bundle(&self) -> &ArtifactBundle {
        &self.bundle
    }

    /// The unscaled feature row for `attrs`.
    pub fn encode(&self, attrs: &CarAttributes) -> FeatureRow {
        self.encoder.encode(attrs)
    }

    /// The feature row exactly as the model sees it.
    pub fn prepare(&self, attrs: &CarAttributes) -> ServingResult<FeatureRow> {
        let mut row = self.encoder.encode(attrs);
        scale_row(self.bundle.scaler(), self.bundle.layout(), &mut row)?;
        Ok(row)
    }

    /// Estimate the price of a car. Negative model outputs become 0.
    pub fn predict(&self, attrs: &CarAttributes) -> ServingResult<PriceEstimate> {
        let row = self.prepare(attrs)?;
        let raw = self.bundle.model().predict(row.values())?;
        let estimate = PriceEstimate::from_model_output(raw)?;
        debug!(?attrs, raw, estimate = estimate.value(), "Predicted price");
        Ok(estimate)
    }
}
