//! Predict Command Implementation
//!
//! One-shot estimate from command-line flags.

use std::io::{self, Write};

use anyhow::{Context, Result};
use carprice_core::{CarAttributes, CoreError, FuelType, InputBounds, Make, Transmission};
use carprice_serving::PricePredictor;
use clap::Args;

/// Estimate the price of one car
///
/// Every flag defaults to the value the form pre-fills.
///
/// # Example
///
/// ```bash
/// carprice predict --year 2019 --engine-size 1.6 --mileage 42000 \
///     --fuel-type Diesel --transmission Automatic --make Ford
/// ```
#[derive(Args, Debug, Clone)]
pub struct PredictCommand {
    /// Model year (2000 to the current year + 3)
    #[arg(long, default_value = "2015", value_parser = parse_year)]
    pub year: i32,

    /// Engine size in litres (1.0 to 6.0)
    #[arg(long, default_value = "2.0", value_parser = parse_engine_size)]
    pub engine_size: f64,

    /// Mileage (0 to 200000)
    #[arg(long, default_value = "50000", value_parser = parse_mileage)]
    pub mileage: u32,

    /// Fuel type: Petrol, Diesel or Electric
    #[arg(long, default_value = "Petrol")]
    pub fuel_type: FuelType,

    /// Transmission: Manual or Automatic
    #[arg(long, default_value = "Manual")]
    pub transmission: Transmission,

    /// Make: Toyota, Ford, Honda or BMW
    #[arg(long, default_value = "Toyota")]
    pub make: Make,

    /// Also print the feature row before and after scaling
    #[arg(long)]
    pub show_features: bool,
}

fn parse_year(raw: &str) -> Result<i32, CoreError> {
    InputBounds::current().parse_year(raw)
}

fn parse_engine_size(raw: &str) -> Result<f64, CoreError> {
    InputBounds::current().parse_engine_size(raw)
}

fn parse_mileage(raw: &str) -> Result<u32, CoreError> {
    InputBounds::current().parse_mileage(raw)
}

impl PredictCommand {
    pub fn attributes(&self) -> CarAttributes {
        CarAttributes {
            year: self.year,
            engine_size: self.engine_size,
            mileage: self.mileage,
            fuel_type: self.fuel_type,
            transmission: self.transmission,
            make: self.make,
        }
    }

    /// Execute the predict command, printing to stdout.
    pub fn run(&self, predictor: &PricePredictor) -> Result<()> {
        let stdout = io::stdout();
        self.write_estimate(predictor, &mut stdout.lock())
    }

    /// Write the estimate (and optionally the feature rows) to `out`.
    pub fn write_estimate<W: Write>(
        &self,
        predictor: &PricePredictor,
        out: &mut W,
    ) -> Result<()> {
        let attrs = self.attributes();
        InputBounds::current().validate(&attrs)?;

        if self.show_features {
            writeln!(out, "Encoded: {}", predictor.encode(&attrs))?;
            let scaled = predictor
                .prepare(&attrs)
                .context("Failed to scale features")?;
            writeln!(out, "Scaled:  {scaled}")?;
        }

        let estimate = predictor.predict(&attrs).context("Prediction failed")?;
        writeln!(out, "{estimate}")?;
        Ok(())
    }
}
