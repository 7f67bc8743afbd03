//! Input ranges enforced at the form boundary.
//!
//! The encoder trusts its inputs; every front-end checks raw values against
//! [`InputBounds`] before building a [`CarAttributes`].

use chrono::Datelike;

use crate::error::{CoreError, Result};
use crate::vehicle::CarAttributes;

/// Earliest model year accepted.
pub const YEAR_MIN: i32 = 2000;

/// How many years past the current one are accepted.
pub const YEAR_LOOKAHEAD: i32 = 3;

pub const ENGINE_SIZE_MIN: f64 = 1.0;
pub const ENGINE_SIZE_MAX: f64 = 6.0;

pub const MILEAGE_MIN: u32 = 0;
pub const MILEAGE_MAX: u32 = 200_000;

/// Inclusive ranges for the numeric inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputBounds {
    pub year_min: i32,
    pub year_max: i32,
    pub engine_size_min: f64,
    pub engine_size_max: f64,
    pub mileage_min: u32,
    pub mileage_max: u32,
}

impl InputBounds {
    /// Bounds relative to the given calendar year.
    pub fn for_year(current_year: i32) -> Self {
        Self {
            year_min: YEAR_MIN,
            year_max: current_year + YEAR_LOOKAHEAD,
            engine_size_min: ENGINE_SIZE_MIN,
            engine_size_max: ENGINE_SIZE_MAX,
            mileage_min: MILEAGE_MIN,
            mileage_max: MILEAGE_MAX,
        }
    }

    /// Bounds relative to the local clock.
    pub fn current() -> Self {
        Self::for_year(chrono::Local::now().year())
    }

    pub fn check_year(&self, year: i32) -> Result<i32> {
        if (self.year_min..=self.year_max).contains(&year) {
            Ok(year)
        } else {
            Err(CoreError::out_of_range("Year", year, self.year_min, self.year_max))
        }
    }

    /// NaN is rejected along with out-of-range values.
    pub fn check_engine_size(&self, engine_size: f64) -> Result<f64> {
        if (self.engine_size_min..=self.engine_size_max).contains(&engine_size) {
            Ok(engine_size)
        } else {
            Err(CoreError::out_of_range(
                "Engine Size",
                engine_size,
                format!("{:.1}", self.engine_size_min),
                format!("{:.1}", self.engine_size_max),
            ))
        }
    }

    pub fn check_mileage(&self, mileage: u32) -> Result<u32> {
        if (self.mileage_min..=self.mileage_max).contains(&mileage) {
            Ok(mileage)
        } else {
            Err(CoreError::out_of_range(
                "Mileage",
                mileage,
                self.mileage_min,
                self.mileage_max,
            ))
        }
    }

    /// Parse and range-check a year typed by the user.
    pub fn parse_year(&self, raw: &str) -> Result<i32> {
        let year = raw
            .trim()
            .parse::<i32>()
            .map_err(|e| CoreError::invalid_number("Year", raw.trim(), e))?;
        self.check_year(year)
    }

    /// Parse and range-check an engine size typed by the user.
    pub fn parse_engine_size(&self, raw: &str) -> Result<f64> {
        let size = raw
            .trim()
            .parse::<f64>()
            .map_err(|e| CoreError::invalid_number("Engine Size", raw.trim(), e))?;
        self.check_engine_size(size)
    }

    /// Parse and range-check a mileage typed by the user.
    ///
    /// Negative numbers fail to parse as `u32` and are reported as invalid.
    pub fn parse_mileage(&self, raw: &str) -> Result<u32> {
        let mileage = raw
            .trim()
            .parse::<u32>()
            .map_err(|e| CoreError::invalid_number("Mileage", raw.trim(), e))?;
        self.check_mileage(mileage)
    }

    /// Check every numeric field of a complete input.
    pub fn validate(&self, attrs: &CarAttributes) -> Result<()> {
        self.check_year(attrs.year)?;
        self.check_engine_size(attrs.engine_size)?;
        self.check_mileage(attrs.mileage)?;
        Ok(())
    }
}

impl Default for InputBounds {
    fn default() -> Self {
        Self::current()
    }
}
