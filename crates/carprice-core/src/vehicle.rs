//! Car attributes collected from the user.
//!
//! This module provides the vocabulary shared by the encoder and the input
//! front-ends:
//!
//! - [`FuelType`], [`Transmission`], [`Make`]: categorical inputs with a fixed domain.
//! - [`CategoricalField`]: identifies one of the categorical inputs and the
//!   feature-column prefixes it is encoded under.
//! - [`NumericField`]: identifies one of the numeric inputs; these are the only
//!   columns subject to scaling.
//! - [`CarAttributes`]: the six raw values for one estimate.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

macro_rules! categorical_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $field:literal,
        { $first:ident => $first_label:literal $(, $variant:ident => $label:literal)* $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            #[serde(rename = $first_label)]
            $first,
            $(
                #[serde(rename = $label)]
                $variant,
            )*
        }

        impl $name {
            /// All categories, in the order the form offers them.
            pub const ALL: &'static [$name] = &[$name::$first $(, $name::$variant)*];

            /// Display labels, in the same order as [`Self::ALL`].
            pub const LABELS: &'static [&'static str] = &[$first_label $(, $label)*];

            /// The display label of this category.
            pub fn label(&self) -> &'static str {
                match self {
                    $name::$first => $first_label,
                    $($name::$variant => $label,)*
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$first
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let needle = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|c| c.label().eq_ignore_ascii_case(needle))
                    .ok_or_else(|| CoreError::unknown_category($field, needle, Self::LABELS))
            }
        }
    };
}

categorical_enum!(
    /// Fuel type of the car.
    FuelType, "Fuel Type",
    { Petrol => "Petrol", Diesel => "Diesel", Electric => "Electric" }
);

categorical_enum!(
    /// Gearbox type of the car.
    Transmission, "Transmission",
    { Manual => "Manual", Automatic => "Automatic" }
);

categorical_enum!(
    /// Manufacturer of the car.
    Make, "Make",
    { Toyota => "Toyota", Ford => "Ford", Honda => "Honda", Bmw => "BMW" }
);

/// One of the categorical inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoricalField {
    Make,
    FuelType,
    Transmission,
}

impl CategoricalField {
    /// All categorical fields.
    pub const ALL: [CategoricalField; 3] = [
        CategoricalField::Make,
        CategoricalField::FuelType,
        CategoricalField::Transmission,
    ];

    /// Human-readable field name, as shown on the form.
    pub fn label(&self) -> &'static str {
        match self {
            CategoricalField::Make => "Make",
            CategoricalField::FuelType => "Fuel Type",
            CategoricalField::Transmission => "Transmission",
        }
    }

    /// Known category labels for this field.
    pub fn categories(&self) -> &'static [&'static str] {
        match self {
            CategoricalField::Make => Make::LABELS,
            CategoricalField::FuelType => FuelType::LABELS,
            CategoricalField::Transmission => Transmission::LABELS,
        }
    }

    /// Normalized column-name prefixes that indicator columns of this field use.
    ///
    /// Longer prefixes come first so `fuel_type_petrol` is not read as `fuel` + `type_petrol`.
    pub fn column_prefixes(&self) -> &'static [&'static str] {
        match self {
            CategoricalField::Make => &["make"],
            CategoricalField::FuelType => &["fuel_type", "fueltype", "fuel"],
            CategoricalField::Transmission => &["transmission", "trans"],
        }
    }
}

impl fmt::Display for CategoricalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One of the numeric inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericField {
    Year,
    EngineSize,
    Mileage,
}

impl NumericField {
    /// The fixed order of the numeric sub-vector handed to the scaler.
    pub const ALL: [NumericField; 3] = [
        NumericField::Year,
        NumericField::EngineSize,
        NumericField::Mileage,
    ];

    /// Canonical feature column name.
    pub fn column_name(&self) -> &'static str {
        match self {
            NumericField::Year => "Year",
            NumericField::EngineSize => "Engine Size",
            NumericField::Mileage => "Mileage",
        }
    }

    /// Normalized column names this field answers to.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            NumericField::Year => &["year"],
            NumericField::EngineSize => &["engine_size", "enginesize", "engine_size_l"],
            NumericField::Mileage => &["mileage"],
        }
    }

    /// Position of this field in [`Self::ALL`].
    pub fn index(&self) -> usize {
        match self {
            NumericField::Year => 0,
            NumericField::EngineSize => 1,
            NumericField::Mileage => 2,
        }
    }
}

impl fmt::Display for NumericField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

/// Normalize a feature column name for matching.
///
/// Lowercases and maps spaces, hyphens and dots to `_`, so `Fuel Type_Petrol`,
/// `fuel-type_petrol` and `fuel_type_petrol` all compare equal.
pub fn normalize_column_name(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| match c {
            ' ' | '-' | '.' => '_',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}

/// The six raw values for one estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CarAttributes {
    pub year: i32,
    /// Engine displacement in litres.
    pub engine_size: f64,
    pub mileage: u32,
    pub fuel_type: FuelType,
    pub transmission: Transmission,
    pub make: Make,
}

impl Default for CarAttributes {
    /// The values the form starts with.
    fn default() -> Self {
        Self {
            year: 2015,
            engine_size: 2.0,
            mileage: 50_000,
            fuel_type: FuelType::default(),
            transmission: Transmission::default(),
            make: Make::default(),
        }
    }
}

impl CarAttributes {
    /// Raw value of a numeric field.
    pub fn numeric(&self, field: NumericField) -> f64 {
        match field {
            NumericField::Year => f64::from(self.year),
            NumericField::EngineSize => self.engine_size,
            NumericField::Mileage => f64::from(self.mileage),
        }
    }

    /// The numeric sub-vector in [`NumericField::ALL`] order.
    pub fn numeric_vector(&self) -> [f64; 3] {
        NumericField::ALL.map(|f| self.numeric(f))
    }

    /// Label of the selected category for a categorical field.
    pub fn category(&self, field: CategoricalField) -> &'static str {
        match field {
            CategoricalField::Make => self.make.label(),
            CategoricalField::FuelType => self.fuel_type.label(),
            CategoricalField::Transmission => self.transmission.label(),
        }
    }
}
