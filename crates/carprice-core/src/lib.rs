//! Core types for the carprice estimator.
//!
//! This crate provides the vocabulary shared by the serving layer and the
//! front-ends. It includes:
//!
//! - **Car attributes**: the six raw inputs of an estimate and the categorical
//!   and numeric field identifiers used to encode them.
//! - **Input bounds**: the inclusive ranges the form enforces before an input
//!   reaches the predictor.
//! - **Error types**: structured errors for rejected input.
//!
//! # Example
//!
//! ```
//! use carprice_core::{CarAttributes, FuelType, InputBounds, Make};
//!
//! let attrs = CarAttributes {
//!     year: 2019,
//!     make: "bmw".parse::<Make>().unwrap(),
//!     fuel_type: FuelType::Diesel,
//!     ..Default::default()
//! };
//!
//! let bounds = InputBounds::for_year(2026);
//! assert!(bounds.validate(&attrs).is_ok());
//! assert_eq!(attrs.make.label(), "BMW");
//! ```
//!
//! # Modules
//!
//! - [`vehicle`]: Categorical enums, field identifiers and [`CarAttributes`].
//! - [`bounds`]: [`InputBounds`] and parsing helpers for typed input.
//! - [`error`]: Error types for the library.

pub mod bounds;
pub mod error;
pub mod vehicle;

pub use bounds::InputBounds;
pub use error::{CoreError, Result};
pub use vehicle::{
    normalize_column_name, CarAttributes, CategoricalField, FuelType, Make, NumericField,
    Transmission,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crate_reexports() {
        let attrs = CarAttributes::default();
        let bounds = InputBounds::for_year(2026);
        assert!(bounds.validate(&attrs).is_ok());

        for field in CategoricalField::ALL {
            assert!(field.categories().contains(&attrs.category(field)));
        }

        let _err: Result<()> = Err(CoreError::out_of_range("Year", 1, 2, 3));
    }
}
