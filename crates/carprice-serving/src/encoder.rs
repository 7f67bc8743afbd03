//! One-hot encoding of car attributes into a model input row.

use std::fmt;
use std::sync::Arc;

use carprice_core::{CarAttributes, CategoricalField, NumericField};

use crate::schema::ColumnLayout;

/// A single feature row, ordered exactly as the feature schema.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    columns: Arc<[String]>,
    values: Vec<f64>,
}

impl FeatureRow {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut [f64] {
        &mut self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value of the column with exactly this name.
    pub fn get(&self, column: &str) -> Option<f64> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|i| self.values[i])
    }

    /// Iterate over `(column, value)` pairs in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }
}

impl fmt::Display for FeatureRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (column, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{column}={value}")?;
        }
        Ok(())
    }
}

/// Turns [`CarAttributes`] into a [`FeatureRow`] following a resolved layout.
///
/// Inputs are assumed to be within bounds already; nothing is re-validated.
#[derive(Debug, Clone)]
pub struct FeatureEncoder {
    layout: Arc<ColumnLayout>,
}

impl FeatureEncoder {
    pub fn new(layout: Arc<ColumnLayout>) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &ColumnLayout {
        &self.layout
    }

    /// Build the unscaled row.
    ///
    /// Numeric columns carry the raw values. Each indicator column is 1 when
    /// the input selects its category and 0 otherwise, so a reference
    /// category leaves all of its field's indicators at 0.
    pub fn encode(&self, attrs: &CarAttributes) -> FeatureRow {
        let mut values = vec![0.0; self.layout.width()];

        for field in NumericField::ALL {
            values[self.layout.numeric_position(field)] = attrs.numeric(field);
        }

        for field in CategoricalField::ALL {
            let selected = attrs.category(field);
            for indicator in self.layout.indicators(field) {
                if indicator.category == selected {
                    values[indicator.position] = 1.0;
                }
            }
        }

        FeatureRow {
            columns: Arc::clone(self.layout.columns()),
            values,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::tests::training_schema;
    use crate::schema::FeatureSchema;
    use carprice_core::{FuelType, Make, Transmission};

    fn encoder(schema: &FeatureSchema) -> FeatureEncoder {
        FeatureEncoder::new(Arc::new(ColumnLayout::resolve(schema).unwrap()))
    }

    #[test]
    fn test_example_scenario() {
        let encoder = encoder(&training_schema());
        let row = encoder.encode(&CarAttributes {
            year: 2015,
            engine_size: 2.0,
            mileage: 50_000,
            fuel_type: FuelType::Petrol,
            transmission: Transmission::Manual,
            make: Make::Toyota,
        });

        assert_eq!(row.columns(), training_schema().columns());
        assert_eq!(
            row.values(),
            &[2015.0, 2.0, 50_000.0, 0.0, 0.0, 0.0, 1.0, 0.0, 1.0, 1.0]
        );
        assert_eq!(row.get("Make_Toyota"), Some(1.0));
        assert_eq!(row.get("Fuel Type_Electric"), Some(0.0));
        assert_eq!(row.get("Transmission_Manual"), Some(1.0));
    }

    #[test]
    fn test_reference_category_encodes_as_zeros() {
        let encoder = encoder(&training_schema());
        let row = encoder.encode(&CarAttributes {
            fuel_type: FuelType::Diesel,
            transmission: Transmission::Automatic,
            ..Default::default()
        });

        for indicator in encoder.layout().indicators(CategoricalField::FuelType) {
            assert_eq!(row.values()[indicator.position], 0.0);
        }
        for indicator in encoder.layout().indicators(CategoricalField::Transmission) {
            assert_eq!(row.values()[indicator.position], 0.0);
        }
    }

    #[test]
    fn test_bmw_reference_when_schema_omits_it() {
        let schema = FeatureSchema::new([
            "year",
            "engine_size",
            "mileage",
            "make_ford",
            "make_honda",
            "make_toyota",
            "fuel_type_electric",
            "fuel_type_petrol",
            "trans_manual",
        ]);
        let encoder = encoder(&schema);
        let row = encoder.encode(&CarAttributes {
            make: Make::Bmw,
            ..Default::default()
        });

        assert_eq!(row.get("make_ford"), Some(0.0));
        assert_eq!(row.get("make_honda"), Some(0.0));
        assert_eq!(row.get("make_toyota"), Some(0.0));
        assert_eq!(row.get("fuel_type_petrol"), Some(1.0));
        assert_eq!(row.get("trans_manual"), Some(1.0));
    }

    #[test]
    fn test_each_field_has_at_most_one_hot() {
        let encoder = encoder(&training_schema());
        for &make in Make::ALL {
            for &fuel_type in FuelType::ALL {
                for &transmission in Transmission::ALL {
                    let row = encoder.encode(&CarAttributes {
                        make,
                        fuel_type,
                        transmission,
                        ..Default::default()
                    });
                    assert_eq!(row.len(), 10);
                    for field in CategoricalField::ALL {
                        let hot: f64 = encoder
                            .layout()
                            .indicators(field)
                            .map(|i| row.values()[i.position])
                            .sum();
                        assert!(hot == 0.0 || hot == 1.0);
                    }
                }
            }
        }
    }

    #[test]
    fn test_display_lists_columns() {
        let schema = FeatureSchema::new([
            "Year",
            "Engine Size",
            "Mileage",
            "Make_Ford",
            "Fuel Type_Petrol",
            "Transmission_Manual",
        ]);
        let row = encoder(&schema).encode(&CarAttributes::default());
        assert_eq!(
            row.to_string(),
            "Year=2015, Engine Size=2, Mileage=50000, Make_Ford=0, Fuel Type_Petrol=1, Transmission_Manual=1"
        );
    }
}
