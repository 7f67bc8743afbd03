//! Property tests over the full input domain, using the demo artifacts.
//!
//! 1. Estimates are never negative and always format as `$X,XXX.XX`
//! 2. Identical inputs give identical estimates
//! 3. Encoded rows carry the schema's columns, in order
//! 4. Scaling only rewrites Year, Engine Size and Mileage

use std::sync::Arc;

use candle_core::Device;
use carprice_core::bounds::{
    ENGINE_SIZE_MAX, ENGINE_SIZE_MIN, MILEAGE_MAX, MILEAGE_MIN, YEAR_MIN,
};
use carprice_core::{CarAttributes, FuelType, InputBounds, Make, NumericField, Transmission};
use carprice_serving::{
    build_model, demo_artifacts, ArtifactBundle, FittedScaler, PricePredictor, Scaler,
};
use proptest::prelude::*;

fn demo_predictor() -> PricePredictor {
    let (schema, scaler, spec, params) = demo_artifacts();
    let scaler = FittedScaler::from_artifact(&scaler).unwrap();
    let model = build_model(&spec, &params, &Device::Cpu).unwrap();
    let bundle = ArtifactBundle::from_parts(schema, Arc::new(scaler), Arc::from(model)).unwrap();
    PricePredictor::new(bundle)
}

fn car_strategy() -> impl Strategy<Value = CarAttributes> {
    (
        YEAR_MIN..=InputBounds::current().year_max,
        ENGINE_SIZE_MIN..=ENGINE_SIZE_MAX,
        MILEAGE_MIN..=MILEAGE_MAX,
        prop::sample::select(FuelType::ALL),
        prop::sample::select(Transmission::ALL),
        prop::sample::select(Make::ALL),
    )
        .prop_map(
            |(year, engine_size, mileage, fuel_type, transmission, make)| CarAttributes {
                year,
                engine_size,
                mileage,
                fuel_type,
                transmission,
                make,
            },
        )
}

fn assert_money_format(formatted: &str) {
    let digits = formatted.strip_prefix('$').unwrap();
    let (int_part, frac) = digits.split_once('.').unwrap();
    assert_eq!(frac.len(), 2, "{formatted}");
    assert!(int_part
        .split(',')
        .enumerate()
        .all(|(i, g)| !g.is_empty()
            && g.len() <= 3
            && (i == 0 || g.len() == 3)
            && g.chars().all(|c| c.is_ascii_digit())));
}

proptest! {
    #[test]
    fn estimate_is_non_negative_and_formatted(attrs in car_strategy()) {
        let predictor = demo_predictor();
        InputBounds::current().validate(&attrs).unwrap();

        let estimate = predictor.predict(&attrs).unwrap();
        prop_assert!(estimate.value() >= 0.0);
        prop_assert!(estimate.value().is_sign_positive());
        assert_money_format(&estimate.formatted());
    }

    #[test]
    fn estimate_is_deterministic(attrs in car_strategy()) {
        let predictor = demo_predictor();
        let first = predictor.predict(&attrs).unwrap();
        prop_assert_eq!(predictor.predict(&attrs).unwrap(), first);
        prop_assert_eq!(demo_predictor().predict(&attrs).unwrap(), first);
    }

    #[test]
    fn rows_follow_schema_order(attrs in car_strategy()) {
        let predictor = demo_predictor();
        let schema = predictor.bundle().schema().columns();
        let raw = predictor.encode(&attrs);
        let scaled = predictor.prepare(&attrs).unwrap();
        prop_assert_eq!(raw.columns(), schema);
        prop_assert_eq!(scaled.columns(), schema);
    }

    #[test]
    fn scaling_touches_only_numeric_columns(attrs in car_strategy()) {
        let predictor = demo_predictor();
        let layout = predictor.bundle().layout();
        let raw = predictor.encode(&attrs);
        let scaled = predictor.prepare(&attrs).unwrap();
        let expected = predictor
            .bundle()
            .scaler()
            .transform(attrs.numeric_vector())
            .unwrap();

        for field in NumericField::ALL {
            let position = layout.numeric_position(field);
            prop_assert_eq!(raw.values()[position], attrs.numeric(field));
            prop_assert_eq!(scaled.values()[position], expected[field.index()]);
        }
        for position in 0..layout.width() {
            if !layout.numeric_positions().contains(&position) {
                prop_assert_eq!(scaled.values()[position], raw.values()[position]);
            }
        }
    }
}

#[test]
fn numeric_extremes_for_every_category() {
    let predictor = demo_predictor();
    let bounds = InputBounds::current();

    for year in [bounds.year_min, bounds.year_max] {
        for engine_size in [bounds.engine_size_min, bounds.engine_size_max] {
            for mileage in [bounds.mileage_min, bounds.mileage_max] {
                for &make in Make::ALL {
                    for &fuel_type in FuelType::ALL {
                        for &transmission in Transmission::ALL {
                            let attrs = CarAttributes {
                                year,
                                engine_size,
                                mileage,
                                fuel_type,
                                transmission,
                                make,
                            };
                            bounds.validate(&attrs).unwrap();
                            let estimate = predictor.predict(&attrs).unwrap();
                            assert!(estimate.value() >= 0.0, "{attrs:?}");
                            assert!(!estimate.formatted().contains('-'), "{attrs:?}");
                        }
                    }
                }
            }
        }
    }
}
