//! # Unit Normalizer
//!
//! Converts spoon and cup measures into milliliters so the same ingredient
//! written in different volume units can be merged. Mass and count units are
//! never converted: doing so would need per-ingredient density data.

use crate::recipe_model::Unit;

/// Milliliters per unit for the convertible volume measures
const UNIT_TO_ML: [(Unit, f64); 3] = [
    (Unit::Teaspoons, 5.0),
    (Unit::Tablespoons, 15.0),
    (Unit::Cups, 240.0),
];

/// Milliliter factor of a convertible unit, `None` for units left as-is
pub fn ml_factor(unit: Unit) -> Option<f64> {
    UNIT_TO_ML
        .iter()
        .find(|(convertible, _)| *convertible == unit)
        .map(|(_, factor)| *factor)
}

/// Unit a quantity ends up in after normalization
pub fn normalized_unit(unit: Unit) -> Unit {
    if ml_factor(unit).is_some() {
        Unit::Milliliters
    } else {
        unit
    }
}

/// Normalize a quantity into its canonical unit
///
/// `tsp`, `tbsp` and `cup` become milliliters; every other unit passes through
/// unchanged. No rounding is applied.
///
/// ```rust
/// use recipe_cart::recipe_model::Unit;
/// use recipe_cart::unit_normalizer::normalize;
///
/// assert_eq!(normalize(2.0, Unit::Tablespoons), (30.0, Unit::Milliliters));
/// assert_eq!(normalize(2.0, Unit::Grams), (2.0, Unit::Grams));
/// ```
pub fn normalize(quantity: f64, unit: Unit) -> (f64, Unit) {
    match ml_factor(unit) {
        Some(factor) => (quantity * factor, Unit::Milliliters),
        None => (quantity, unit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convertible_units() {
        assert_eq!(normalize(1.0, Unit::Teaspoons), (5.0, Unit::Milliliters));
        assert_eq!(normalize(1.0, Unit::Tablespoons), (15.0, Unit::Milliliters));
        assert_eq!(normalize(1.5, Unit::Cups), (360.0, Unit::Milliliters));
    }

    #[test]
    fn test_pass_through_units() {
        for unit in [Unit::Grams, Unit::Kilograms, Unit::Milliliters, Unit::Pieces] {
            assert_eq!(normalize(3.25, unit), (3.25, unit));
            assert_eq!(normalized_unit(unit), unit);
        }
    }

    #[test]
    fn test_no_rounding() {
        let (quantity, _) = normalize(0.333, Unit::Teaspoons);
        assert!((quantity - 1.665).abs() < 1e-9);
    }

    #[test]
    fn test_only_spoons_and_cups_are_converted() {
        for unit in Unit::ALL {
            let converted = ml_factor(unit).is_some();
            assert_eq!(
                converted,
                matches!(unit, Unit::Teaspoons | Unit::Tablespoons | Unit::Cups),
                "{unit}"
            );
            if converted {
                assert_eq!(normalized_unit(unit), Unit::Milliliters);
            } else {
                assert_eq!(normalized_unit(unit), unit);
            }
        }
    }
}
