//! # Quantity Formatting
//!
//! Two renderings of a numeric quantity:
//!
//! - [`format_with_unit`] for shopping list lines (`"1.5 cup"`, `"100 g"`)
//! - [`format_fraction`] for cooking instructions, where common fractions are
//!   shown as glyphs (`"1½"`, `"⅓"`)

use crate::quantity_scaler::round2;
use crate::recipe_model::Unit;

/// Fraction glyphs with the fractional values that map to them exactly
/// and the tolerance band applied after a whole number
struct FractionGlyph {
    glyph: char,
    exact: &'static [f64],
    band: (f64, f64),
}

const FRACTION_GLYPHS: [FractionGlyph; 5] = [
    FractionGlyph { glyph: '¼', exact: &[0.25], band: (0.24, 0.26) },
    FractionGlyph { glyph: '½', exact: &[0.5], band: (0.49, 0.51) },
    FractionGlyph { glyph: '¾', exact: &[0.75], band: (0.74, 0.76) },
    FractionGlyph { glyph: '⅓', exact: &[0.33, 0.34], band: (0.32, 0.35) },
    FractionGlyph { glyph: '⅔', exact: &[0.67, 0.66], band: (0.65, 0.68) },
];

/// Render a quantity with its unit, at most two decimals, no trailing zeros
///
/// ```rust
/// use recipe_cart::quantity_format::format_with_unit;
/// use recipe_cart::recipe_model::Unit;
///
/// assert_eq!(format_with_unit(100.0, Unit::Grams), "100 g");
/// assert_eq!(format_with_unit(1.50, Unit::Tablespoons), "1.5 tbsp");
/// ```
pub fn format_with_unit(quantity: f64, unit: Unit) -> String {
    format!("{} {}", format_decimal(quantity), unit)
}

/// Render a number rounded to two decimals without trailing zeros
pub fn format_decimal(quantity: f64) -> String {
    let rounded = round2(quantity);
    if rounded.fract() == 0.0 {
        return format!("{rounded}");
    }
    format!("{rounded:.2}")
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

/// Render a quantity for instruction text, using fraction glyphs
///
/// Integers render plainly. Below one, only the exact values 0.25, 0.5,
/// 0.75, 0.33/0.34 and 0.67/0.66 become glyphs. Above one, the fractional
/// part is matched against the tolerance bands and rendered as
/// `"<whole><glyph>"`. Anything else is rounded to one decimal.
///
/// ```rust
/// use recipe_cart::quantity_format::format_fraction;
///
/// assert_eq!(format_fraction(1.5), "1½");
/// assert_eq!(format_fraction(0.33), "⅓");
/// assert_eq!(format_fraction(2.0), "2");
/// assert_eq!(format_fraction(3.14159), "3.1");
/// ```
pub fn format_fraction(quantity: f64) -> String {
    if quantity.fract() == 0.0 {
        return format!("{quantity}");
    }

    let whole = quantity.floor();
    let decimal = quantity - whole;

    if whole == 0.0 {
        if let Some(entry) = FRACTION_GLYPHS
            .iter()
            .find(|entry| entry.exact.contains(&quantity))
        {
            return entry.glyph.to_string();
        }
    } else if let Some(entry) = FRACTION_GLYPHS
        .iter()
        .find(|entry| decimal >= entry.band.0 && decimal <= entry.band.1)
    {
        return format!("{}{}", whole, entry.glyph);
    }

    let rounded = (quantity * 10.0).round() / 10.0;
    format!("{rounded}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_numbers_without_decimals() {
        assert_eq!(format_with_unit(100.0, Unit::Grams), "100 g");
        assert_eq!(format_with_unit(3.0, Unit::Pieces), "3 piece");
    }

    #[test]
    fn test_decimals_up_to_two_places() {
        assert_eq!(format_with_unit(1.5, Unit::Cups), "1.5 cup");
        assert_eq!(format_with_unit(233.333, Unit::Milliliters), "233.33 ml");
        assert_eq!(format_with_unit(0.125, Unit::Kilograms), "0.13 kg");
    }

    #[test]
    fn test_trailing_zeros_removed() {
        assert_eq!(format_with_unit(1.50, Unit::Tablespoons), "1.5 tbsp");
        assert_eq!(format_with_unit(2.999, Unit::Teaspoons), "3 tsp");
    }

    #[test]
    fn test_fraction_integers() {
        assert_eq!(format_fraction(2.0), "2");
        assert_eq!(format_fraction(0.0), "0");
        assert_eq!(format_fraction(12.0), "12");
    }

    #[test]
    fn test_fraction_exact_below_one() {
        assert_eq!(format_fraction(0.25), "¼");
        assert_eq!(format_fraction(0.5), "½");
        assert_eq!(format_fraction(0.75), "¾");
        assert_eq!(format_fraction(0.33), "⅓");
        assert_eq!(format_fraction(0.34), "⅓");
        assert_eq!(format_fraction(0.66), "⅔");
        assert_eq!(format_fraction(0.67), "⅔");
    }

    #[test]
    fn test_fraction_bands_need_whole_part() {
        assert_eq!(format_fraction(0.26), "0.3");
        assert_eq!(format_fraction(0.333333), "0.3");
        assert_eq!(format_fraction(1.255), "1¼");
    }

    #[test]
    fn test_fraction_with_whole_part() {
        assert_eq!(format_fraction(1.5), "1½");
        assert_eq!(format_fraction(2.25), "2¼");
        assert_eq!(format_fraction(3.75), "3¾");
        assert_eq!(format_fraction(1.3333), "1⅓");
        assert_eq!(format_fraction(2.6667), "2⅔");
    }

    #[test]
    fn test_fraction_fallback_one_decimal() {
        assert_eq!(format_fraction(3.14159), "3.1");
        assert_eq!(format_fraction(1.1), "1.1");
        assert_eq!(format_fraction(0.8), "0.8");
        assert_eq!(format_fraction(2.96), "3");
    }
}
