//! # Quantity Scaler
//!
//! Scales ingredient quantities from a recipe's default serving count to a
//! target serving count. Results are rounded to two decimal places.

use crate::recipe_model::Ingredient;

/// Domain errors raised when a scaling request is invalid
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScaleError {
    /// The recipe's default serving count is zero or negative
    InvalidDefaultServings(i64),
    /// The requested serving count is negative
    NegativeTargetServings(i64),
}

impl std::fmt::Display for ScaleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScaleError::InvalidDefaultServings(_) => {
                write!(f, "Default servings must be greater than 0")
            }
            ScaleError::NegativeTargetServings(_) => {
                write!(f, "Target servings cannot be negative")
            }
        }
    }
}

impl std::error::Error for ScaleError {}

/// An ingredient paired with its quantity for a given serving count
#[derive(Debug, Clone, PartialEq)]
pub struct ScaledIngredient {
    /// The catalog ingredient, unchanged
    pub ingredient: Ingredient,
    /// Quantity for the target serving count
    pub scaled_quantity: f64,
}

/// Round to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Scale a quantity by `target_servings / default_servings`
///
/// # Errors
///
/// Returns [`ScaleError::InvalidDefaultServings`] when `default_servings <= 0`
/// and [`ScaleError::NegativeTargetServings`] when `target_servings < 0`.
/// A target of zero servings is valid and yields zero.
///
/// # Examples
///
/// ```rust
/// use recipe_cart::quantity_scaler::scale_quantity;
///
/// assert_eq!(scale_quantity(100.0, 3, 7), Ok(233.33));
/// assert!(scale_quantity(100.0, 0, 4).is_err());
/// ```
pub fn scale_quantity(
    quantity: f64,
    default_servings: i64,
    target_servings: i64,
) -> Result<f64, ScaleError> {
    if default_servings <= 0 {
        return Err(ScaleError::InvalidDefaultServings(default_servings));
    }
    if target_servings < 0 {
        return Err(ScaleError::NegativeTargetServings(target_servings));
    }

    let scale_factor = target_servings as f64 / default_servings as f64;
    Ok(round2(quantity * scale_factor))
}

/// Scale every ingredient of a recipe, keeping the originals intact
pub fn scale_ingredients(
    ingredients: &[Ingredient],
    default_servings: i64,
    target_servings: i64,
) -> Result<Vec<ScaledIngredient>, ScaleError> {
    ingredients
        .iter()
        .map(|ingredient| {
            Ok(ScaledIngredient {
                scaled_quantity: scale_quantity(
                    ingredient.quantity,
                    default_servings,
                    target_servings,
                )?,
                ingredient: ingredient.clone(),
            })
        })
        .collect()
}
