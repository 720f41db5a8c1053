//! # Recipe and Shopping List Data Model
//!
//! This module defines the data structures shared by every part of the crate:
//! the immutable recipe catalog entries, the user's recipe selections and the
//! derived shopping list lines.
//!
//! ## Core Concepts
//!
//! - **Ingredient**: A named quantity in a fixed unit, tagged with a store category
//! - **Recipe**: A catalog entry with a default serving count and its ingredients
//! - **RecipeSelection**: A recipe picked by the user at a given serving count
//! - **ShoppingListItem**: One merged, quantity-summed line of the shopping list
//!
//! ## Usage
//!
//! ```rust
//! use recipe_cart::recipe_model::{Ingredient, IngredientCategory, Recipe, Unit};
//!
//! let recipe = Recipe::new("pasta", "Pasta", 4)
//!     .with_description("Simple pasta")
//!     .with_ingredient(Ingredient::new("1", "Pasta", 400.0, Unit::Grams, IngredientCategory::Pantry));
//!
//! assert_eq!(recipe.ingredients.len(), 1);
//! ```

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::quantity_format::format_with_unit;

lazy_static! {
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").expect("Whitespace pattern should be valid");
}

/// Measurement units supported by the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    /// Grams
    #[serde(rename = "g")]
    Grams,
    /// Kilograms
    #[serde(rename = "kg")]
    Kilograms,
    /// Milliliters, the canonical volume unit
    #[serde(rename = "ml")]
    Milliliters,
    /// Cups
    #[serde(rename = "cup")]
    Cups,
    /// Tablespoons
    #[serde(rename = "tbsp")]
    Tablespoons,
    /// Teaspoons
    #[serde(rename = "tsp")]
    Teaspoons,
    /// Individual pieces/items
    #[serde(rename = "piece")]
    Pieces,
}

/// Grocery store categories, declared in shopping list display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IngredientCategory {
    Produce,
    Meat,
    Dairy,
    Pantry,
    Spices,
}

/// An ingredient line of a recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Catalog identifier of the ingredient line
    pub id: String,

    /// Display name (e.g., "Olive Oil", "Ground beef")
    pub name: String,

    /// Amount for the recipe's default serving count
    pub quantity: f64,

    /// Unit the quantity is expressed in
    pub unit: Unit,

    /// Store category used for grouping
    pub category: IngredientCategory,
}

/// Step-by-step instructions split by cooking phase
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EnhancedInstructions {
    pub preparation: Vec<String>,
    pub cooking: Vec<String>,
    pub serving: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tips: Vec<String>,
}

/// A recipe from the static catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: String,
    /// Number of servings the ingredient quantities are written for
    pub default_servings: u32,
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enhanced_instructions: Option<EnhancedInstructions>,
}

/// A recipe chosen by the user at a serving count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeSelection {
    pub recipe_id: String,
    pub servings: u32,
}

/// One merged line of the shopping list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingListItem {
    /// Sequential id (`item-1`, `item-2`, ...), regenerated on every aggregation
    pub id: String,
    /// Aggregation key (`name|unit|category`), stable across recomputation
    pub key: String,
    /// Display name, taken from the first contributing ingredient
    pub ingredient_name: String,
    pub total_quantity: f64,
    pub unit: Unit,
    pub category: IngredientCategory,
    pub is_checked: bool,
    /// Contributing recipe ids in order of first appearance
    pub source_recipes: Vec<String>,
}

impl Unit {
    /// All supported units
    pub const ALL: [Unit; 7] = [
        Unit::Grams,
        Unit::Kilograms,
        Unit::Milliliters,
        Unit::Cups,
        Unit::Tablespoons,
        Unit::Teaspoons,
        Unit::Pieces,
    ];

    /// Get the short symbol used in the catalog and on screen
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Grams => "g",
            Unit::Kilograms => "kg",
            Unit::Milliliters => "ml",
            Unit::Cups => "cup",
            Unit::Tablespoons => "tbsp",
            Unit::Teaspoons => "tsp",
            Unit::Pieces => "piece",
        }
    }
}

impl FromStr for Unit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Unit::ALL
            .iter()
            .copied()
            .find(|unit| unit.as_str() == s)
            .ok_or_else(|| format!("unknown unit: {s}"))
    }
}

impl IngredientCategory {
    /// Categories in display order
    pub const ALL: [IngredientCategory; 5] = [
        IngredientCategory::Produce,
        IngredientCategory::Meat,
        IngredientCategory::Dairy,
        IngredientCategory::Pantry,
        IngredientCategory::Spices,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IngredientCategory::Produce => "produce",
            IngredientCategory::Meat => "meat",
            IngredientCategory::Dairy => "dairy",
            IngredientCategory::Pantry => "pantry",
            IngredientCategory::Spices => "spices",
        }
    }

    /// Position of the category in the shopping list
    pub fn rank(&self) -> usize {
        *self as usize
    }
}

impl FromStr for IngredientCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IngredientCategory::ALL
            .iter()
            .copied()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| format!("unknown ingredient category: {s}"))
    }
}

impl Ingredient {
    /// Create a new ingredient line
    pub fn new(
        id: &str,
        name: &str,
        quantity: f64,
        unit: Unit,
        category: IngredientCategory,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            quantity,
            unit,
            category,
        }
    }

    /// Path of the illustration for this ingredient
    pub fn image_path(&self, base_url: &str) -> String {
        ingredient_image_path(base_url, &self.name)
    }
}

impl Recipe {
    /// Create a recipe with no ingredients or instructions
    pub fn new(id: &str, name: &str, default_servings: u32) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            image_url: String::new(),
            default_servings,
            ingredients: Vec::new(),
            instructions: Vec::new(),
            enhanced_instructions: None,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// Append an ingredient
    pub fn with_ingredient(mut self, ingredient: Ingredient) -> Self {
        self.ingredients.push(ingredient);
        self
    }

    /// Append an instruction step
    pub fn with_instruction(mut self, step: &str) -> Self {
        self.instructions.push(step.to_string());
        self
    }
}

impl RecipeSelection {
    pub fn new(recipe_id: &str, servings: u32) -> Self {
        Self {
            recipe_id: recipe_id.to_string(),
            servings,
        }
    }
}

/// Build the illustration path for an ingredient name
///
/// The name is lowercased and every whitespace run becomes a single `-`,
/// so "Chicken Breast" maps to `<base>images/ingredients/chicken-breast.png`.
pub fn ingredient_image_path(base_url: &str, ingredient_name: &str) -> String {
    let lowered = ingredient_name.to_lowercase();
    let slug = WHITESPACE_RUN.replace_all(&lowered, "-");
    format!("{base_url}images/ingredients/{slug}.png")
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for IngredientCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", format_with_unit(self.quantity, self.unit), self.name)
    }
}

impl fmt::Display for ShoppingListItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = if self.is_checked { "x" } else { " " };
        write!(
            f,
            "[{}] {} - {}",
            mark,
            self.ingredient_name,
            format_with_unit(self.total_quantity, self.unit)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipe_builder() {
        let recipe = Recipe::new("r1", "Greek Salad", 2)
            .with_description("A fresh Mediterranean salad")
            .with_ingredient(Ingredient::new(
                "1",
                "Cucumber",
                1.0,
                Unit::Pieces,
                IngredientCategory::Produce,
            ))
            .with_instruction("Chop everything");

        assert_eq!(recipe.default_servings, 2);
        assert_eq!(recipe.ingredients[0].name, "Cucumber");
        assert_eq!(recipe.instructions, vec!["Chop everything".to_string()]);
        assert!(recipe.enhanced_instructions.is_none());
    }

    #[test]
    fn test_unit_parsing() {
        assert_eq!("tbsp".parse::<Unit>(), Ok(Unit::Tablespoons));
        assert_eq!("piece".parse::<Unit>(), Ok(Unit::Pieces));
        assert!("pinch".parse::<Unit>().is_err());
    }

    #[test]
    fn test_category_order_matches_rank() {
        assert!(IngredientCategory::Produce < IngredientCategory::Meat);
        assert!(IngredientCategory::Pantry < IngredientCategory::Spices);
        assert_eq!(IngredientCategory::Dairy.rank(), 2);
        assert_eq!("spices".parse::<IngredientCategory>(), Ok(IngredientCategory::Spices));
    }

    #[test]
    fn test_recipe_json_field_names() {
        let json = r#"{
            "id": "recipe-1",
            "name": "Pasta",
            "description": "Simple pasta",
            "imageUrl": "/images/pasta.png",
            "defaultServings": 4,
            "ingredients": [
                { "id": "1", "name": "Pasta", "quantity": 400, "unit": "g", "category": "pantry" },
                { "id": "2", "name": "Olive Oil", "quantity": 2, "unit": "tbsp", "category": "pantry" }
            ],
            "instructions": ["Cook pasta"]
        }"#;

        let recipe: Recipe = serde_json::from_str(json).unwrap();
        assert_eq!(recipe.default_servings, 4);
        assert_eq!(recipe.image_url, "/images/pasta.png");
        assert_eq!(recipe.ingredients[1].unit, Unit::Tablespoons);
        assert_eq!(recipe.ingredients[1].category, IngredientCategory::Pantry);
    }

    #[test]
    fn test_selection_serialization() {
        let selection = RecipeSelection::new("recipe-1", 6);
        let json = serde_json::to_string(&selection).unwrap();
        assert_eq!(json, r#"{"recipeId":"recipe-1","servings":6}"#);
    }

    #[test]
    fn test_ingredient_image_path() {
        assert_eq!(
            ingredient_image_path("/", "Chicken Breast"),
            "/images/ingredients/chicken-breast.png"
        );
        assert_eq!(
            ingredient_image_path("/app/", "Extra  Virgin\tOlive Oil"),
            "/app/images/ingredients/extra-virgin-olive-oil.png"
        );

        let ingredient = Ingredient::new("1", "Red Onion", 1.0, Unit::Pieces, IngredientCategory::Produce);
        assert_eq!(
            ingredient.image_path("https://cdn.example.com/"),
            "https://cdn.example.com/images/ingredients/red-onion.png"
        );
    }

    #[test]
    fn test_display_formatting() {
        let ingredient = Ingredient::new("1", "Flour", 1.5, Unit::Cups, IngredientCategory::Pantry);
        assert_eq!(format!("{}", ingredient), "1.5 cup Flour");
    }
}
