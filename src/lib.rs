//! # Recipe Cart
//!
//! A meal planner that turns selected recipes into a merged, categorized
//! shopping list. Recipes are scaled to the chosen serving counts, spoon and
//! cup measures are normalized to milliliters, and matching ingredients are
//! summed into one line per name, unit and store category.

pub mod catalog;
pub mod config;
pub mod ingredient_aggregator;
pub mod instruction_highlight;
pub mod localization;
pub mod planner;
pub mod quantity_format;
pub mod quantity_scaler;
pub mod recipe_filters;
pub mod recipe_model;
pub mod selection;
pub mod shopping_list;
pub mod storage;
pub mod unit_normalizer;

pub use catalog::RecipeCatalog;
pub use planner::Planner;
pub use recipe_model::{Ingredient, IngredientCategory, Recipe, RecipeSelection, ShoppingListItem, Unit};
