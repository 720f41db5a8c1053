//! # Ingredient Aggregator
//!
//! Turns the selected recipes into a single shopping list. Each recipe is
//! scaled to its own serving count, volume units are normalized to
//! milliliters, and ingredients sharing a name (case-insensitive), normalized
//! unit and category are merged into one line.
//!
//! ## Ordering
//!
//! The result is sorted by category rank (produce, meat, dairy, pantry,
//! spices) and then by display name. [`group_by_category`] keeps that order
//! inside each category bucket.
//!
//! ## Usage
//!
//! ```rust
//! use recipe_cart::ingredient_aggregator::aggregate_ingredients;
//! use recipe_cart::recipe_model::{Ingredient, IngredientCategory, Recipe, RecipeSelection, Unit};
//!
//! let recipes = vec![Recipe::new("pasta", "Pasta", 4)
//!     .with_ingredient(Ingredient::new("1", "Pasta", 400.0, Unit::Grams, IngredientCategory::Pantry))];
//!
//! let items = aggregate_ingredients(&recipes, &[RecipeSelection::new("pasta", 8)])?;
//! assert_eq!(items[0].total_quantity, 800.0);
//! # Ok::<(), recipe_cart::quantity_scaler::ScaleError>(())
//! ```

use log::{debug, info, trace};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::quantity_scaler::{round2, scale_quantity, ScaleError};
use crate::recipe_model::{
    Ingredient, IngredientCategory, Recipe, RecipeSelection, ShoppingListItem, Unit,
};
use crate::unit_normalizer::{normalize, normalized_unit};

/// Shopping list lines bucketed by category, iterated in category rank order
pub type CategoryGroups = BTreeMap<IngredientCategory, Vec<ShoppingListItem>>;

/// Identity of a shopping list line: lowercased name, normalized unit, category
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AggregationKey {
    pub name: String,
    pub unit: Unit,
    pub category: IngredientCategory,
}

impl AggregationKey {
    /// Key an ingredient line will be merged under
    pub fn for_ingredient(ingredient: &Ingredient) -> Self {
        Self {
            name: ingredient.name.to_lowercase(),
            unit: normalized_unit(ingredient.unit),
            category: ingredient.category,
        }
    }
}

impl fmt::Display for AggregationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}|{}", self.name, self.unit, self.category)
    }
}

/// Running total for one aggregation key
struct Bucket {
    key: AggregationKey,
    display_name: String,
    total_quantity: f64,
    source_recipes: Vec<String>,
}

/// Merge the ingredients of every selected recipe into a sorted shopping list
///
/// Selections naming a recipe that is not in `recipes` are skipped. Each
/// returned item has a fresh sequential id and `is_checked == false`; the
/// caller overlays checked state.
///
/// # Errors
///
/// Propagates [`ScaleError`] when a recipe carries a non-positive default
/// serving count.
pub fn aggregate_ingredients(
    recipes: &[Recipe],
    selections: &[RecipeSelection],
) -> Result<Vec<ShoppingListItem>, ScaleError> {
    let mut buckets: Vec<Bucket> = Vec::new();
    let mut index: HashMap<AggregationKey, usize> = HashMap::new();

    for selection in selections {
        let Some(recipe) = recipes.iter().find(|r| r.id == selection.recipe_id) else {
            debug!("Skipping selection for unknown recipe '{}'", selection.recipe_id);
            continue;
        };

        trace!(
            "Aggregating recipe '{}' at {} servings (default {})",
            recipe.id,
            selection.servings,
            recipe.default_servings
        );

        for ingredient in &recipe.ingredients {
            let scaled = scale_quantity(
                ingredient.quantity,
                i64::from(recipe.default_servings),
                i64::from(selection.servings),
            )?;
            let (quantity, unit) = normalize(scaled, ingredient.unit);
            let key = AggregationKey::for_ingredient(ingredient);

            trace!(
                "  {} {} {} -> {} {} under '{}'",
                ingredient.quantity,
                ingredient.unit,
                ingredient.name,
                quantity,
                unit,
                key
            );

            match index.get(&key) {
                Some(&position) => {
                    let bucket = &mut buckets[position];
                    bucket.total_quantity += quantity;
                    if !bucket.source_recipes.contains(&recipe.id) {
                        bucket.source_recipes.push(recipe.id.clone());
                    }
                }
                None => {
                    index.insert(key.clone(), buckets.len());
                    buckets.push(Bucket {
                        key,
                        display_name: ingredient.name.clone(),
                        total_quantity: quantity,
                        source_recipes: vec![recipe.id.clone()],
                    });
                }
            }
        }
    }

    let mut items: Vec<ShoppingListItem> = buckets
        .into_iter()
        .enumerate()
        .map(|(position, bucket)| ShoppingListItem {
            id: format!("item-{}", position + 1),
            key: bucket.key.to_string(),
            ingredient_name: bucket.display_name,
            total_quantity: round2(bucket.total_quantity),
            unit: bucket.key.unit,
            category: bucket.key.category,
            is_checked: false,
            source_recipes: bucket.source_recipes,
        })
        .collect();

    items.sort_by(|a, b| {
        a.category
            .cmp(&b.category)
            .then_with(|| a.ingredient_name.cmp(&b.ingredient_name))
    });

    info!(
        "Aggregated {} selections into {} shopping list items",
        selections.len(),
        items.len()
    );
    Ok(items)
}

/// Partition a sorted shopping list into per-category buckets
///
/// Items keep their relative order; categories without items are absent.
pub fn group_by_category(items: &[ShoppingListItem]) -> CategoryGroups {
    let mut groups = CategoryGroups::new();
    for item in items {
        groups.entry(item.category).or_default().push(item.clone());
    }
    groups
}
