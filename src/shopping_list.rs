//! # Shopping List View
//!
//! The shopping list is never stored: it is recomputed from the catalog and
//! the current selections whenever it is needed. Only the set of checked
//! items persists, keyed by each line's aggregation key
//! (`name|unit|category`) so that a checkmark survives recomputation as long
//! as the line still exists.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::catalog::RecipeCatalog;
use crate::ingredient_aggregator::{aggregate_ingredients, group_by_category, CategoryGroups};
use crate::quantity_scaler::ScaleError;
use crate::recipe_model::ShoppingListItem;
use crate::selection::RecipeSelections;

/// Aggregation keys of the lines the user ticked off
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CheckedItems {
    keys: BTreeSet<String>,
}

impl CheckedItems {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the checked state of a line, returning the new state
    pub fn toggle(&mut self, key: &str) -> bool {
        if self.keys.remove(key) {
            false
        } else {
            self.keys.insert(key.to_string());
            true
        }
    }

    pub fn is_checked(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// A computed shopping list with checked state applied
#[derive(Debug, Clone, PartialEq)]
pub struct ShoppingList {
    items: Vec<ShoppingListItem>,
}

impl ShoppingList {
    /// Aggregate the selected recipes and overlay the checked set
    pub fn build(
        catalog: &RecipeCatalog,
        selections: &RecipeSelections,
        checked: &CheckedItems,
    ) -> Result<Self, ScaleError> {
        let mut items = aggregate_ingredients(catalog.recipes(), selections.as_slice())?;
        for item in &mut items {
            item.is_checked = checked.is_checked(&item.key);
        }
        Ok(Self { items })
    }

    /// Lines sorted by category rank, then name
    pub fn items(&self) -> &[ShoppingListItem] {
        &self.items
    }

    pub fn groups(&self) -> CategoryGroups {
        group_by_category(&self.items)
    }

    pub fn find(&self, key: &str) -> Option<&ShoppingListItem> {
        self.items.iter().find(|item| item.key == key)
    }

    pub fn total_items(&self) -> usize {
        self.items.len()
    }

    /// Checked lines that are actually on the list
    pub fn checked_count(&self) -> usize {
        self.items.iter().filter(|item| item.is_checked).count()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe_model::{Ingredient, IngredientCategory, Recipe, Unit};

    fn catalog() -> RecipeCatalog {
        RecipeCatalog::new(vec![Recipe::new("soup", "Soup", 2)
            .with_ingredient(Ingredient::new("1", "Carrot", 2.0, Unit::Pieces, IngredientCategory::Produce))
            .with_ingredient(Ingredient::new("2", "Salt", 1.0, Unit::Teaspoons, IngredientCategory::Spices))])
        .unwrap()
    }

    fn soup_selected() -> RecipeSelections {
        let catalog = catalog();
        let mut selections = RecipeSelections::new();
        selections.select(catalog.get("soup").unwrap());
        selections
    }

    #[test]
    fn test_toggle() {
        let mut checked = CheckedItems::new();
        assert!(checked.toggle("carrot|piece|produce"));
        assert!(checked.is_checked("carrot|piece|produce"));
        assert!(!checked.toggle("carrot|piece|produce"));
        assert!(checked.is_empty());
    }

    #[test]
    fn test_checked_items_serialize_as_array() {
        let mut checked = CheckedItems::new();
        checked.toggle("b");
        checked.toggle("a");
        assert_eq!(serde_json::to_string(&checked).unwrap(), r#"["a","b"]"#);
    }

    #[test]
    fn test_build_overlays_checked_state() {
        let mut checked = CheckedItems::new();
        checked.toggle("carrot|piece|produce");

        let list = ShoppingList::build(&catalog(), &soup_selected(), &checked).unwrap();
        assert_eq!(list.total_items(), 2);
        assert_eq!(list.checked_count(), 1);
        assert!(list.find("carrot|piece|produce").unwrap().is_checked);
        assert!(!list.find("salt|ml|spices").unwrap().is_checked);
    }

    #[test]
    fn test_stale_checked_keys_do_not_count() {
        let mut checked = CheckedItems::new();
        checked.toggle("beef|g|meat");

        let list = ShoppingList::build(&catalog(), &soup_selected(), &checked).unwrap();
        assert_eq!(list.checked_count(), 0);
    }

    #[test]
    fn test_groups_follow_category_rank() {
        let list =
            ShoppingList::build(&catalog(), &soup_selected(), &CheckedItems::new()).unwrap();
        let categories: Vec<IngredientCategory> = list.groups().keys().copied().collect();
        assert_eq!(
            categories,
            vec![IngredientCategory::Produce, IngredientCategory::Spices]
        );
    }

    #[test]
    fn test_empty_selection_gives_empty_list() {
        let list = ShoppingList::build(&catalog(), &RecipeSelections::new(), &CheckedItems::new())
            .unwrap();
        assert!(list.is_empty());
        assert_eq!(list.checked_count(), 0);
    }
}
