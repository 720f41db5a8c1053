//! # Meal Planner Session
//!
//! [`Planner`] is the stateful core of the application. It owns the recipe
//! catalog, the user's selections and checked items, and the store they are
//! persisted to. Every mutating operation writes the affected value back to
//! the store before returning, so a session can be dropped at any point
//! without losing state.
//!
//! ## Usage
//!
//! ```rust
//! use recipe_cart::catalog::RecipeCatalog;
//! use recipe_cart::planner::Planner;
//! use recipe_cart::storage::MemoryStore;
//!
//! let catalog = RecipeCatalog::builtin()?;
//! let mut planner = Planner::load(catalog, MemoryStore::new());
//!
//! assert!(planner.select_recipe("greek-salad"));
//! planner.update_servings("greek-salad", 4);
//!
//! let list = planner.shopping_list()?;
//! assert!(!list.is_empty());
//! # Ok::<(), anyhow::Error>(())
//! ```

use log::{debug, info};

use crate::catalog::RecipeCatalog;
use crate::config::{MAX_SERVINGS, MIN_SERVINGS};
use crate::quantity_scaler::ScaleError;
use crate::recipe_filters::{filter_recipes, DishType, ProteinType, TypeFilter};
use crate::recipe_model::{Recipe, RecipeSelection};
use crate::selection::RecipeSelections;
use crate::shopping_list::{CheckedItems, ShoppingList};
use crate::storage::{get_from_storage, set_to_storage, KeyValueStore, StorageKeys};

/// Clamp a requested serving count into the supported range
pub fn clamp_servings(servings: u32) -> u32 {
    servings.clamp(MIN_SERVINGS, MAX_SERVINGS)
}

/// Catalog, selections and checked items bound to a store
pub struct Planner<S: KeyValueStore> {
    catalog: RecipeCatalog,
    store: S,
    selections: RecipeSelections,
    checked: CheckedItems,
}

impl<S: KeyValueStore> Planner<S> {
    /// Restore the session state held in `store`
    ///
    /// Missing or unreadable values start out empty.
    pub fn load(catalog: RecipeCatalog, store: S) -> Self {
        let stored: Vec<RecipeSelection> =
            get_from_storage(&store, StorageKeys::RECIPE_SELECTIONS, Vec::new());
        let selections = RecipeSelections::from_stored(stored);
        let checked: CheckedItems =
            get_from_storage(&store, StorageKeys::CHECKED_ITEMS, CheckedItems::new());

        info!(
            "Planner loaded: {} recipes in catalog, {} selected, {} checked",
            catalog.len(),
            selections.len(),
            checked.len()
        );

        Self {
            catalog,
            store,
            selections,
            checked,
        }
    }

    pub fn catalog(&self) -> &RecipeCatalog {
        &self.catalog
    }

    pub fn selections(&self) -> &RecipeSelections {
        &self.selections
    }

    pub fn checked(&self) -> &CheckedItems {
        &self.checked
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Select a catalog recipe at its default serving count
    ///
    /// Returns `false` for ids not in the catalog. Selecting an already
    /// selected recipe keeps its current serving count.
    pub fn select_recipe(&mut self, recipe_id: &str) -> bool {
        let Some(recipe) = self.catalog.get(recipe_id) else {
            debug!("Ignoring selection of unknown recipe '{}'", recipe_id);
            return false;
        };
        if self.selections.select(recipe) {
            self.save_selections();
        }
        true
    }

    /// Remove a recipe from the plan
    pub fn deselect_recipe(&mut self, recipe_id: &str) -> bool {
        let removed = self.selections.deselect(recipe_id);
        if removed {
            self.save_selections();
        }
        removed
    }

    /// Set the serving count of a selected recipe, clamped to the allowed range
    ///
    /// Returns the applied serving count, or `None` if the recipe is not selected.
    pub fn update_servings(&mut self, recipe_id: &str, servings: u32) -> Option<u32> {
        let applied = clamp_servings(servings);
        if applied != servings {
            debug!("Clamped servings {} to {}", servings, applied);
        }
        if self.selections.update_servings(recipe_id, applied) {
            self.save_selections();
            Some(applied)
        } else {
            None
        }
    }

    /// Flip the checked state of a shopping list line, returning the new state
    pub fn toggle_item(&mut self, key: &str) -> bool {
        let checked = self.checked.toggle(key);
        self.save_checked();
        checked
    }

    /// Untick every line but keep the selections
    pub fn clear_checked(&mut self) {
        self.checked.clear();
        self.save_checked();
        info!("Cleared checked items");
    }

    /// Drop all selections and checked items
    pub fn clear_all(&mut self) {
        self.selections.clear();
        self.checked.clear();
        self.save_selections();
        self.save_checked();
        info!("Cleared all selections and checked items");
    }

    /// Compute the shopping list for the current selections
    pub fn shopping_list(&self) -> Result<ShoppingList, ScaleError> {
        ShoppingList::build(&self.catalog, &self.selections, &self.checked)
    }

    /// Catalog recipes matching the dish and protein filters
    pub fn filtered_recipes(
        &self,
        dish_type: TypeFilter<DishType>,
        protein_type: TypeFilter<ProteinType>,
    ) -> Vec<&Recipe> {
        filter_recipes(self.catalog.recipes(), dish_type, protein_type)
    }

    /// Selected recipes with their serving counts, in selection order
    pub fn selected_recipes(&self) -> Vec<(&Recipe, u32)> {
        self.selections
            .as_slice()
            .iter()
            .filter_map(|s| self.catalog.get(&s.recipe_id).map(|r| (r, s.servings)))
            .collect()
    }

    fn save_selections(&self) {
        set_to_storage(
            &self.store,
            StorageKeys::RECIPE_SELECTIONS,
            self.selections.as_slice(),
        );
    }

    fn save_checked(&self) {
        set_to_storage(&self.store, StorageKeys::CHECKED_ITEMS, &self.checked);
    }
}
