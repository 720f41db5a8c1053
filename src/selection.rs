//! # Recipe Selections
//!
//! The ordered list of recipes the user picked, each with its own serving
//! count. A recipe appears at most once; the order is the order of selection.

use log::{debug, info};
use std::collections::HashSet;

use crate::recipe_model::{Recipe, RecipeSelection};

/// User's chosen recipes with their serving counts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeSelections {
    selections: Vec<RecipeSelection>,
}

impl RecipeSelections {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from persisted selections, keeping the first entry per recipe
    pub fn from_stored(stored: Vec<RecipeSelection>) -> Self {
        let mut seen = HashSet::new();
        let total = stored.len();
        let selections: Vec<RecipeSelection> = stored
            .into_iter()
            .filter(|selection| seen.insert(selection.recipe_id.clone()))
            .collect();

        if selections.len() != total {
            debug!(
                "Dropped {} duplicate stored selections",
                total - selections.len()
            );
        }
        Self { selections }
    }

    /// Select a recipe at its default serving count
    ///
    /// Returns `false` when the recipe was already selected; its serving
    /// count is left untouched in that case.
    pub fn select(&mut self, recipe: &Recipe) -> bool {
        if self.is_selected(&recipe.id) {
            return false;
        }
        info!(
            "Selected recipe '{}' for {} servings",
            recipe.id, recipe.default_servings
        );
        self.selections
            .push(RecipeSelection::new(&recipe.id, recipe.default_servings));
        true
    }

    /// Remove a recipe; returns whether anything was removed
    pub fn deselect(&mut self, recipe_id: &str) -> bool {
        let before = self.selections.len();
        self.selections.retain(|s| s.recipe_id != recipe_id);
        let removed = self.selections.len() != before;
        if removed {
            info!("Deselected recipe '{}'", recipe_id);
        }
        removed
    }

    /// Change the serving count of a selected recipe
    ///
    /// Unknown ids are ignored and `false` is returned.
    pub fn update_servings(&mut self, recipe_id: &str, servings: u32) -> bool {
        match self.selections.iter_mut().find(|s| s.recipe_id == recipe_id) {
            Some(selection) => {
                debug!(
                    "Servings for '{}': {} -> {}",
                    recipe_id, selection.servings, servings
                );
                selection.servings = servings;
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.selections.clear();
    }

    pub fn is_selected(&self, recipe_id: &str) -> bool {
        self.selections.iter().any(|s| s.recipe_id == recipe_id)
    }

    pub fn servings_for(&self, recipe_id: &str) -> Option<u32> {
        self.selections
            .iter()
            .find(|s| s.recipe_id == recipe_id)
            .map(|s| s.servings)
    }

    pub fn as_slice(&self) -> &[RecipeSelection] {
        &self.selections
    }

    pub fn len(&self) -> usize {
        self.selections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }
}
