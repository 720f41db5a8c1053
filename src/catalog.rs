//! # Recipe Catalog
//!
//! The immutable set of recipes the user can choose from. The catalog is
//! loaded once from JSON, validated, and then passed by reference to every
//! computation that needs it.

use anyhow::{bail, Context, Result};
use log::info;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::recipe_model::Recipe;

/// Catalog shipped with the binary
const BUILTIN_CATALOG: &str = include_str!("../data/recipes.json");

/// Read-only collection of recipes, queried by id
#[derive(Debug, Clone, Default)]
pub struct RecipeCatalog {
    recipes: Vec<Recipe>,
}

impl RecipeCatalog {
    /// Build a catalog from already constructed recipes
    pub fn new(recipes: Vec<Recipe>) -> Result<Self> {
        validate_recipes(&recipes)?;
        Ok(Self { recipes })
    }

    /// Parse a JSON array of recipes
    pub fn from_json_str(json: &str) -> Result<Self> {
        let recipes: Vec<Recipe> =
            serde_json::from_str(json).context("Failed to parse recipe catalog JSON")?;
        Self::new(recipes)
    }

    /// Load a catalog file
    pub fn from_path(path: &Path) -> Result<Self> {
        info!("Loading recipe catalog from: {}", path.display());
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read recipe catalog {}", path.display()))?;
        let catalog = Self::from_json_str(&json)?;
        info!("Loaded {} recipes", catalog.len());
        Ok(catalog)
    }

    /// The catalog bundled with the crate
    pub fn builtin() -> Result<Self> {
        Self::from_json_str(BUILTIN_CATALOG).context("Built-in recipe catalog is invalid")
    }

    /// Look up a recipe by id
    pub fn get(&self, recipe_id: &str) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.id == recipe_id)
    }

    /// All recipes in catalog order
    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}

/// Reject catalogs that would make scaling fail later
fn validate_recipes(recipes: &[Recipe]) -> Result<()> {
    let mut seen = HashSet::new();

    for recipe in recipes {
        if !seen.insert(recipe.id.as_str()) {
            bail!("Duplicate recipe id '{}'", recipe.id);
        }
        if recipe.default_servings == 0 {
            bail!("Recipe '{}' has defaultServings of 0", recipe.id);
        }
        for ingredient in &recipe.ingredients {
            if !(ingredient.quantity > 0.0 && ingredient.quantity.is_finite()) {
                bail!(
                    "Ingredient '{}' of recipe '{}' has invalid quantity {}",
                    ingredient.name,
                    recipe.id,
                    ingredient.quantity
                );
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe_model::{Ingredient, IngredientCategory, Unit};
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_builtin_catalog_loads() -> Result<()> {
        let catalog = RecipeCatalog::builtin()?;
        assert!(!catalog.is_empty());
        assert!(catalog.get("spaghetti-bolognese").is_some());
        assert!(catalog.get("does-not-exist").is_none());
        Ok(())
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let recipes = vec![Recipe::new("a", "A", 2), Recipe::new("a", "Again", 2)];
        let err = RecipeCatalog::new(recipes).unwrap_err();
        assert!(err.to_string().contains("Duplicate recipe id"));
    }

    #[test]
    fn test_rejects_zero_servings() {
        let err = RecipeCatalog::new(vec![Recipe::new("a", "A", 0)]).unwrap_err();
        assert!(err.to_string().contains("defaultServings"));
    }

    #[test]
    fn test_rejects_non_positive_quantity() {
        let recipe = Recipe::new("a", "A", 2).with_ingredient(Ingredient::new(
            "1",
            "Salt",
            0.0,
            Unit::Grams,
            IngredientCategory::Spices,
        ));
        assert!(RecipeCatalog::new(vec![recipe]).is_err());
    }

    #[test]
    fn test_rejects_unknown_unit() {
        let json = r#"[{
            "id": "a", "name": "A", "defaultServings": 2,
            "ingredients": [{ "id": "1", "name": "Salt", "quantity": 1, "unit": "pinch", "category": "spices" }]
        }]"#;
        assert!(RecipeCatalog::from_json_str(json).is_err());
    }

    #[test]
    fn test_from_path() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        write!(
            file,
            r#"[{{"id": "toast", "name": "Toast", "defaultServings": 1, "ingredients": []}}]"#
        )?;

        let catalog = RecipeCatalog::from_path(file.path())?;
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.recipes()[0].name, "Toast");
        Ok(())
    }

    #[test]
    fn test_missing_file() {
        let err = RecipeCatalog::from_path(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read recipe catalog"));
    }
}
