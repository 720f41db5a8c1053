//! # Instruction Highlighting
//!
//! Support for the cooking view: every mention of an ingredient inside an
//! instruction step is annotated with the quantity needed at the chosen
//! serving count.
//!
//! Matching is whole-word and case-insensitive. Longer ingredient names are
//! matched first so that "Olive Oil" wins over "Oil", and a mention never
//! overlaps another.
//!
//! ```rust
//! use recipe_cart::instruction_highlight::render_instruction;
//! use recipe_cart::recipe_model::{Ingredient, IngredientCategory, Recipe, Unit};
//!
//! let recipe = Recipe::new("toast", "Toast", 2)
//!     .with_ingredient(Ingredient::new("1", "Butter", 1.0, Unit::Tablespoons, IngredientCategory::Dairy));
//!
//! let text = render_instruction("Spread the butter.", &recipe, 3)?;
//! assert_eq!(text, "Spread the butter (1½ tbsp).");
//! # Ok::<(), regex::Error>(())
//! ```

use regex::{Regex, RegexBuilder};
use std::fmt;

use crate::quantity_format::format_fraction;
use crate::recipe_model::{Ingredient, Recipe, Unit};

/// A piece of an instruction step
#[derive(Debug, Clone, PartialEq)]
pub enum InstructionSegment {
    /// Text with no ingredient mention
    Text(String),
    /// An ingredient mention as written in the step, with its scaled amount
    Mention {
        text: String,
        ingredient_id: String,
        quantity: String,
        unit: Unit,
    },
}

impl fmt::Display for InstructionSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstructionSegment::Text(text) => write!(f, "{text}"),
            InstructionSegment::Mention {
                text,
                quantity,
                unit,
                ..
            } => write!(f, "{text} ({quantity} {unit})"),
        }
    }
}

/// Multiplier from the recipe's default servings to `servings`
///
/// Recipes with a zero default serving count are left unscaled.
pub fn scale_factor(recipe: &Recipe, servings: u32) -> f64 {
    if recipe.default_servings == 0 {
        return 1.0;
    }
    f64::from(servings) / f64::from(recipe.default_servings)
}

/// Scaled amount of an ingredient, formatted for reading while cooking
pub fn scaled_amount(ingredient: &Ingredient, factor: f64) -> String {
    format_fraction(ingredient.quantity * factor)
}

struct Mention<'a> {
    start: usize,
    end: usize,
    ingredient: &'a Ingredient,
}

/// Ingredient patterns of one recipe, compiled once and reused for every step
pub struct IngredientHighlighter<'a> {
    /// Longest names first
    patterns: Vec<(Regex, &'a Ingredient)>,
    factor: f64,
}

impl<'a> IngredientHighlighter<'a> {
    /// Compile whole-word, case-insensitive patterns for every ingredient
    pub fn new(recipe: &'a Recipe, servings: u32) -> Result<Self, regex::Error> {
        let mut by_length: Vec<&Ingredient> = recipe.ingredients.iter().collect();
        by_length.sort_by(|a, b| b.name.len().cmp(&a.name.len()));

        let patterns = by_length
            .into_iter()
            .map(|ingredient| {
                let pattern = format!(r"\b{}\b", regex::escape(&ingredient.name));
                let regex = RegexBuilder::new(&pattern).case_insensitive(true).build()?;
                Ok((regex, ingredient))
            })
            .collect::<Result<Vec<_>, regex::Error>>()?;

        Ok(Self {
            patterns,
            factor: scale_factor(recipe, servings),
        })
    }

    /// Split an instruction step into plain text and ingredient mentions
    pub fn highlight(&self, text: &str) -> Vec<InstructionSegment> {
        let mut mentions: Vec<Mention> = Vec::new();
        for (regex, ingredient) in &self.patterns {
            for found in regex.find_iter(text) {
                let overlaps = mentions
                    .iter()
                    .any(|m| found.start() < m.end && found.end() > m.start);
                if !overlaps {
                    mentions.push(Mention {
                        start: found.start(),
                        end: found.end(),
                        ingredient,
                    });
                }
            }
        }
        mentions.sort_by_key(|m| m.start);

        let mut segments = Vec::with_capacity(mentions.len() * 2 + 1);
        let mut last = 0;
        for mention in mentions {
            if mention.start > last {
                segments.push(InstructionSegment::Text(text[last..mention.start].to_string()));
            }
            segments.push(InstructionSegment::Mention {
                text: text[mention.start..mention.end].to_string(),
                ingredient_id: mention.ingredient.id.clone(),
                quantity: scaled_amount(mention.ingredient, self.factor),
                unit: mention.ingredient.unit,
            });
            last = mention.end;
        }
        if last < text.len() {
            segments.push(InstructionSegment::Text(text[last..].to_string()));
        }

        segments
    }

    /// Instruction step as plain text, each mention followed by `(<qty> <unit>)`
    pub fn render(&self, text: &str) -> String {
        self.highlight(text).iter().map(ToString::to_string).collect()
    }
}

/// Split a single instruction step; prefer [`IngredientHighlighter`] for several steps
pub fn highlight_ingredients(
    text: &str,
    recipe: &Recipe,
    servings: u32,
) -> Result<Vec<InstructionSegment>, regex::Error> {
    Ok(IngredientHighlighter::new(recipe, servings)?.highlight(text))
}

/// Render a single instruction step as annotated plain text
pub fn render_instruction(text: &str, recipe: &Recipe, servings: u32) -> Result<String, regex::Error> {
    Ok(IngredientHighlighter::new(recipe, servings)?.render(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe_model::IngredientCategory;

    fn recipe() -> Recipe {
        Recipe::new("pasta", "Pasta", 4)
            .with_ingredient(Ingredient::new("1", "Oil", 2.0, Unit::Tablespoons, IngredientCategory::Pantry))
            .with_ingredient(Ingredient::new("2", "Olive Oil", 4.0, Unit::Tablespoons, IngredientCategory::Pantry))
            .with_ingredient(Ingredient::new("3", "Garlic", 2.0, Unit::Pieces, IngredientCategory::Produce))
    }

    #[test]
    fn test_plain_text_untouched() {
        let segments = highlight_ingredients("Boil water.", &recipe(), 4).unwrap();
        assert_eq!(segments, vec![InstructionSegment::Text("Boil water.".to_string())]);
    }

    #[test]
    fn test_empty_text() {
        assert!(highlight_ingredients("", &recipe(), 4).unwrap().is_empty());
    }

    #[test]
    fn test_longest_name_wins() {
        let text = render_instruction("Heat the olive oil.", &recipe(), 4).unwrap();
        assert_eq!(text, "Heat the olive oil (4 tbsp).");
    }

    #[test]
    fn test_case_insensitive_and_scaled() {
        let text = render_instruction("GARLIC, then more garlic", &recipe(), 2).unwrap();
        assert_eq!(text, "GARLIC (1 piece), then more garlic (1 piece)");
    }

    #[test]
    fn test_whole_words_only() {
        let text = render_instruction("Use an oiled pan.", &recipe(), 4).unwrap();
        assert_eq!(text, "Use an oiled pan.");
    }

    #[test]
    fn test_fraction_amounts() {
        let segments = highlight_ingredients("Add oil", &recipe(), 1).unwrap();
        assert_eq!(
            segments[1],
            InstructionSegment::Mention {
                text: "oil".to_string(),
                ingredient_id: "1".to_string(),
                quantity: "½".to_string(),
                unit: Unit::Tablespoons,
            }
        );
    }

    #[test]
    fn test_special_characters_in_name() {
        let recipe = Recipe::new("r", "R", 1)
            .with_ingredient(Ingredient::new("1", "Salt + Pepper", 1.0, Unit::Teaspoons, IngredientCategory::Spices));
        let text = render_instruction("Season with salt + pepper to taste", &recipe, 1).unwrap();
        assert_eq!(text, "Season with salt + pepper (1 tsp) to taste");
    }

    #[test]
    fn test_highlighter_reused_across_steps() {
        let recipe = recipe();
        let highlighter = IngredientHighlighter::new(&recipe, 8).unwrap();

        assert_eq!(highlighter.render("Crush the garlic."), "Crush the garlic (4 piece).");
        assert_eq!(highlighter.render("Warm the olive oil."), "Warm the olive oil (8 tbsp).");
        assert_eq!(
            highlighter.highlight("Add oil"),
            highlight_ingredients("Add oil", &recipe, 8).unwrap()
        );
    }
}
