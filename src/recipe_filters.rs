//! # Recipe Classification and Filtering
//!
//! Keyword-driven tagging of catalog recipes by dish type and main protein,
//! used to narrow the recipe list in the selection view.
//!
//! Both classifiers are data-driven: an ordered table of
//! `(category, keywords)` pairs scanned against the lowercased recipe text.
//!
//! - Dish type: `name + description`, first matching row wins, else `Other`
//! - Protein type: `name + description + ingredient names`, every matching
//!   row is collected and then resolved (see [`classify_protein_type`])

use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::recipe_model::Recipe;

/// Kind of dish a recipe produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DishType {
    Salad,
    Pasta,
    Rice,
    Noodles,
    Soup,
    Tacos,
    Sandwich,
    Bowl,
    Other,
}

/// Main protein of a recipe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProteinType {
    Beef,
    Chicken,
    Pork,
    Lamb,
    Fish,
    Seafood,
    Vegetarian,
    Mixed,
}

/// Dish keywords in priority order
const DISH_TYPE_KEYWORDS: &[(DishType, &[&str])] = &[
    (DishType::Salad, &["salad"]),
    (
        DishType::Pasta,
        &[
            "pasta", "spaghetti", "fettuccine", "linguine", "penne", "rigatoni", "alfredo",
            "bolognese", "parmesan", "mac and cheese", "macaroni",
        ],
    ),
    (DishType::Rice, &["rice", "risotto", "bibimbap", "fried rice"]),
    (DishType::Noodles, &["noodle", "udon", "ramen", "pad thai", "stroganoff"]),
    (DishType::Soup, &["soup", "stew", "chowder", "chili"]),
    (DishType::Tacos, &["taco", "taquito", "quesadilla", "fajita", "burrito"]),
    (DishType::Sandwich, &["sandwich", "wrap", "burger", "shawarma", "kofta", "gyro"]),
    (DishType::Bowl, &["bowl"]),
];

const PROTEIN_KEYWORDS: &[(ProteinType, &[&str])] = &[
    (
        ProteinType::Beef,
        &["beef", "steak", "sirloin", "ribeye", "flank", "ground beef", "bulgogi"],
    ),
    (ProteinType::Chicken, &["chicken"]),
    (ProteinType::Pork, &["pork", "bacon"]),
    (ProteinType::Lamb, &["lamb"]),
    (ProteinType::Fish, &["salmon", "tuna", "fish", "tilapia", "cod"]),
    (ProteinType::Seafood, &["shrimp", "prawn", "scallop", "crab", "lobster"]),
    (
        ProteinType::Vegetarian,
        &[
            "tofu", "tempeh", "vegetable", "vegetarian", "vegan", "bean", "lentil", "chickpea",
            "eggplant",
        ],
    ),
];

/// Protein assumed when no protein keyword matches at all
pub const NO_PROTEIN_MATCH_DEFAULT: ProteinType = ProteinType::Vegetarian;

/// Either every value, or one specific value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeFilter<T> {
    #[default]
    All,
    Only(T),
}

impl<T: PartialEq> TypeFilter<T> {
    /// Check whether a classified value passes the filter
    pub fn matches(&self, value: &T) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Only(expected) => expected == value,
        }
    }
}

impl<T: FromStr> FromStr for TypeFilter<T> {
    type Err = T::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            Ok(TypeFilter::All)
        } else {
            s.parse().map(TypeFilter::Only)
        }
    }
}

impl DishType {
    pub const ALL: [DishType; 9] = [
        DishType::Salad,
        DishType::Pasta,
        DishType::Rice,
        DishType::Noodles,
        DishType::Soup,
        DishType::Tacos,
        DishType::Sandwich,
        DishType::Bowl,
        DishType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DishType::Salad => "salad",
            DishType::Pasta => "pasta",
            DishType::Rice => "rice",
            DishType::Noodles => "noodles",
            DishType::Soup => "soup",
            DishType::Tacos => "tacos",
            DishType::Sandwich => "sandwich",
            DishType::Bowl => "bowl",
            DishType::Other => "other",
        }
    }
}

impl ProteinType {
    pub const ALL: [ProteinType; 8] = [
        ProteinType::Beef,
        ProteinType::Chicken,
        ProteinType::Pork,
        ProteinType::Lamb,
        ProteinType::Fish,
        ProteinType::Seafood,
        ProteinType::Vegetarian,
        ProteinType::Mixed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProteinType::Beef => "beef",
            ProteinType::Chicken => "chicken",
            ProteinType::Pork => "pork",
            ProteinType::Lamb => "lamb",
            ProteinType::Fish => "fish",
            ProteinType::Seafood => "seafood",
            ProteinType::Vegetarian => "vegetarian",
            ProteinType::Mixed => "mixed",
        }
    }

    /// Land-animal meats; fish, seafood and vegetarian do not count
    pub fn is_meat(&self) -> bool {
        matches!(
            self,
            ProteinType::Beef | ProteinType::Chicken | ProteinType::Pork | ProteinType::Lamb
        )
    }
}

impl FromStr for DishType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        DishType::ALL
            .iter()
            .copied()
            .find(|dish| dish.as_str() == lower)
            .ok_or_else(|| format!("unknown dish type: {s}"))
    }
}

impl FromStr for ProteinType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        ProteinType::ALL
            .iter()
            .copied()
            .find(|protein| protein.as_str() == lower)
            .ok_or_else(|| format!("unknown protein type: {s}"))
    }
}

impl fmt::Display for DishType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for ProteinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classify the dish type from the recipe name and description
pub fn classify_dish_type(recipe: &Recipe) -> DishType {
    let search_text = format!("{} {}", recipe.name, recipe.description).to_lowercase();

    DISH_TYPE_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|keyword| search_text.contains(keyword)))
        .map(|(dish, _)| *dish)
        .unwrap_or(DishType::Other)
}

/// Classify the main protein from name, description and ingredient names
///
/// Resolution of the collected matches:
///
/// - none: [`NO_PROTEIN_MATCH_DEFAULT`] (vegetarian)
/// - exactly one: that protein
/// - several, with at most one meat among them: the meat if present,
///   otherwise the first match in table order
/// - several meats: `Mixed`
pub fn classify_protein_type(recipe: &Recipe) -> ProteinType {
    let ingredient_names = recipe
        .ingredients
        .iter()
        .map(|i| i.name.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ");
    let search_text = format!(
        "{} {} {}",
        recipe.name.to_lowercase(),
        recipe.description.to_lowercase(),
        ingredient_names
    );

    let found: Vec<ProteinType> = PROTEIN_KEYWORDS
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|keyword| search_text.contains(keyword)))
        .map(|(protein, _)| *protein)
        .collect();

    debug!("Protein matches for '{}': {:?}", recipe.id, found);

    match found.as_slice() {
        [] => NO_PROTEIN_MATCH_DEFAULT,
        [only] => *only,
        _ => {
            let meats: Vec<ProteinType> = found.iter().copied().filter(|p| p.is_meat()).collect();
            match meats.as_slice() {
                [] => found[0],
                [meat] => *meat,
                _ => ProteinType::Mixed,
            }
        }
    }
}

/// Keep the recipes passing both filters, in catalog order
pub fn filter_recipes<'a>(
    recipes: &'a [Recipe],
    dish_type: TypeFilter<DishType>,
    protein_type: TypeFilter<ProteinType>,
) -> Vec<&'a Recipe> {
    recipes
        .iter()
        .filter(|recipe| {
            dish_type.matches(&classify_dish_type(recipe))
                && protein_type.matches(&classify_protein_type(recipe))
        })
        .collect()
}
