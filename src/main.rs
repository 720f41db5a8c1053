use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use std::path::PathBuf;

use recipe_cart::catalog::RecipeCatalog;
use recipe_cart::config::AppConfig;
use recipe_cart::instruction_highlight::{scale_factor, scaled_amount, IngredientHighlighter};
use recipe_cart::localization::{init_localization, LocalizationManager};
use recipe_cart::planner::Planner;
use recipe_cart::recipe_filters::{
    classify_dish_type, classify_protein_type, DishType, ProteinType, TypeFilter,
};
use recipe_cart::recipe_model::Recipe;
use recipe_cart::storage::SqliteStore;

#[derive(Parser)]
#[command(name = "recipe-cart")]
#[command(about = "Plan meals and build a merged shopping list")]
#[command(after_help = "Environment:
  RECIPE_CART_CATALOG   Recipe catalog JSON file
  RECIPE_CART_DB        SQLite file for saved state
  RECIPE_CART_LANG      Output language (en, fr)
  RECIPE_CART_IMAGE_BASE  Prefix for image paths
  RUST_LOG              Log verbosity")]
struct Cli {
    /// Recipe catalog JSON file (overrides RECIPE_CART_CATALOG)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,
    /// SQLite file for saved state (overrides RECIPE_CART_DB)
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    /// Output language (overrides RECIPE_CART_LANG)
    #[arg(long, global = true)]
    lang: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalog recipes, optionally filtered
    Recipes {
        #[arg(long, default_value = "all")]
        dish: TypeFilter<DishType>,
        #[arg(long, default_value = "all")]
        protein: TypeFilter<ProteinType>,
    },
    /// Add a recipe at its default serving count
    Select { recipe_id: String },
    /// Remove a recipe
    Deselect { recipe_id: String },
    /// Change the serving count of a selected recipe
    Servings { recipe_id: String, servings: u32 },
    /// Show the shopping list
    List {
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Check or uncheck a shopping list line by key
    Toggle { key: String },
    /// Uncheck every line
    ClearChecked,
    /// Remove all recipes and checkmarks
    Clear,
    /// Show a recipe with quantities for its serving count
    Cook {
        recipe_id: String,
        #[arg(long)]
        servings: Option<u32>,
        /// Also print recipe and ingredient image paths
        #[arg(long, default_value_t = false)]
        images: bool,
    },
}

/// Localized terminal output
struct Output<'a> {
    l10n: &'a LocalizationManager,
    lang: &'a str,
}

impl Output<'_> {
    fn text(&self, key: &str) -> String {
        self.l10n.get_message_in_language(key, self.lang, None)
    }

    fn text_with(&self, key: &str, args: &[(&str, &str)]) -> String {
        self.l10n.get_message_with_args(key, self.lang, args)
    }

    fn say(&self, key: &str) {
        println!("{}", self.text(key));
    }

    fn say_with(&self, key: &str, args: &[(&str, &str)]) {
        println!("{}", self.text_with(key, args));
    }
}

fn main() -> Result<()> {
    env_logger::init();
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let mut config = AppConfig::from_env();
    if let Some(path) = cli.catalog {
        config = config.with_catalog_path(path);
    }
    if let Some(path) = cli.db {
        config = config.with_database_path(path);
    }
    if let Some(language) = cli.lang.as_deref() {
        config = config.with_language(language);
    }

    let catalog = match &config.catalog_path {
        Some(path) => RecipeCatalog::from_path(path)?,
        None => RecipeCatalog::builtin()?,
    };
    let store = SqliteStore::open(&config.database_path).with_context(|| {
        format!(
            "Failed to open state database {}",
            config.database_path.display()
        )
    })?;
    let out = Output {
        l10n: init_localization()?,
        lang: &config.language,
    };

    info!("Starting recipe-cart with language {}", config.language);
    let mut planner = Planner::load(catalog, store);

    match cli.command {
        Commands::Recipes { dish, protein } => print_recipes(&planner, &out, dish, protein),
        Commands::Select { recipe_id } => {
            let already = planner.selections().is_selected(&recipe_id);
            if !planner.select_recipe(&recipe_id) {
                out.say_with("recipe-not-found", &[("recipe_id", recipe_id.as_str())]);
                return Ok(());
            }
            let name = recipe_name(planner.catalog(), &recipe_id);
            if already {
                out.say_with("recipe-already-selected", &[("recipe_name", name.as_str())]);
            } else {
                let servings = planner
                    .selections()
                    .servings_for(&recipe_id)
                    .unwrap_or_default()
                    .to_string();
                out.say_with(
                    "recipe-selected",
                    &[("recipe_name", name.as_str()), ("servings", servings.as_str())],
                );
            }
        }
        Commands::Deselect { recipe_id } => {
            if planner.deselect_recipe(&recipe_id) {
                let name = recipe_name(planner.catalog(), &recipe_id);
                out.say_with("recipe-deselected", &[("recipe_name", name.as_str())]);
            } else {
                out.say_with("recipe-not-selected", &[("recipe_id", recipe_id.as_str())]);
            }
        }
        Commands::Servings {
            recipe_id,
            servings,
        } => match planner.update_servings(&recipe_id, servings) {
            Some(applied) => {
                let name = recipe_name(planner.catalog(), &recipe_id);
                let applied = applied.to_string();
                out.say_with(
                    "servings-updated",
                    &[("recipe_name", name.as_str()), ("servings", applied.as_str())],
                );
            }
            None => out.say_with("recipe-not-selected", &[("recipe_id", recipe_id.as_str())]),
        },
        Commands::List { json } => print_shopping_list(&planner, &out, json)?,
        Commands::Toggle { key } => {
            let list = planner.shopping_list()?;
            let Some(item) = list.find(&key) else {
                out.say_with("item-not-found", &[("key", key.as_str())]);
                return Ok(());
            };
            let message = if planner.toggle_item(&key) {
                "item-checked"
            } else {
                "item-unchecked"
            };
            out.say_with(message, &[("item", item.ingredient_name.as_str())]);
        }
        Commands::ClearChecked => {
            planner.clear_checked();
            out.say("checked-cleared");
        }
        Commands::Clear => {
            planner.clear_all();
            out.say("selections-cleared");
        }
        Commands::Cook {
            recipe_id,
            servings,
            images,
        } => {
            let Some(recipe) = planner.catalog().get(&recipe_id) else {
                out.say_with("recipe-not-found", &[("recipe_id", recipe_id.as_str())]);
                return Ok(());
            };
            let servings = servings
                .or_else(|| planner.selections().servings_for(&recipe_id))
                .unwrap_or(recipe.default_servings);
            let image_base = images.then_some(config.image_base_url.as_str());
            print_cooking_view(recipe, servings, image_base, &out)?;
        }
    }

    Ok(())
}

fn recipe_name(catalog: &RecipeCatalog, recipe_id: &str) -> String {
    catalog
        .get(recipe_id)
        .map(|r| r.name.clone())
        .unwrap_or_else(|| recipe_id.to_string())
}

fn print_recipes(
    planner: &Planner<SqliteStore>,
    out: &Output,
    dish: TypeFilter<DishType>,
    protein: TypeFilter<ProteinType>,
) {
    let recipes = planner.filtered_recipes(dish, protein);
    out.say("recipes-header");

    if recipes.is_empty() {
        println!("  {}", out.text("recipes-none-match"));
        return;
    }

    for recipe in recipes {
        let marker = if planner.selections().is_selected(&recipe.id) {
            format!(" [{}]", out.text("recipe-selected-marker"))
        } else {
            String::new()
        };
        let servings = recipe.default_servings.to_string();
        println!(
            "  {:<22} {} ({}, {}, {}){}",
            recipe.id,
            recipe.name,
            out.l10n.dish_type_label(classify_dish_type(recipe), out.lang),
            out.l10n.protein_type_label(classify_protein_type(recipe), out.lang),
            out.text_with("recipe-servings", &[("servings", servings.as_str())]),
            marker
        );
    }
}

fn print_shopping_list(planner: &Planner<SqliteStore>, out: &Output, json: bool) -> Result<()> {
    let list = planner.shopping_list()?;

    if json {
        println!("{}", serde_json::to_string_pretty(list.items())?);
        return Ok(());
    }

    if list.is_empty() {
        out.say("shopping-list-empty");
        out.say("shopping-list-empty-hint");
        return Ok(());
    }

    out.say("shopping-list-header");
    let checked = list.checked_count().to_string();
    let total = list.total_items().to_string();
    out.say_with(
        "shopping-list-progress",
        &[("checked", checked.as_str()), ("total", total.as_str())],
    );

    for (category, items) in list.groups() {
        println!();
        println!("{}", out.l10n.category_label(category, out.lang));
        for item in items {
            println!("  {}  ({})", item, item.key);
        }
    }

    Ok(())
}

fn print_cooking_view(
    recipe: &Recipe,
    servings: u32,
    image_base: Option<&str>,
    out: &Output,
) -> Result<()> {
    let factor = scale_factor(recipe, servings);
    let highlighter = IngredientHighlighter::new(recipe, servings)?;

    println!("{}", recipe.name);
    if !recipe.description.is_empty() {
        println!("{}", recipe.description);
    }
    if image_base.is_some() && !recipe.image_url.is_empty() {
        println!("{}", recipe.image_url);
    }
    println!();

    let servings_arg = servings.to_string();
    out.say_with("cook-ingredients-header", &[("servings", servings_arg.as_str())]);
    for ingredient in &recipe.ingredients {
        println!(
            "  {} {}  {}",
            scaled_amount(ingredient, factor),
            ingredient.unit,
            ingredient.name
        );
        if let Some(base) = image_base {
            println!("      {}", ingredient.image_path(base));
        }
    }

    let phases: Vec<(&str, &[String])> = match &recipe.enhanced_instructions {
        Some(enhanced)
            if !(enhanced.preparation.is_empty()
                && enhanced.cooking.is_empty()
                && enhanced.serving.is_empty()) =>
        {
            vec![
                ("cook-preparation", enhanced.preparation.as_slice()),
                ("cook-cooking", enhanced.cooking.as_slice()),
                ("cook-serving", enhanced.serving.as_slice()),
            ]
        }
        _ => vec![("cook-instructions", recipe.instructions.as_slice())],
    };

    for (title, steps) in phases {
        if steps.is_empty() {
            continue;
        }
        println!();
        out.say(title);
        for (index, step) in steps.iter().enumerate() {
            println!("  {}. {}", index + 1, highlighter.render(step));
        }
    }

    if let Some(enhanced) = &recipe.enhanced_instructions {
        if !enhanced.tips.is_empty() {
            println!();
            out.say("cook-tips");
            for tip in &enhanced.tips {
                println!("  - {}", tip);
            }
        }
    }

    info!("Rendered '{}' for {} servings (x{})", recipe.id, servings, factor);
    Ok(())
}
