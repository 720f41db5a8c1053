//! # Localization
//!
//! Fluent-backed labels and messages. English and French resources are
//! compiled into the crate; unknown languages fall back to English.

use anyhow::{anyhow, Result};
use fluent_bundle::concurrent::FluentBundle;
use fluent_bundle::{FluentArgs, FluentResource};
use log::{debug, warn};
use std::collections::HashMap;
use std::sync::OnceLock;
use unic_langid::LanguageIdentifier;

use crate::recipe_filters::{DishType, ProteinType};
use crate::recipe_model::IngredientCategory;

/// Language used when the requested one is not available
pub const DEFAULT_LANGUAGE: &str = "en";

const RESOURCES: [(&str, &str); 2] = [
    ("en", include_str!("../locales/en/main.ftl")),
    ("fr", include_str!("../locales/fr/main.ftl")),
];

/// Localization manager holding one bundle per supported language
pub struct LocalizationManager {
    bundles: HashMap<String, FluentBundle<FluentResource>>,
}

impl LocalizationManager {
    /// Create a manager with every bundled language loaded
    pub fn new() -> Result<Self> {
        let mut bundles = HashMap::new();

        for (language, source) in RESOURCES {
            let locale: LanguageIdentifier = language
                .parse()
                .map_err(|e| anyhow!("Invalid language identifier '{}': {:?}", language, e))?;
            bundles.insert(language.to_string(), Self::create_bundle(locale, source)?);
        }

        Ok(Self { bundles })
    }

    /// Create a fluent bundle for a specific locale
    fn create_bundle(
        locale: LanguageIdentifier,
        source: &str,
    ) -> Result<FluentBundle<FluentResource>> {
        let mut bundle = FluentBundle::new_concurrent(vec![locale.clone()]);
        bundle.set_use_isolating(false);

        let resource = FluentResource::try_new(source.to_string())
            .map_err(|(_, errors)| anyhow!("Failed to parse {} resource: {:?}", locale, errors))?;
        bundle
            .add_resource(resource)
            .map_err(|errors| anyhow!("Failed to add {} resource: {:?}", locale, errors))?;

        debug!("Loaded localization bundle for {}", locale);
        Ok(bundle)
    }

    pub fn is_language_supported(&self, language: &str) -> bool {
        self.bundles.contains_key(language)
    }

    /// Get a message in a language, falling back to English
    pub fn get_message_in_language(
        &self,
        key: &str,
        language: &str,
        args: Option<&HashMap<&str, &str>>,
    ) -> String {
        let Some(bundle) = self
            .bundles
            .get(language)
            .or_else(|| self.bundles.get(DEFAULT_LANGUAGE))
        else {
            return format!("Missing translation: {}", key);
        };

        let Some(pattern) = bundle.get_message(key).and_then(|msg| msg.value()) else {
            return format!("Missing translation: {}", key);
        };

        let fluent_args = args.map(|args| {
            let mut fluent_args = FluentArgs::new();
            for (name, value) in args {
                fluent_args.set(*name, *value);
            }
            fluent_args
        });

        let mut errors = vec![];
        let value = bundle.format_pattern(pattern, fluent_args.as_ref(), &mut errors);
        if !errors.is_empty() {
            warn!("Errors formatting '{}' in {}: {:?}", key, language, errors);
        }
        value.into_owned()
    }

    /// Get a message with simple string arguments
    pub fn get_message_with_args(&self, key: &str, language: &str, args: &[(&str, &str)]) -> String {
        let args_map: HashMap<&str, &str> = args.iter().cloned().collect();
        self.get_message_in_language(key, language, Some(&args_map))
    }

    pub fn category_label(&self, category: IngredientCategory, language: &str) -> String {
        self.get_message_in_language(&format!("category-{}", category.as_str()), language, None)
    }

    pub fn dish_type_label(&self, dish_type: DishType, language: &str) -> String {
        self.get_message_in_language(&format!("dish-{}", dish_type.as_str()), language, None)
    }

    pub fn protein_type_label(&self, protein_type: ProteinType, language: &str) -> String {
        self.get_message_in_language(&format!("protein-{}", protein_type.as_str()), language, None)
    }
}

/// Map a locale tag such as `fr-CA` or `en_US.UTF-8` to a supported language
pub fn detect_language(locale: Option<&str>) -> &'static str {
    let primary = locale
        .and_then(|tag| tag.split(['-', '_', '.']).next())
        .map(str::to_lowercase);

    RESOURCES
        .iter()
        .map(|(language, _)| *language)
        .find(|language| primary.as_deref() == Some(*language))
        .unwrap_or(DEFAULT_LANGUAGE)
}

static LOCALIZATION_MANAGER: OnceLock<LocalizationManager> = OnceLock::new();

/// Initialize the global localization manager, returning it
pub fn init_localization() -> Result<&'static LocalizationManager> {
    if let Some(manager) = LOCALIZATION_MANAGER.get() {
        return Ok(manager);
    }
    let manager = LocalizationManager::new()?;
    Ok(LOCALIZATION_MANAGER.get_or_init(|| manager))
}

/// Convenience function to get a localized message
pub fn t_lang(key: &str, language: &str) -> String {
    match init_localization() {
        Ok(manager) => manager.get_message_in_language(key, language, None),
        Err(e) => {
            warn!("Localization unavailable: {}", e);
            key.to_string()
        }
    }
}

/// Convenience function to get a localized message with arguments
pub fn t_args_lang(key: &str, language: &str, args: &[(&str, &str)]) -> String {
    match init_localization() {
        Ok(manager) => manager.get_message_with_args(key, language, args),
        Err(e) => {
            warn!("Localization unavailable: {}", e);
            key.to_string()
        }
    }
}
