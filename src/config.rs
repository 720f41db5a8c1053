//! # Application Configuration
//!
//! Runtime settings read from the environment (optionally populated from a
//! `.env` file by the binary), plus the serving count bounds enforced on
//! user input.

use log::debug;
use std::env;
use std::path::PathBuf;

use crate::localization::detect_language;

// Serving count bounds accepted from the user
pub const MIN_SERVINGS: u32 = 1;
pub const MAX_SERVINGS: u32 = 20;

pub const DEFAULT_DATABASE_PATH: &str = "recipe-cart.db";
pub const DEFAULT_IMAGE_BASE_URL: &str = "/";

// Environment variable names
pub const CATALOG_ENV: &str = "RECIPE_CART_CATALOG";
pub const DATABASE_ENV: &str = "RECIPE_CART_DB";
pub const LANGUAGE_ENV: &str = "RECIPE_CART_LANG";
pub const IMAGE_BASE_ENV: &str = "RECIPE_CART_IMAGE_BASE";

/// Configuration for a planner session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Recipe catalog JSON file; the built-in catalog is used when unset
    pub catalog_path: Option<PathBuf>,
    /// SQLite file holding selections and checked items
    pub database_path: PathBuf,
    /// Language for labels and messages (e.g., "en", "fr")
    pub language: String,
    /// Prefix for ingredient image paths, always ending in `/`
    pub image_base_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog_path: None,
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            language: "en".to_string(),
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
        }
    }
}

impl AppConfig {
    /// Read the configuration from process environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable lookup
    ///
    /// Empty values count as unset. The language is reduced to a supported
    /// one, so `fr-CA` becomes `fr` and anything unknown becomes `en`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        let config = Self {
            catalog_path: read(CATALOG_ENV).map(PathBuf::from),
            database_path: read(DATABASE_ENV)
                .map(PathBuf::from)
                .unwrap_or(defaults.database_path),
            language: detect_language(read(LANGUAGE_ENV).as_deref()).to_string(),
            image_base_url: read(IMAGE_BASE_ENV)
                .map(|base| with_trailing_slash(base.trim()))
                .unwrap_or(defaults.image_base_url),
        };
        debug!("Configuration: {:?}", config);
        config
    }

    pub fn with_catalog_path(mut self, path: PathBuf) -> Self {
        self.catalog_path = Some(path);
        self
    }

    pub fn with_database_path(mut self, path: PathBuf) -> Self {
        self.database_path = path;
        self
    }

    pub fn with_language(mut self, language: &str) -> Self {
        self.language = detect_language(Some(language)).to_string();
        self
    }

    pub fn with_image_base_url(mut self, base_url: &str) -> Self {
        self.image_base_url = with_trailing_slash(base_url);
        self
    }
}

fn with_trailing_slash(base_url: &str) -> String {
    if base_url.ends_with('/') {
        base_url.to_string()
    } else {
        format!("{base_url}/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.database_path, PathBuf::from("recipe-cart.db"));
        assert_eq!(config.language, "en");
    }

    #[test]
    fn test_values_from_environment() {
        let config = AppConfig::from_lookup(lookup_from(&[
            (CATALOG_ENV, "/data/recipes.json"),
            (DATABASE_ENV, "/tmp/plan.db"),
            (LANGUAGE_ENV, "fr-CA"),
        ]));
        assert_eq!(config.catalog_path, Some(PathBuf::from("/data/recipes.json")));
        assert_eq!(config.database_path, PathBuf::from("/tmp/plan.db"));
        assert_eq!(config.language, "fr");
    }

    #[test]
    fn test_empty_values_are_unset() {
        let config = AppConfig::from_lookup(lookup_from(&[(CATALOG_ENV, ""), (DATABASE_ENV, "  ")]));
        assert_eq!(config.catalog_path, None);
        assert_eq!(config.database_path, PathBuf::from(DEFAULT_DATABASE_PATH));
    }

    #[test]
    fn test_builders() {
        let config = AppConfig::default()
            .with_database_path(PathBuf::from("other.db"))
            .with_language("de");
        assert_eq!(config.database_path, PathBuf::from("other.db"));
        assert_eq!(config.language, "en");
    }

    #[test]
    fn test_image_base_url() {
        assert_eq!(AppConfig::default().image_base_url, "/");

        let config = AppConfig::from_lookup(lookup_from(&[(IMAGE_BASE_ENV, "https://cdn.example.com/app")]));
        assert_eq!(config.image_base_url, "https://cdn.example.com/app/");

        let config = AppConfig::default().with_image_base_url("/static/");
        assert_eq!(config.image_base_url, "/static/");
    }
}
