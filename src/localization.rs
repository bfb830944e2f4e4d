//! # Localization Module
//!
//! French and English messages of the calculators, served from Fluent
//! catalogs embedded at compile time. French is the default language and the
//! fallback for any message missing in English.

use fluent_bundle::concurrent::FluentBundle;
use fluent_bundle::{FluentArgs, FluentResource, FluentValue};
use lazy_static::lazy_static;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use unic_langid::LanguageIdentifier;
use anyhow::Result;

use crate::brewing_types::GravityUnit;

const FRENCH_RESOURCE: &str = include_str!("../locales/fr/main.ftl");
const ENGLISH_RESOURCE: &str = include_str!("../locales/en/main.ftl");

/// Display language of the calculator messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    /// French, the language the calculators were written for
    #[default]
    French,
    English,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::French, Language::English];

    /// Two-letter language code
    pub fn code(self) -> &'static str {
        match self {
            Language::French => "fr",
            Language::English => "en",
        }
    }

    /// Resolve a language code such as "fr", "en-US" or "FR_fr".
    /// Unknown codes fall back to French.
    pub fn from_code(code: &str) -> Self {
        code.parse().unwrap_or_default()
    }

    fn resource(self) -> &'static str {
        match self {
            Language::French => FRENCH_RESOURCE,
            Language::English => ENGLISH_RESOURCE,
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let primary = s
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_lowercase();
        match primary.as_str() {
            "fr" => Ok(Language::French),
            "en" => Ok(Language::English),
            _ => Err(format!("unsupported language: {s}")),
        }
    }
}

/// Localization manager for the brewing calculators
pub struct LocalizationManager {
    bundles: HashMap<Language, FluentBundle<FluentResource>>,
}

impl LocalizationManager {
    /// Create a new localization manager with every embedded language loaded
    pub fn new() -> Result<Self> {
        let mut bundles = HashMap::new();

        for lang in Language::ALL {
            let locale: LanguageIdentifier = lang.code().parse()?;
            let bundle = Self::create_bundle(&locale, lang.resource())?;
            bundles.insert(lang, bundle);
        }

        Ok(Self { bundles })
    }

    /// Manager without any message, every lookup reports a missing translation
    fn empty() -> Self {
        Self {
            bundles: HashMap::new(),
        }
    }

    /// Create a fluent bundle for a specific locale from an FTL source
    fn create_bundle(locale: &LanguageIdentifier, source: &str) -> Result<FluentBundle<FluentResource>> {
        let mut bundle = FluentBundle::new_concurrent(vec![locale.clone()]);
        // Messages are plain terminal text, no bidi isolation marks around arguments
        bundle.set_use_isolating(false);

        let resource = match FluentResource::try_new(source.to_string()) {
            Ok(resource) => resource,
            Err((resource, errors)) => {
                warn!("{} syntax errors in the {} message catalog", errors.len(), locale);
                resource
            }
        };
        if let Err(errors) = bundle.add_resource(resource) {
            warn!("{} duplicate messages in the {} catalog", errors.len(), locale);
        }

        Ok(bundle)
    }

    /// Get a localized message, falling back to French when the key is missing
    pub fn get_message(&self, key: &str, lang: Language, args: Option<&HashMap<&str, &str>>) -> String {
        let lookup = |lang: Language| {
            let bundle = self.bundles.get(&lang)?;
            let message = bundle.get_message(key)?;
            let pattern = message.value()?;

            let fluent_args = args.map(|args| {
                FluentArgs::from_iter(args.iter().map(|(k, v)| (*k, FluentValue::from(*v))))
            });

            let mut errors = vec![];
            let value = bundle.format_pattern(pattern, fluent_args.as_ref(), &mut errors);
            if !errors.is_empty() {
                debug!("Formatting '{}' in {} reported {:?}", key, lang.code(), errors);
            }
            Some(value.into_owned())
        };

        lookup(lang)
            .or_else(|| lookup(Language::French))
            .unwrap_or_else(|| format!("Missing translation: {}", key))
    }

    /// Get a localized message with simple string arguments
    pub fn get_message_with_args(&self, key: &str, lang: Language, args: &[(&str, &str)]) -> String {
        let args_map: HashMap<&str, &str> = args.iter().cloned().collect();
        self.get_message(key, lang, Some(&args_map))
    }
}

lazy_static! {
    /// Global localization instance, built once from the embedded catalogs
    static ref LOCALIZATION_MANAGER: LocalizationManager =
        LocalizationManager::new().unwrap_or_else(|e| {
            warn!("Localization unavailable: {e}");
            LocalizationManager::empty()
        });
}

/// Get the global localization manager
pub fn get_localization_manager() -> &'static LocalizationManager {
    &LOCALIZATION_MANAGER
}

/// Convenience function to get a localized message
pub fn t_lang(key: &str, lang: Language) -> String {
    get_localization_manager().get_message(key, lang, None)
}

/// Convenience function to get a localized message with arguments
pub fn t_args_lang(key: &str, lang: Language, args: &[(&str, &str)]) -> String {
    get_localization_manager().get_message_with_args(key, lang, args)
}

/// Display name of a gravity unit
pub fn unit_label(unit: GravityUnit, lang: Language) -> String {
    let key = match unit {
        GravityUnit::Brix => "unit-brix",
        GravityUnit::Plato => "unit-plato",
        GravityUnit::SpecificGravity => "unit-specific-gravity",
    };
    t_lang(key, lang)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_codes() {
        assert_eq!(Language::from_code("fr"), Language::French);
        assert_eq!(Language::from_code("en-US"), Language::English);
        assert_eq!(Language::from_code("EN_gb"), Language::English);
        assert_eq!(Language::from_code("de"), Language::French);
        assert!("de".parse::<Language>().is_err());
    }

    #[test]
    fn test_arguments_are_not_isolated() {
        let message = t_args_lang("option-evaporate", Language::French, &[("amount", "1.00")]);
        assert_eq!(message, "Évaporer 1.00 litres d'eau.");
    }

    #[test]
    fn test_global_manager_is_built_once() {
        let first = get_localization_manager();
        let second = get_localization_manager();
        assert!(std::ptr::eq(first, second));
        assert_eq!(first.bundles.len(), Language::ALL.len());
    }

    #[test]
    fn test_missing_key() {
        let message = t_lang("no-such-key", Language::English);
        assert_eq!(message, "Missing translation: no-such-key");
    }
}
