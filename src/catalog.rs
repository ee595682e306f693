//! Localized message catalogs
//!
//! A catalog maps template names and word keys to localized strings. Templates
//! use named `{placeholder}` arguments. Catalogs are immutable once built and
//! are shared read-only between requests.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use unic_langid::LanguageIdentifier;

use crate::{NarratorError, Result};

const BUNDLED_CATALOGS: &[(&str, &str)] = &[
    ("en", include_str!("../resources/catalog/en.json")),
    ("fr", include_str!("../resources/catalog/fr.json")),
];

/// Every key the renderers look up.
pub const REQUIRED_KEYS: &[&str] = &[
    "day",
    "night",
    "outlook",
    "today",
    "tonight",
    "week_day",
    "week_night",
    "air_quality",
    "uv_index",
    "conditions",
    "temperature",
    "wind",
    "pressure",
    "humidity",
    "north",
    "east",
    "south",
    "west",
    "by",
    "am",
    "pm",
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

/// Language identifier of a report request, such as `en_US` or `fr-CA`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locale(LanguageIdentifier);

impl Locale {
    /// Parse a BCP-47 tag. Underscores are accepted in place of hyphens.
    pub fn parse(tag: &str) -> Result<Self> {
        let tag = tag.trim();
        let identifier = LanguageIdentifier::from_str(tag)
            .map_err(|e| NarratorError::validation(format!("Invalid locale '{tag}': {e}")))?;
        if identifier.language.is_empty() {
            return Err(NarratorError::validation(format!(
                "Invalid locale '{tag}': a language subtag such as 'en' is required"
            )));
        }
        Ok(Self(identifier))
    }

    /// Lowercase language subtag, used to select the catalog and the provider language
    #[must_use]
    pub fn language(&self) -> &str {
        self.0.language.as_str()
    }
}

impl FromStr for Locale {
    type Err = NarratorError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Immutable set of templates and words for one language
#[derive(Debug, Clone)]
pub struct MessageCatalog {
    language: String,
    messages: HashMap<String, String>,
}

impl MessageCatalog {
    /// Load the bundled catalog for the locale's language. There is no fallback language.
    pub fn load(locale: &Locale) -> Result<Self> {
        let (language, text) = BUNDLED_CATALOGS
            .iter()
            .find(|(language, _)| *language == locale.language())
            .ok_or_else(|| missing_catalog(locale))?;
        Self::from_json_str(*language, text)
    }

    /// Build a catalog from a JSON object whose values are all strings
    pub fn from_json_str(language: impl Into<String>, text: &str) -> Result<Self> {
        let language = language.into();
        let messages: HashMap<String, String> = serde_json::from_str(text).map_err(|e| {
            NarratorError::malformed(format!("catalog '{language}' is not a string map: {e}"))
        })?;
        Ok(Self { language, messages })
    }

    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Look up a message by exact key
    pub fn get(&self, key: &str) -> Result<&str> {
        self.messages
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| NarratorError::message_key_missing(&self.language, key))
    }

    /// Look up a template and substitute its named arguments
    pub fn format(&self, key: &str, args: &[(&str, &str)]) -> Result<String> {
        Ok(fill_template(self.get(key)?, args))
    }

    /// Required keys this catalog does not define
    #[must_use]
    pub fn missing_keys(&self) -> Vec<&'static str> {
        REQUIRED_KEYS
            .iter()
            .copied()
            .filter(|key| !self.messages.contains_key(*key))
            .collect()
    }
}

fn missing_catalog(locale: &Locale) -> NarratorError {
    NarratorError::resource_missing(format!("message catalog '{}'", locale.language()))
}

/// Replace `{name}` placeholders with matching arguments. Unknown placeholders are kept verbatim.
fn fill_template(template: &str, args: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len() + 16);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            out.push_str(&rest[open..]);
            return out;
        };

        let name = &after[..close];
        match args.iter().find(|(key, _)| *key == name) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[open..open + close + 2]),
        }
        rest = &after[close + 1..];
    }

    out.push_str(rest);
    out
}

/// Registry of the bundled catalogs, parsed once and shared across requests
#[derive(Debug, Clone)]
pub struct Catalogs {
    by_language: HashMap<String, Arc<MessageCatalog>>,
}

impl Catalogs {
    /// Parse every bundled catalog, failing on the first one that lacks a required key
    pub fn bundled() -> Result<Self> {
        Self::from_sources(BUNDLED_CATALOGS)
    }

    fn from_sources(sources: &[(&str, &str)]) -> Result<Self> {
        let mut by_language = HashMap::with_capacity(sources.len());
        for (language, text) in sources {
            let catalog = MessageCatalog::from_json_str(*language, text)?;
            if let Some(key) = catalog.missing_keys().first() {
                return Err(NarratorError::message_key_missing(*language, *key));
            }
            by_language.insert((*language).to_string(), Arc::new(catalog));
        }
        Ok(Self { by_language })
    }

    /// Catalog for the locale's language
    pub fn get(&self, locale: &Locale) -> Result<Arc<MessageCatalog>> {
        self.by_language
            .get(locale.language())
            .cloned()
            .ok_or_else(|| missing_catalog(locale))
    }

    /// Languages with a catalog, sorted
    #[must_use]
    pub fn languages(&self) -> Vec<&str> {
        let mut languages: Vec<&str> = self.by_language.keys().map(String::as_str).collect();
        languages.sort_unstable();
        languages
    }
}
