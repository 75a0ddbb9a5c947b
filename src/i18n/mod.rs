//! Locale-sensitive lookup of translatable fields.
//!
//! Records store the default-locale value of a translatable field. Reads take a
//! [`TranslationContext`] that names the locale and the provider to consult; when the
//! provider has nothing for the field the stored default is returned unchanged.

mod memory;

pub use memory::InMemoryTranslations;

use std::fmt;
use std::sync::Arc;

/// Key of a translatable field on a concrete record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldKey<'a> {
    /// Entity name, e.g. `"ProductOption"`.
    pub entity: &'a str,
    /// Record identifier. Unsaved records have none.
    pub entity_id: Option<i64>,
    /// Field name, e.g. `"label"`.
    pub field: &'a str,
}

/// Source of translated field values.
pub trait TranslationProvider: Send + Sync {
    /// Translated value for `key` in `locale`, or `None` when no translation exists.
    fn translate(&self, key: FieldKey<'_>, locale: &str) -> Option<String>;
}

/// Provider that never translates. Every read returns the stored default.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTranslation;

impl TranslationProvider for NoTranslation {
    fn translate(&self, _key: FieldKey<'_>, _locale: &str) -> Option<String> {
        None
    }
}

/// Locale plus provider, passed explicitly to every translated read.
#[derive(Clone)]
pub struct TranslationContext {
    locale: String,
    provider: Arc<dyn TranslationProvider>,
}

impl TranslationContext {
    pub fn new(locale: impl Into<String>, provider: Arc<dyn TranslationProvider>) -> Self {
        Self {
            locale: locale.into(),
            provider,
        }
    }

    /// Context that always yields stored defaults.
    pub fn untranslated(locale: impl Into<String>) -> Self {
        Self::new(locale, Arc::new(NoTranslation))
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Resolve a field: the translation if one exists, else `default`.
    pub fn resolve(&self, key: FieldKey<'_>, default: Option<&str>) -> Option<String> {
        match self.provider.translate(key, &self.locale) {
            Some(translated) => Some(translated),
            None => default.map(str::to_owned),
        }
    }
}

impl fmt::Debug for TranslationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranslationContext")
            .field("locale", &self.locale)
            .finish_non_exhaustive()
    }
}

impl Default for TranslationContext {
    fn default() -> Self {
        Self::untranslated("en")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: FieldKey<'static> = FieldKey {
        entity: "ProductOption",
        entity_id: Some(1),
        field: "label",
    };

    #[test]
    fn test_untranslated_returns_default() {
        let ctx = TranslationContext::untranslated("fr");
        assert_eq!(ctx.resolve(KEY, Some("Color")).as_deref(), Some("Color"));
        assert_eq!(ctx.resolve(KEY, None), None);
    }

    #[test]
    fn test_translation_replaces_default() {
        let translations = InMemoryTranslations::new().with(KEY, "fr", "Couleur");
        let ctx = TranslationContext::new("fr", Arc::new(translations));
        assert_eq!(ctx.resolve(KEY, Some("Color")).as_deref(), Some("Couleur"));
    }

    #[test]
    fn test_translation_applies_even_without_default() {
        let translations = InMemoryTranslations::new().with(KEY, "fr", "Couleur");
        let ctx = TranslationContext::new("fr", Arc::new(translations));
        assert_eq!(ctx.resolve(KEY, None).as_deref(), Some("Couleur"));
    }
}
