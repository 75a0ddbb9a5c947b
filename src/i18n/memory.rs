use super::{FieldKey, TranslationProvider};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Entry {
    entity: String,
    entity_id: Option<i64>,
    field: String,
    locale: String,
}

/// Translation table held in memory.
///
/// Lookups try the full locale first (`fr_CA`), then its language part (`fr`).
#[derive(Debug, Clone, Default)]
pub struct InMemoryTranslations {
    entries: HashMap<Entry, String>,
}

impl InMemoryTranslations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, key: FieldKey<'_>, locale: &str, value: impl Into<String>) -> Self {
        self.insert(key, locale, value);
        self
    }

    pub fn insert(&mut self, key: FieldKey<'_>, locale: &str, value: impl Into<String>) {
        self.entries.insert(entry(key, locale), value.into());
    }

    pub fn remove(&mut self, key: FieldKey<'_>, locale: &str) -> Option<String> {
        self.entries.remove(&entry(key, locale))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn entry(key: FieldKey<'_>, locale: &str) -> Entry {
    Entry {
        entity: key.entity.to_string(),
        entity_id: key.entity_id,
        field: key.field.to_string(),
        locale: locale.to_string(),
    }
}

impl TranslationProvider for InMemoryTranslations {
    fn translate(&self, key: FieldKey<'_>, locale: &str) -> Option<String> {
        if let Some(value) = self.entries.get(&entry(key, locale)) {
            return Some(value.clone());
        }
        let language = locale.split(['_', '-']).next()?;
        if language == locale {
            return None;
        }
        self.entries.get(&entry(key, language)).cloned()
    }
}
