//! Translation dictionary: `key -> language -> text`.
//!
//! Text inserted for all languages is also kept language-neutral, so
//! generated labels still translate in a document that declares no
//! languages.

use std::collections::HashMap;

/// Slot holding the language-neutral text of a key.
const NEUTRAL: &str = "";

/// Errors from switching the translation language.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LanguageError {
    #[error("language '{0}' was never declared")]
    Unknown(String),
}

/// Declared languages and the text of every translation key in each.
#[derive(Debug, Clone, Default)]
pub struct Translator {
    languages: Vec<String>,
    current: usize,
    entries: HashMap<String, HashMap<String, String>>,
}

impl Translator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity),
            ..Self::default()
        }
    }

    /// Declare a language. Returns `false` if it is already declared.
    pub fn declare_language(&mut self, name: &str) -> bool {
        if self.has_language(name) {
            return false;
        }
        self.languages.push(name.to_string());
        true
    }

    pub fn has_language(&self, name: &str) -> bool {
        self.languages.iter().any(|l| l == name)
    }

    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    /// The active language, or `None` before any language is declared.
    pub fn language(&self) -> Option<&str> {
        self.languages.get(self.current).map(String::as_str)
    }

    pub fn set_language(&mut self, name: &str) -> Result<(), LanguageError> {
        let pos = self
            .languages
            .iter()
            .position(|l| l == name)
            .ok_or_else(|| LanguageError::Unknown(name.to_string()))?;
        self.current = pos;
        Ok(())
    }

    /// Set the text of `key` in `language`, replacing any previous text.
    pub fn insert(&mut self, key: &str, language: &str, text: &str) {
        self.entries
            .entry(key.to_string())
            .or_default()
            .insert(language.to_string(), text.to_string());
    }

    /// Set the same text for `key` in every declared language and as its
    /// language-neutral text.
    pub fn insert_all(&mut self, key: &str, text: &str) {
        let per_language = self.entries.entry(key.to_string()).or_default();
        for language in &self.languages {
            per_language.insert(language.clone(), text.to_string());
        }
        per_language.insert(NEUTRAL.to_string(), text.to_string());
    }

    pub fn remove(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Text of `key` in a specific language, without fallback.
    pub fn lookup(&self, key: &str, language: &str) -> Option<&str> {
        self.entries
            .get(key)
            .and_then(|m| m.get(language))
            .map(String::as_str)
    }

    /// Text of `key` in the active language, falling back to the first
    /// declared language, then the language-neutral text, then the key
    /// itself.
    pub fn translate<'a>(&'a self, key: &'a str) -> &'a str {
        let Some(per_language) = self.entries.get(key) else {
            return key;
        };
        self.language()
            .and_then(|l| per_language.get(l))
            .or_else(|| self.languages.first().and_then(|l| per_language.get(l)))
            .or_else(|| per_language.get(NEUTRAL))
            .map(String::as_str)
            .unwrap_or(key)
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
