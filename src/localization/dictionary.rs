//! Language dictionary definitions

use std::collections::HashMap;

use serde::Deserialize;

/// A dictionary value.
///
/// A JSON string is plain text. Markup has to be requested explicitly with `{"html": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Translation {
    /// Plain text, inserted as character data.
    Text(String),
    /// Raw markup, inserted as-is.
    Markup {
        /// Markup to insert
        html: String,
    },
}

impl Translation {
    /// The raw string regardless of how it is applied
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text(text) => text,
            Self::Markup { html } => html,
        }
    }
}

/// Key-to-string mapping for one language.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dictionary {
    /// Language code the dictionary was loaded for
    language: String,
    /// Translation key → value
    entries: HashMap<String, Translation>,
}

impl Dictionary {
    /// Creates an empty dictionary
    #[must_use]
    pub fn empty(language: impl Into<String>) -> Self {
        Self { language: language.into(), entries: HashMap::new() }
    }

    /// Creates a dictionary from entries
    #[must_use]
    pub fn new(language: impl Into<String>, entries: HashMap<String, Translation>) -> Self {
        Self { language: language.into(), entries }
    }

    /// Creates a plain-text dictionary from key/value pairs
    #[must_use]
    pub fn from_texts<'a>(
        language: impl Into<String>,
        texts: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        let entries = texts
            .into_iter()
            .map(|(key, value)| (key.to_string(), Translation::Text(value.to_string())))
            .collect();
        Self::new(language, entries)
    }

    /// Parses a dictionary body.
    ///
    /// The body must be a flat JSON object whose values are strings or `{"html": "..."}`
    /// objects. Anything else is rejected as a whole.
    ///
    /// # Errors
    /// Returns error if the body is not such an object.
    pub fn parse(language: impl Into<String>, body: &[u8]) -> Result<Self, serde_json::Error> {
        let entries: HashMap<String, Translation> = serde_json::from_slice(body)?;
        Ok(Self::new(language, entries))
    }

    /// Language code
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Looks up a key
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Translation> {
        self.entries.get(key)
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the dictionary has no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
