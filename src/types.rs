//! Core types and helpers shared across the crate.

/// Language used when no preference has been stored.
pub const FALLBACK_LANGUAGE: &str = "cz";

/// Default attribute carrying the translation key.
pub const DEFAULT_TRANSLATION_ATTRIBUTE: &str = "data-i18n";

/// Checks that a language code is safe to embed in a file path or URL.
///
/// Accepts non-empty ASCII alphanumerics, `-` and `_` (e.g. `cz`, `en-US`, `pt_BR`).
#[must_use]
pub fn is_valid_language_code(code: &str) -> bool {
    !code.is_empty()
        && code.len() <= 35
        && code.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

/// Checks that an HTML attribute name is usable as the translation attribute.
#[must_use]
pub fn is_valid_attribute_name(name: &str) -> bool {
    name.bytes().next().is_some_and(|b| b.is_ascii_alphabetic())
        && name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}
