use std::path::PathBuf;

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::localization::ContentPolicy;
use crate::types::{
    DEFAULT_TRANSLATION_ATTRIBUTE,
    FALLBACK_LANGUAGE,
    is_valid_attribute_name,
    is_valid_language_code,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "languages[0]")
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// 番号付きの一覧に整形する
fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Where `{code}.json` dictionaries are fetched from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LanguagesSource {
    /// Directory on disk, relative paths resolved against the site root.
    Directory(PathBuf),
    /// Base URL, fetched as `{url}/{code}.json`.
    Url(String),
}

impl Default for LanguagesSource {
    fn default() -> Self {
        Self::Directory(PathBuf::from("languages"))
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SiteSettings {
    /// Used when no language preference has been stored.
    pub default_language: String,

    /// Languages offered by the switcher and built by `build`.
    pub languages: Vec<String>,

    pub languages_source: LanguagesSource,

    /// Attribute carrying the translation key.
    pub translation_attribute: String,

    /// How plain string values are applied.
    pub content_policy: ContentPolicy,

    /// Overrides the default preference file location.
    pub preference_file: Option<PathBuf>,
}

impl SiteSettings {
    /// # Errors
    /// - Required field is empty
    /// - Invalid language code
    /// - Invalid attribute name or source
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.languages.is_empty() {
            errors.push(ValidationError::new(
                "languages",
                "At least one language is required. Example: [\"cz\", \"en\"]",
            ));
        }

        for (index, code) in self.languages.iter().enumerate() {
            if !is_valid_language_code(code) {
                errors.push(ValidationError::new(
                    format!("languages[{index}]"),
                    format!("Invalid language code '{code}': use letters, digits, '-' or '_'"),
                ));
            }
        }

        if !is_valid_language_code(&self.default_language) {
            errors.push(ValidationError::new(
                "defaultLanguage",
                format!(
                    "Invalid language code '{}': use letters, digits, '-' or '_'",
                    self.default_language
                ),
            ));
        } else if !self.languages.is_empty() && !self.languages.contains(&self.default_language) {
            errors.push(ValidationError::new(
                "defaultLanguage",
                format!("'{}' must be one of the configured languages", self.default_language),
            ));
        }

        if !is_valid_attribute_name(&self.translation_attribute) {
            errors.push(ValidationError::new(
                "translationAttribute",
                format!(
                    "Invalid attribute name '{}'. Example: \"data-i18n\"",
                    self.translation_attribute
                ),
            ));
        }

        match &self.languages_source {
            LanguagesSource::Directory(directory) if directory.as_os_str().is_empty() => {
                errors.push(ValidationError::new(
                    "languagesSource.directory",
                    "The directory cannot be empty. Example: \"languages\"",
                ));
            }
            LanguagesSource::Url(url) => {
                if let Err(message) = validate_url(url) {
                    errors.push(ValidationError::new("languagesSource.url", message));
                }
            }
            LanguagesSource::Directory(_) => {}
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// `languagesSource.url` must be an absolute http(s) URL
fn validate_url(url: &str) -> Result<(), String> {
    let parsed =
        reqwest::Url::parse(url).map_err(|e| format!("Invalid URL '{url}': {e}"))?;
    if matches!(parsed.scheme(), "http" | "https") {
        Ok(())
    } else {
        Err(format!("Unsupported URL scheme '{}'. Use http or https", parsed.scheme()))
    }
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            default_language: FALLBACK_LANGUAGE.to_string(),
            languages: ["cz", "sk", "esp", "en"].iter().map(ToString::to_string).collect(),
            languages_source: LanguagesSource::default(),
            translation_attribute: DEFAULT_TRANSLATION_ATTRIBUTE.to_string(),
            content_policy: ContentPolicy::default(),
            preference_file: None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::expect_used, clippy::panic)]
mod tests {
    use googletest::prelude::*;
    use rstest::*;

    use super::*;

    #[rstest]
    fn validate_valid_settings() {
        let settings = SiteSettings::default();

        assert_that!(settings.validate(), ok(anything()));
    }

    #[rstest]
    fn deserialize_empty_settings() {
        let json = "{}";

        let settings: SiteSettings = serde_json::from_str(json).unwrap();

        assert_that!(settings.default_language, eq("cz"));
        assert_that!(
            settings.languages,
            elements_are![eq("cz"), eq("sk"), eq("esp"), eq("en")]
        );
        assert_that!(settings.translation_attribute, eq("data-i18n"));
        assert_that!(settings.content_policy, eq(ContentPolicy::Text));
        assert_that!(
            settings.languages_source,
            eq(&LanguagesSource::Directory(PathBuf::from("languages")))
        );
    }

    #[rstest]
    fn deserialize_partial_settings() {
        let json = r#"{
            "defaultLanguage": "en",
            "languagesSource": {"url": "https://example.com/languages"},
            "contentPolicy": "sniffMarkup"
        }"#;

        let settings: SiteSettings = serde_json::from_str(json).unwrap();

        assert_that!(settings.default_language, eq("en"));
        assert_that!(settings.content_policy, eq(ContentPolicy::SniffMarkup));
        assert_that!(
            settings.languages_source,
            eq(&LanguagesSource::Url("https://example.com/languages".to_string()))
        );
        assert_that!(settings.validate(), ok(anything()));
    }

    #[rstest]
    fn validate_invalid_languages_empty() {
        let settings = SiteSettings { languages: vec![], ..SiteSettings::default() };
        let result = settings.validate();

        assert_that!(
            result,
            err(elements_are![all![
                field!(ValidationError.field_path, eq("languages")),
                field!(ValidationError.message, contains_substring("At least one language"))
            ]])
        );
    }

    #[rstest]
    fn validate_invalid_language_code() {
        let settings = SiteSettings {
            languages: vec!["cz".to_string(), "e n".to_string()],
            ..SiteSettings::default()
        };
        let result = settings.validate();

        assert_that!(
            result,
            err(elements_are![all![
                field!(ValidationError.field_path, eq("languages[1]")),
                field!(ValidationError.message, contains_substring("e n"))
            ]])
        );
    }

    #[rstest]
    fn validate_default_language_not_listed() {
        let settings =
            SiteSettings { default_language: "de".to_string(), ..SiteSettings::default() };
        let result = settings.validate();

        assert_that!(
            result,
            err(elements_are![all![
                field!(ValidationError.field_path, eq("defaultLanguage")),
                field!(ValidationError.message, contains_substring("configured languages"))
            ]])
        );
    }

    #[rstest]
    #[case("")]
    #[case("data i18n")]
    #[case("\"x")]
    fn validate_invalid_attribute(#[case] attribute: &str) {
        let settings = SiteSettings {
            translation_attribute: attribute.to_string(),
            ..SiteSettings::default()
        };
        let result = settings.validate();

        assert_that!(
            result,
            err(elements_are![field!(ValidationError.field_path, eq("translationAttribute"))])
        );
    }

    #[rstest]
    #[case::not_a_url("not a url", "Invalid URL")]
    #[case::ftp("ftp://example.com/languages", "Unsupported URL scheme")]
    fn validate_invalid_url(#[case] url: &str, #[case] expected: &str) {
        let settings = SiteSettings {
            languages_source: LanguagesSource::Url(url.to_string()),
            ..SiteSettings::default()
        };
        let result = settings.validate();

        assert_that!(
            result,
            err(elements_are![all![
                field!(ValidationError.field_path, eq("languagesSource.url")),
                field!(ValidationError.message, contains_substring(expected))
            ]])
        );
    }

    #[rstest]
    fn validate_empty_directory() {
        let settings = SiteSettings {
            languages_source: LanguagesSource::Directory(PathBuf::new()),
            ..SiteSettings::default()
        };

        assert_that!(
            settings.validate(),
            err(elements_are![field!(
                ValidationError.field_path,
                eq("languagesSource.directory")
            )])
        );
    }

    #[rstest]
    fn config_error_validation_errors_format() {
        let settings = SiteSettings {
            languages: vec![],
            translation_attribute: String::new(),
            ..SiteSettings::default()
        };

        let validation_result = settings.validate();
        let errors = validation_result.unwrap_err();
        let config_error = ConfigError::ValidationErrors(errors);

        let error_message = format!("{config_error}");
        assert_that!(error_message, contains_substring("Configuration validation failed"));
        assert_that!(error_message, contains_substring("1. languages"));
        assert_that!(error_message, contains_substring("At least one language"));
        assert_that!(error_message, contains_substring("2. translationAttribute"));
    }
}
