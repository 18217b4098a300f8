use thiserror::Error;

/// Errors that may occur while discovering tagged elements in markup
#[derive(Error, Debug)]
pub enum DocumentError {
    /// Error when failing to set the language for the parser
    #[error("Failed to set language for parser: {0}")]
    LanguageSetup(#[from] tree_sitter::LanguageError),
    /// Error when failing to parse markup
    #[error("Failed to parse markup")]
    ParseFailed,
    /// Error when the tagged-element query could not be compiled
    #[error("Tagged element query is unavailable")]
    QueryUnavailable,
}
