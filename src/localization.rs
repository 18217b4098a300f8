//! 多言語化
//!
//! 言語ごとの辞書（`languages/{code}.json`）を取得し、文書の翻訳対象要素に適用する。

/// Applying dictionaries to a document
mod apply;
/// Dictionary types
mod dictionary;
/// Dictionary loading
mod loader;
/// Dictionary sources
mod source;

pub use apply::{
    ContentPolicy,
    apply,
    plan_updates,
};
pub use dictionary::{
    Dictionary,
    Translation,
};
pub use loader::{
    LoadError,
    LocalizationLoader,
};
pub use source::{
    ConfiguredSource,
    DictionarySource,
    FetchError,
    FsSource,
    HttpSource,
    MemorySource,
};
