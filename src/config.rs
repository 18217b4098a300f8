//! サイト設定
//!
//! サイトルートの `.studium.json` を読み込み、検証する。

/// Config file loader
mod loader;
/// Configuration manager
mod manager;
/// Configuration types and settings
mod types;

pub use manager::ConfigManager;
pub use types::{
    ConfigError,
    LanguagesSource,
    SiteSettings,
    ValidationError,
};

pub use crate::localization::ContentPolicy;
