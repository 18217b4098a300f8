//! 言語設定の保存
//!
//! ブラウザの `localStorage` の `language` キーに相当する値を永続化する。

use std::fs;
use std::path::{
    Path,
    PathBuf,
};

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::types::is_valid_language_code;

/// 保存ファイル名
const PREFERENCE_FILE: &str = "preferences.json";
/// データディレクトリ内のアプリケーション名
const APP_NAME: &str = "studium-site";

/// 言語設定のエラー
#[derive(Error, Debug)]
pub enum PreferenceError {
    /// 不正な言語コード
    #[error("Invalid language code: {0:?}")]
    InvalidLanguageCode(String),

    /// ファイルの読み書きエラー
    #[error("Failed to access preference file: {0}")]
    Io(#[from] std::io::Error),

    /// JSON のパース・生成エラー
    #[error("Failed to parse preference file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// 永続化先
pub trait PreferenceStorage {
    /// 保存されている言語コードを読む（未設定なら `None`）
    ///
    /// # Errors
    /// 読み込みに失敗した場合
    fn read(&self) -> Result<Option<String>, PreferenceError>;

    /// 言語コードを保存する
    ///
    /// # Errors
    /// 書き込みに失敗した場合
    fn write(&mut self, language: &str) -> Result<(), PreferenceError>;
}

/// ファイルに保存する内容
#[derive(Debug, Default, Deserialize, Serialize)]
struct StoredPreferences {
    /// 言語コード
    #[serde(default)]
    language: Option<String>,
}

/// JSON ファイルに保存する
#[derive(Debug, Clone)]
pub struct FilePreferenceStorage {
    /// 保存先のパス
    path: PathBuf,
}

impl FilePreferenceStorage {
    /// 保存先を指定して作成
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// 既定の保存先（ユーザーのローカルデータディレクトリ）
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_local_dir().map(|mut path| {
            path.push(APP_NAME);
            path.push(PREFERENCE_FILE);
            path
        })
    }

    /// 保存先のパス
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStorage for FilePreferenceStorage {
    fn read(&self) -> Result<Option<String>, PreferenceError> {
        if !self.path.exists() {
            tracing::debug!("Preference file not found: {:?}", self.path);
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        let stored: StoredPreferences = serde_json::from_str(&content)?;
        Ok(stored.language)
    }

    fn write(&mut self, language: &str) -> Result<(), PreferenceError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let stored = StoredPreferences { language: Some(language.to_string()) };
        fs::write(&self.path, serde_json::to_string_pretty(&stored)?)?;
        tracing::debug!(language, "Saved language preference to {:?}", self.path);
        Ok(())
    }
}

/// メモリ上に保存する（テスト・組み込み用）
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferenceStorage {
    /// 保存されている言語コード
    language: Option<String>,
}

impl MemoryPreferenceStorage {
    /// 空のストレージを作成
    #[must_use]
    pub const fn new() -> Self {
        Self { language: None }
    }

    /// 言語コードが保存済みのストレージを作成
    #[must_use]
    pub fn with_language(language: impl Into<String>) -> Self {
        Self { language: Some(language.into()) }
    }
}

impl PreferenceStorage for MemoryPreferenceStorage {
    fn read(&self) -> Result<Option<String>, PreferenceError> {
        Ok(self.language.clone())
    }

    fn write(&mut self, language: &str) -> Result<(), PreferenceError> {
        self.language = Some(language.to_string());
        Ok(())
    }
}

/// 言語設定（Language Preference Store）
#[derive(Debug, Clone)]
pub struct LanguagePreference<P> {
    /// 永続化先
    storage: P,
    /// 未設定時の言語
    fallback: String,
}

impl<P: PreferenceStorage> LanguagePreference<P> {
    /// 新しい言語設定を作成
    #[must_use]
    pub fn new(storage: P, fallback: impl Into<String>) -> Self {
        Self { storage, fallback: fallback.into() }
    }

    /// 保存されている言語を取得する
    ///
    /// 未設定・読み込み失敗・不正な値の場合は既定の言語を返す。
    #[must_use]
    pub fn get(&self) -> String {
        match self.storage.read() {
            Ok(Some(language)) if is_valid_language_code(&language) => language,
            Ok(Some(language)) => {
                tracing::warn!(language = %language, "Ignoring invalid stored language");
                self.fallback.clone()
            }
            Ok(None) => self.fallback.clone(),
            Err(e) => {
                tracing::warn!("Failed to read language preference: {e}");
                self.fallback.clone()
            }
        }
    }

    /// 言語を保存する
    ///
    /// # Errors
    /// - 不正な言語コード
    /// - 書き込みエラー
    pub fn set(&mut self, language: &str) -> Result<(), PreferenceError> {
        if !is_valid_language_code(language) {
            return Err(PreferenceError::InvalidLanguageCode(language.to_string()));
        }
        self.storage.write(language)
    }

    /// 未設定時の言語
    #[must_use]
    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    /// 永続化先
    #[must_use]
    pub const fn storage(&self) -> &P {
        &self.storage
    }
}
