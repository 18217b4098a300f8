//! 辞書の読み込み

use thiserror::Error;

use super::dictionary::Dictionary;
use super::source::{
    DictionarySource,
    FetchError,
};

/// 読み込みエラー
#[derive(Error, Debug)]
pub enum LoadError {
    /// 取得に失敗
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// 本文がフラットな JSON オブジェクトではない
    #[error("Malformed dictionary: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// 言語ごとの辞書を読み込む
///
/// 重複排除やキャッシュは行わず、呼び出しのたびに取得する。
#[derive(Debug, Clone)]
pub struct LocalizationLoader<S> {
    /// 辞書の取得元
    source: S,
}

impl<S: DictionarySource> LocalizationLoader<S> {
    /// 新しいローダーを作成
    #[must_use]
    pub const fn new(source: S) -> Self {
        Self { source }
    }

    /// 取得元
    #[must_use]
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// 辞書を読み込む（失敗はエラーとして返す）
    ///
    /// # Errors
    /// - 取得エラー
    /// - JSON パースエラー
    pub async fn try_load(&self, language: &str) -> Result<Dictionary, LoadError> {
        let body = self.source.fetch(language).await?;
        let dictionary = Dictionary::parse(language, &body)?;
        tracing::debug!(language, entries = dictionary.len(), "Loaded dictionary");
        Ok(dictionary)
    }

    /// 辞書を読み込む
    ///
    /// 失敗してもエラーは返さず、ログに残して空の辞書を返す。
    /// その場合、要素はプレースホルダーのまま表示される。
    pub async fn load(&self, language: &str) -> Dictionary {
        match self.try_load(language).await {
            Ok(dictionary) => dictionary,
            Err(e) => {
                tracing::error!(language, "Error fetching language data: {e}");
                Dictionary::empty(language)
            }
        }
    }
}
