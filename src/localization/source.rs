//! 辞書の取得元
//!
//! `languages/{code}.json` をファイルシステム・HTTP・メモリのいずれかから取得する。

use std::collections::HashMap;
use std::future::Future;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::LanguagesSource;
use crate::types::is_valid_language_code;

/// 取得エラー
#[derive(Error, Debug)]
pub enum FetchError {
    /// パスや URL に埋め込めない言語コード
    #[error("Invalid language code: {0:?}")]
    InvalidLanguageCode(String),

    /// ファイル読み込みエラー
    #[error("Failed to read dictionary file: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP 通信エラー
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// 成功以外の HTTP ステータス
    #[error("Unexpected HTTP status: {0}")]
    Status(u16),

    /// 辞書が存在しない
    #[error("Dictionary not found for language {0:?}")]
    NotFound(String),
}

/// 辞書の取得元
pub trait DictionarySource {
    /// 言語コードに対応する辞書の本文を取得する
    ///
    /// # Errors
    /// 取得に失敗した場合（呼び出し側で空の辞書として扱われる）
    fn fetch(&self, language: &str) -> impl Future<Output = Result<Vec<u8>, FetchError>> + Send;
}

/// 言語コードを検証する
fn checked_code(language: &str) -> Result<&str, FetchError> {
    if is_valid_language_code(language) {
        Ok(language)
    } else {
        Err(FetchError::InvalidLanguageCode(language.to_string()))
    }
}

/// ディレクトリ内の `{code}.json` を読む
#[derive(Debug, Clone)]
pub struct FsSource {
    /// 辞書ディレクトリ
    directory: PathBuf,
}

impl FsSource {
    /// 新しい取得元を作成
    #[must_use]
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self { directory: directory.into() }
    }

    /// 言語コードに対応するファイルパス
    ///
    /// # Errors
    /// 言語コードが不正な場合
    pub fn path_for(&self, language: &str) -> Result<PathBuf, FetchError> {
        let language = checked_code(language)?;
        Ok(self.directory.join(format!("{language}.json")))
    }
}

impl DictionarySource for FsSource {
    async fn fetch(&self, language: &str) -> Result<Vec<u8>, FetchError> {
        let path = self.path_for(language)?;
        tracing::debug!(path = %path.display(), "Reading dictionary file");
        Ok(tokio::fs::read(&path).await?)
    }
}

/// `GET {base}/{code}.json` で取得する
#[derive(Debug, Clone)]
pub struct HttpSource {
    /// HTTP クライアント
    client: reqwest::Client,
    /// 辞書ディレクトリの URL（末尾の `/` なし）
    base_url: String,
}

impl HttpSource {
    /// 新しい取得元を作成
    ///
    /// # Errors
    /// HTTP クライアントの初期化に失敗した場合
    pub fn new(base_url: &str) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(10))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// 設定済みのクライアントで作成
    #[must_use]
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self { client, base_url: base_url.trim_end_matches('/').to_string() }
    }

    /// 言語コードに対応する URL
    ///
    /// # Errors
    /// 言語コードが不正な場合
    pub fn url_for(&self, language: &str) -> Result<String, FetchError> {
        let language = checked_code(language)?;
        Ok(format!("{}/{language}.json", self.base_url))
    }
}

impl DictionarySource for HttpSource {
    async fn fetch(&self, language: &str) -> Result<Vec<u8>, FetchError> {
        let url = self.url_for(language)?;
        tracing::debug!(%url, "Fetching dictionary");

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        Ok(response.bytes().await?.to_vec())
    }
}

/// メモリ上の辞書本文
///
/// 組み込みの辞書やテストで使う。
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    /// 言語コード → 本文
    bodies: HashMap<String, Vec<u8>>,
}

impl MemorySource {
    /// 空の取得元を作成
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// 言語の本文を登録する
    #[must_use]
    pub fn with(mut self, language: &str, body: impl Into<Vec<u8>>) -> Self {
        self.insert(language, body);
        self
    }

    /// 言語の本文を登録する
    pub fn insert(&mut self, language: &str, body: impl Into<Vec<u8>>) {
        self.bodies.insert(language.to_string(), body.into());
    }
}

impl DictionarySource for MemorySource {
    async fn fetch(&self, language: &str) -> Result<Vec<u8>, FetchError> {
        let language = checked_code(language)?;
        self.bodies.get(language).cloned().ok_or_else(|| FetchError::NotFound(language.to_string()))
    }
}

/// 設定に応じた取得元
#[derive(Debug, Clone)]
pub enum ConfiguredSource {
    /// ファイルシステム
    Fs(FsSource),
    /// HTTP
    Http(HttpSource),
}

impl ConfiguredSource {
    /// 設定から取得元を作成する
    ///
    /// 相対ディレクトリは `root` からのパスとして解決する。
    ///
    /// # Errors
    /// HTTP クライアントの初期化に失敗した場合
    pub fn from_settings(
        source: &LanguagesSource,
        root: &std::path::Path,
    ) -> Result<Self, FetchError> {
        match source {
            LanguagesSource::Directory(directory) => Ok(Self::Fs(FsSource::new(root.join(directory)))),
            LanguagesSource::Url(url) => Ok(Self::Http(HttpSource::new(url)?)),
        }
    }
}

impl DictionarySource for ConfiguredSource {
    async fn fetch(&self, language: &str) -> Result<Vec<u8>, FetchError> {
        match self {
            Self::Fs(source) => source.fetch(language).await,
            Self::Http(source) => source.fetch(language).await,
        }
    }
}
