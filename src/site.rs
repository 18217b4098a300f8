//! サイト全体の状態
//!
//! 表示中の言語（Active Language）を所有し、ページ遷移・言語切り替えのたびに
//! 辞書を読み込んで文書に適用する。

use thiserror::Error;

use crate::config::SiteSettings;
use crate::document::Document;
use crate::inquiry::{
    self,
    Acknowledgement,
    Inquiry,
};
use crate::localization::{
    self,
    ContentPolicy,
    DictionarySource,
    LocalizationLoader,
};
use crate::page::Page;
use crate::preference::{
    LanguagePreference,
    PreferenceStorage,
};
use crate::types::is_valid_language_code;

/// サイト操作のエラー
#[derive(Error, Debug)]
pub enum SiteError {
    /// 不正な言語コード
    #[error("Invalid language code: {0:?}")]
    InvalidLanguageCode(String),
}

/// サイト
#[derive(Debug)]
pub struct Site<S, P> {
    /// 表示中の文書
    document: Document,
    /// 辞書ローダー
    loader: LocalizationLoader<S>,
    /// 言語設定の保存先
    preference: LanguagePreference<P>,
    /// 表示中の言語
    active_language: String,
    /// 文字列値の扱い
    policy: ContentPolicy,
}

impl<S: DictionarySource, P: PreferenceStorage> Site<S, P> {
    /// 新しいサイトを作成
    ///
    /// 起動前の表示言語は設定の既定言語。
    #[must_use]
    pub fn new(settings: &SiteSettings, source: S, storage: P) -> Self {
        Self {
            document: Document::new(settings.translation_attribute.as_str()),
            loader: LocalizationLoader::new(source),
            preference: LanguagePreference::new(storage, settings.default_language.as_str()),
            active_language: settings.default_language.clone(),
            policy: settings.content_policy,
        }
    }

    /// 起動する
    ///
    /// 保存された言語を読み込み、サイドバーを配置してホームを表示する。
    pub async fn startup(&mut self) {
        self.active_language = self.preference.get();
        tracing::debug!(language = %self.active_language, "Starting site");

        self.document.mount_sidebar();
        self.navigate(Page::Home).await;
    }

    /// ページを表示して翻訳する
    pub async fn navigate(&mut self, page: Page) {
        tracing::debug!(page = %page, "Navigating");
        self.document.render(page);
        self.localize().await;
    }

    /// ページ識別子で遷移する
    ///
    /// 未知の識別子の場合はコンテンツ領域を空にする（サイドバーは翻訳される）。
    pub async fn navigate_to(&mut self, id: &str) -> Option<Page> {
        let page = self.document.render_id(id);
        self.localize().await;
        page
    }

    /// 表示言語を切り替える
    ///
    /// 保存に失敗しても表示は切り替える。
    ///
    /// # Errors
    /// 不正な言語コードの場合（表示は変わらない）
    pub async fn change_language(&mut self, language: &str) -> Result<(), SiteError> {
        if !is_valid_language_code(language) {
            return Err(SiteError::InvalidLanguageCode(language.to_string()));
        }

        if let Err(e) = self.preference.set(language) {
            tracing::warn!(language, "Failed to save language preference: {e}");
        }

        language.clone_into(&mut self.active_language);
        self.localize().await;
        Ok(())
    }

    /// 表示中の言語の辞書を読み込んで適用する
    ///
    /// # Returns
    /// 書き換えた要素の数
    pub async fn localize(&mut self) -> usize {
        let dictionary = self.loader.load(&self.active_language).await;
        localization::apply(&mut self.document, &dictionary, self.policy)
    }

    /// 問い合わせを送信する
    pub fn submit_inquiry(&self, inquiry: &Inquiry) -> Acknowledgement {
        inquiry::record(inquiry, &self.active_language)
    }

    /// 表示中の言語
    #[must_use]
    pub fn active_language(&self) -> &str {
        &self.active_language
    }

    /// 表示中のページ
    #[must_use]
    pub const fn current_page(&self) -> Option<Page> {
        self.document.current_page()
    }

    /// 表示中の文書
    #[must_use]
    pub const fn document(&self) -> &Document {
        &self.document
    }

    /// 言語設定
    #[must_use]
    pub const fn preference(&self) -> &LanguagePreference<P> {
        &self.preference
    }

    /// HTML 文書として出力
    #[must_use]
    pub fn to_html(&self) -> String {
        self.document.to_html(&self.active_language)
    }
}
