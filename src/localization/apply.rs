//! 辞書を文書に適用する
//!
//! 計画（純粋関数）と適用（文書の書き換え）を分ける。

use serde::{
    Deserialize,
    Serialize,
};

use super::dictionary::{
    Dictionary,
    Translation,
};
use crate::document::{
    Content,
    ContentUpdate,
    Document,
    ElementSnapshot,
};

/// 文字列値の扱い
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ContentPolicy {
    /// 常にプレーンテキストとして扱う
    #[default]
    Text,
    /// `<` を含む文字列はマークアップとして扱う
    SniffMarkup,
}

impl ContentPolicy {
    /// 辞書の値を挿入する内容に変換
    fn content_for(self, translation: &Translation) -> Content {
        match translation {
            Translation::Markup { html } => Content::Markup(html.clone()),
            Translation::Text(text) if self == Self::SniffMarkup && text.contains('<') => {
                Content::Markup(text.clone())
            }
            Translation::Text(text) => Content::Text(text.clone()),
        }
    }
}

/// 翻訳対象要素と辞書から更新を計画する
///
/// - 辞書にないキーの要素は対象外（現在の内容のまま）
/// - 空文字列の値は対象外
/// - テキストとして適用する値が現在の表示と同じなら対象外
#[must_use]
pub fn plan_updates(
    elements: &[ElementSnapshot<'_>],
    dictionary: &Dictionary,
    policy: ContentPolicy,
) -> Vec<ContentUpdate> {
    elements
        .iter()
        .filter_map(|element| {
            let translation = dictionary.get(element.key)?;
            if translation.as_str().is_empty() {
                return None;
            }

            let content = policy.content_for(translation);
            if matches!(&content, Content::Text(text) if text == element.text) {
                return None;
            }

            Some(ContentUpdate { target: element.target, key: element.key.to_string(), content })
        })
        .collect()
}

/// 辞書を文書に適用する
///
/// # Returns
/// 書き換えた要素の数
pub fn apply(document: &mut Document, dictionary: &Dictionary, policy: ContentPolicy) -> usize {
    let updates = plan_updates(&document.snapshot(), dictionary, policy);
    let applied = document.apply_updates(&updates);
    tracing::debug!(
        language = dictionary.language(),
        planned = updates.len(),
        applied,
        "Applied dictionary"
    );
    applied
}
