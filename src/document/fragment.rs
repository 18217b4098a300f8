//! マークアップ断片（サイドバー・コンテンツ領域）

use std::collections::HashSet;
use std::ops::Range;

use super::markup::{
    TaggedElement,
    extract_tagged_elements,
};

/// マークアップとそこから検出された翻訳対象要素
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    /// 現在のマークアップ
    markup: String,
    /// 翻訳対象要素（文書順）
    elements: Vec<TaggedElement>,
}

impl Fragment {
    /// 空の断片を作成
    #[must_use]
    pub const fn new() -> Self {
        Self { markup: String::new(), elements: Vec::new() }
    }

    /// マークアップを丸ごと置き換える
    ///
    /// 以前の内容はマージせず必ず破棄する。
    pub fn replace(&mut self, markup: &str, attribute: &str) {
        self.clear();
        self.markup.push_str(markup);
        self.refresh(attribute);
    }

    /// 内容を空にする
    pub fn clear(&mut self) {
        self.markup.clear();
        self.elements.clear();
    }

    /// 現在のマークアップ
    #[must_use]
    pub fn markup(&self) -> &str {
        &self.markup
    }

    /// 翻訳対象要素
    #[must_use]
    pub fn elements(&self) -> &[TaggedElement] {
        &self.elements
    }

    /// 空かどうか
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markup.is_empty()
    }

    /// キーで要素を検索（文書順で最初のもの）
    #[must_use]
    pub fn find(&self, key: &str) -> Option<&TaggedElement> {
        self.elements.iter().find(|element| element.key == key)
    }

    /// 要素の内容を差し替える
    ///
    /// `patches` は (内容の範囲, 挿入するマークアップ)。範囲が重なる場合は文書順で先の
    /// （外側の）要素を優先し、内側は捨てる。差し替え後に要素を検出し直す。
    ///
    /// # Returns
    /// 実際に差し替えた数
    pub(crate) fn patch(&mut self, mut patches: Vec<(Range<usize>, String)>, attribute: &str) -> usize {
        if patches.is_empty() {
            return 0;
        }

        patches.sort_by_key(|(range, _)| range.start);

        let mut patched = String::with_capacity(self.markup.len());
        let mut cursor = 0;
        let mut applied = 0;

        for (range, replacement) in patches {
            if range.start < cursor {
                tracing::debug!(?range, "Skipping patch nested in an already replaced element");
                continue;
            }
            let Some(before) = self.markup.get(cursor..range.start) else {
                tracing::warn!(?range, "Patch range is not on a character boundary");
                continue;
            };
            if self.markup.get(range.clone()).is_none() {
                tracing::warn!(?range, "Patch range is out of bounds");
                continue;
            }

            patched.push_str(before);
            patched.push_str(&replacement);
            cursor = range.end;
            applied += 1;
        }

        if let Some(rest) = self.markup.get(cursor..) {
            patched.push_str(rest);
        }

        self.markup = patched;
        self.refresh(attribute);
        applied
    }

    /// マークアップから要素を検出し直す
    fn refresh(&mut self, attribute: &str) {
        self.elements = extract_tagged_elements(&self.markup, attribute).unwrap_or_else(|e| {
            tracing::error!("Failed to discover tagged elements: {e}");
            Vec::new()
        });

        let mut seen = HashSet::new();
        for element in &self.elements {
            if !seen.insert(element.key.as_str()) {
                tracing::warn!(key = %element.key, "Duplicate translation key in fragment");
            }
        }
    }
}
