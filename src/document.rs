//! 文書モデル
//!
//! ブラウザの DOM の代わりに、サイドバーとコンテンツ領域の 2 つの断片を保持する。
//! 翻訳対象要素は属性（既定は `data-i18n`）で検出する。

/// Document errors
mod error;
/// Markup fragment
mod fragment;
/// Tagged element discovery
mod markup;

pub use error::DocumentError;
pub use fragment::Fragment;
pub use markup::{
    TaggedElement,
    escape_text,
    extract_tagged_elements,
};

use crate::page::{
    Page,
    SHELL_TEMPLATE,
    SIDEBAR_TEMPLATE,
};

/// 文書内の領域
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    /// ナビゲーション
    Sidebar,
    /// ページを差し込む領域
    Content,
}

/// 翻訳対象要素への参照
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementRef {
    /// 要素のある領域
    pub region: Region,
    /// 領域内の要素の位置（文書順）
    pub index: usize,
}

/// 翻訳パスに渡す要素のスナップショット
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementSnapshot<'a> {
    /// 要素への参照
    pub target: ElementRef,
    /// 翻訳キー
    pub key: &'a str,
    /// 現在の表示テキスト
    pub text: &'a str,
}

/// 要素に設定する内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    /// プレーンテキスト（エスケープして挿入）
    Text(String),
    /// マークアップ（そのまま挿入）
    Markup(String),
}

/// 1 要素分の更新
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentUpdate {
    /// 更新対象
    pub target: ElementRef,
    /// 翻訳キー（スナップショット取得後に文書が変わっていないかの確認用）
    pub key: String,
    /// 新しい内容
    pub content: Content,
}

/// 文書
#[derive(Debug, Clone)]
pub struct Document {
    /// 翻訳キーを持つ属性名
    attribute: String,
    /// サイドバー
    sidebar: Fragment,
    /// コンテンツ領域
    content: Fragment,
    /// 現在表示しているページ
    page: Option<Page>,
}

impl Document {
    /// 空の文書を作成
    #[must_use]
    pub fn new(attribute: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            sidebar: Fragment::new(),
            content: Fragment::new(),
            page: None,
        }
    }

    /// サイドバーを描画する（起動時に 1 度）
    pub fn mount_sidebar(&mut self) {
        self.sidebar.replace(SIDEBAR_TEMPLATE, &self.attribute);
    }

    /// ページをコンテンツ領域に描画する
    ///
    /// 以前の内容は必ず破棄される。
    pub fn render(&mut self, page: Page) {
        tracing::debug!(page = %page, "Rendering page");
        self.content.replace(page.template(), &self.attribute);
        self.page = Some(page);
    }

    /// ページ ID で描画する
    ///
    /// 未知の ID の場合はコンテンツ領域を空にして `None` を返す（エラーにはしない）。
    pub fn render_id(&mut self, id: &str) -> Option<Page> {
        if let Some(page) = Page::from_id(id) {
            self.render(page);
            Some(page)
        } else {
            tracing::debug!(page_id = id, "Unknown page id, clearing content region");
            self.clear_content();
            None
        }
    }

    /// コンテンツ領域を空にする
    pub fn clear_content(&mut self) {
        self.content.clear();
        self.page = None;
    }

    /// 現在のページ
    #[must_use]
    pub const fn current_page(&self) -> Option<Page> {
        self.page
    }

    /// 翻訳キーの属性名
    #[must_use]
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// サイドバー
    #[must_use]
    pub const fn sidebar(&self) -> &Fragment {
        &self.sidebar
    }

    /// コンテンツ領域
    #[must_use]
    pub const fn content(&self) -> &Fragment {
        &self.content
    }

    /// 領域の断片を取得
    const fn fragment(&self, region: Region) -> &Fragment {
        match region {
            Region::Sidebar => &self.sidebar,
            Region::Content => &self.content,
        }
    }

    /// 文書中の全翻訳対象要素のスナップショット（サイドバー → コンテンツの順）
    #[must_use]
    pub fn snapshot(&self) -> Vec<ElementSnapshot<'_>> {
        [Region::Sidebar, Region::Content]
            .into_iter()
            .flat_map(|region| {
                self.fragment(region).elements().iter().enumerate().map(move |(index, element)| {
                    ElementSnapshot {
                        target: ElementRef { region, index },
                        key: &element.key,
                        text: &element.text,
                    }
                })
            })
            .collect()
    }

    /// 更新を適用する
    ///
    /// 参照先がスナップショット取得後に変わっている更新は無視する。
    ///
    /// # Returns
    /// 実際に適用した数
    pub fn apply_updates(&mut self, updates: &[ContentUpdate]) -> usize {
        let mut applied = 0;

        for region in [Region::Sidebar, Region::Content] {
            let fragment = self.fragment(region);
            let patches: Vec<_> = updates
                .iter()
                .filter(|update| update.target.region == region)
                .filter_map(|update| {
                    let element = fragment.elements().get(update.target.index)?;
                    if element.key != update.key {
                        tracing::debug!(key = %update.key, "Stale update, element changed");
                        return None;
                    }
                    let replacement = match &update.content {
                        Content::Text(text) => escape_text(text),
                        Content::Markup(markup) => markup.clone(),
                    };
                    Some((element.content_range.clone(), replacement))
                })
                .collect();

            let fragment = match region {
                Region::Sidebar => &mut self.sidebar,
                Region::Content => &mut self.content,
            };
            applied += fragment.patch(patches, &self.attribute);
        }

        applied
    }

    /// キーで要素を検索（コンテンツ領域を優先）
    #[must_use]
    pub fn find(&self, key: &str) -> Option<&TaggedElement> {
        self.content.find(key).or_else(|| self.sidebar.find(key))
    }

    /// キーに対応する要素の表示テキスト
    #[must_use]
    pub fn text_of(&self, key: &str) -> Option<&str> {
        self.find(key).map(|element| element.text.as_str())
    }

    /// 外枠に埋め込んだ HTML 文書を生成
    #[must_use]
    pub fn to_html(&self, language: &str) -> String {
        let language = escape_text(language);
        let slots = [
            ("{{lang}}", language.as_str()),
            ("{{sidebar}}", self.sidebar.markup()),
            ("{{content}}", self.content.markup()),
        ];

        // 外枠だけを走査し、差し込んだ断片は再走査しない
        let mut html = String::with_capacity(
            SHELL_TEMPLATE.len() + slots.iter().map(|(_, value)| value.len()).sum::<usize>(),
        );
        let mut rest = SHELL_TEMPLATE;
        for (placeholder, value) in slots {
            if let Some((before, after)) = rest.split_once(placeholder) {
                html.push_str(before);
                html.push_str(value);
                rest = after;
            }
        }
        html.push_str(rest);
        html
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::collections::BTreeSet;

    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;

    fn document() -> Document {
        let mut document = Document::new("data-i18n");
        document.mount_sidebar();
        document
    }

    fn content_keys(document: &Document) -> Vec<&str> {
        document.content().elements().iter().map(|e| e.key.as_str()).collect()
    }

    #[rstest]
    #[case(Page::Home)]
    #[case(Page::Todo)]
    #[case(Page::UsefulInfo)]
    #[case(Page::Contact)]
    #[case(Page::Faq)]
    fn test_render_matches_template(#[case] page: Page) {
        let mut document = document();

        document.render(page);

        let expected: Vec<_> = extract_tagged_elements(page.template(), "data-i18n")
            .unwrap()
            .into_iter()
            .map(|e| e.key)
            .collect();
        assert!(!expected.is_empty());
        assert_eq!(content_keys(&document), expected);
        assert_eq!(document.current_page(), Some(page));
        assert_eq!(document.content().markup(), page.template());
    }

    #[rstest]
    #[case(Page::Home)]
    #[case(Page::Todo)]
    #[case(Page::UsefulInfo)]
    #[case(Page::Contact)]
    #[case(Page::Faq)]
    fn test_template_keys_are_unique(#[case] page: Page) {
        let elements = extract_tagged_elements(page.template(), "data-i18n").unwrap();
        let unique: BTreeSet<_> = elements.iter().map(|e| e.key.as_str()).collect();

        assert_eq!(unique.len(), elements.len());
    }

    #[googletest::test]
    fn test_render_todo_elements() {
        let mut document = document();

        document.render(Page::Todo);

        expect_that!(content_keys(&document), eq(&vec!["todo_list", "todo1", "todo2", "todo3"]));
        expect_that!(document.text_of("todo2"), some(eq("Task 2")));
    }

    #[googletest::test]
    fn test_render_home_counts() {
        let mut document = document();

        document.render(Page::Home);

        // 見出し 1 + 段落 2 + 連絡先見出し 1 + メンバー 4 人 × 6
        expect_that!(document.content().elements().len(), eq(28));
        expect_that!(document.text_of("welcome_message"), some(eq("Welcome to Our Website!")));
    }

    #[googletest::test]
    fn test_render_unknown_id_clears_region() {
        let mut document = document();
        document.render(Page::Home);

        let page = document.render_id("does-not-exist");

        expect_that!(page, none());
        expect_that!(document.current_page(), none());
        expect_that!(document.content().is_empty(), eq(true));
        expect_that!(document.content().elements().is_empty(), eq(true));
        // サイドバーは残る
        expect_that!(document.sidebar().is_empty(), eq(false));
    }

    #[googletest::test]
    fn test_render_id_alias() {
        let mut document = document();

        let page = document.render_id("todo-list");

        expect_that!(page, some(eq(Page::Todo)));
    }

    #[googletest::test]
    fn test_snapshot_covers_sidebar_and_content() {
        let mut document = document();
        document.render(Page::Contact);

        let snapshot = document.snapshot();
        let keys: Vec<_> = snapshot.iter().map(|s| s.key).collect();

        expect_that!(
            keys,
            eq(&vec![
                "nav_home",
                "nav_todo",
                "nav_useful_info",
                "nav_contact",
                "nav_faq",
                "contact-h1",
                "contact-paragraph"
            ])
        );
        expect_that!(snapshot[5].target, eq(ElementRef { region: Region::Content, index: 0 }));
    }

    #[googletest::test]
    fn test_apply_updates_text_is_escaped() {
        let mut document = document();
        document.render(Page::Faq);
        let update = ContentUpdate {
            target: ElementRef { region: Region::Content, index: 0 },
            key: "faq-h1".to_string(),
            content: Content::Text("<b>FAQ</b>".to_string()),
        };

        let applied = document.apply_updates(&[update]);

        expect_that!(applied, eq(1));
        expect_that!(document.content().markup(), contains_substring("&lt;b&gt;FAQ&lt;/b&gt;"));
        expect_that!(document.text_of("faq-h1"), some(eq("<b>FAQ</b>")));
    }

    #[googletest::test]
    fn test_apply_updates_markup_is_inserted() {
        let mut document = document();
        document.render(Page::Faq);
        let update = ContentUpdate {
            target: ElementRef { region: Region::Content, index: 1 },
            key: "faq-paragraph".to_string(),
            content: Content::Markup("See <a href=\"#\">here</a>".to_string()),
        };

        document.apply_updates(&[update]);

        expect_that!(document.content().markup(), contains_substring("See <a href=\"#\">here</a>"));
        expect_that!(document.text_of("faq-paragraph"), some(eq("See here")));
    }

    #[googletest::test]
    fn test_apply_updates_ignores_stale_target() {
        let mut document = document();
        document.render(Page::Faq);
        let update = ContentUpdate {
            target: ElementRef { region: Region::Content, index: 0 },
            key: "todo_list".to_string(),
            content: Content::Text("stale".to_string()),
        };

        let applied = document.apply_updates(&[update]);

        expect_that!(applied, eq(0));
        expect_that!(document.text_of("faq-h1"), some(eq("FAQ")));
    }

    #[googletest::test]
    fn test_to_html_embeds_fragments() {
        let mut document = document();
        document.render(Page::Todo);

        let html = document.to_html("sk");

        expect_that!(html, contains_substring("<html lang=\"sk\">"));
        expect_that!(html, contains_substring("data-i18n=\"nav_home\""));
        expect_that!(html, contains_substring("<li data-i18n=\"todo1\">Task 1</li>"));
        expect_that!(html, not(contains_substring("{{")));
    }

    #[googletest::test]
    fn test_to_html_does_not_rescan_inserted_text() {
        let mut document = document();
        document.render(Page::Todo);
        let target = document.snapshot().iter().find(|e| e.key == "nav_faq").unwrap().target;
        let update = ContentUpdate {
            target,
            key: "nav_faq".to_string(),
            content: Content::Text("Help {{content}}".to_string()),
        };
        document.apply_updates(&[update]);

        let html = document.to_html("cz");
        let (sidebar, main) = html.split_once("<main").unwrap();

        expect_that!(sidebar, contains_substring("Help {{content}}"));
        expect_that!(sidebar, not(contains_substring("todo1")));
        expect_that!(main, contains_substring("<li data-i18n=\"todo1\">Task 1</li>"));
    }
}
