//! ページ定義（Content Registry）
//!
//! ページ ID と静的テンプレートの 1:1 対応を閉じた enum で表現する。

use std::fmt;

/// サイトのページ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    /// トップページ（問い合わせフォームとチーム紹介）
    Home,
    /// やることリスト
    Todo,
    /// 留学に役立つ情報
    UsefulInfo,
    /// 連絡先
    Contact,
    /// よくある質問
    Faq,
}

impl Page {
    /// 全ページ（サイドバーの並び順）
    pub const ALL: [Self; 5] = [Self::Home, Self::Todo, Self::UsefulInfo, Self::Contact, Self::Faq];

    /// ページ ID からページを解決する
    ///
    /// 未知の ID は `None`。`todo-list` も `Todo` として扱う。
    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "home" => Some(Self::Home),
            "todo" | "todo-list" => Some(Self::Todo),
            "useful-info" => Some(Self::UsefulInfo),
            "contact" => Some(Self::Contact),
            "faq" => Some(Self::Faq),
            _ => None,
        }
    }

    /// 正規のページ ID
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Todo => "todo",
            Self::UsefulInfo => "useful-info",
            Self::Contact => "contact",
            Self::Faq => "faq",
        }
    }

    /// ページのテンプレート（マークアップ）
    #[must_use]
    pub const fn template(self) -> &'static str {
        match self {
            Self::Home => include_str!("../pages/home.html"),
            Self::Todo => include_str!("../pages/todo.html"),
            Self::UsefulInfo => include_str!("../pages/useful-info.html"),
            Self::Contact => include_str!("../pages/contact.html"),
            Self::Faq => include_str!("../pages/faq.html"),
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// サイドバー（ロゴ・ナビゲーション・言語切り替え）のテンプレート
pub const SIDEBAR_TEMPLATE: &str = include_str!("../pages/sidebar.html");

/// ページ全体の外枠
///
/// `{{lang}}` / `{{sidebar}}` / `{{content}}` を置換して使う。
pub const SHELL_TEMPLATE: &str = include_str!("../pages/index.html");
