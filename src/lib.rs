//! studium-site
//!
//! スペインへの留学を案内する多言語サイト。ページの断片をコンテンツ領域に差し込み、
//! 言語ごとの辞書で翻訳対象要素を書き換える。

pub mod config;
pub mod document;
pub mod inquiry;
pub mod localization;
pub mod page;
pub mod preference;
pub mod site;
pub mod types;

mod test_utils;

pub use site::{
    Site,
    SiteError,
};
