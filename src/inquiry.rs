//! 問い合わせフォーム
//!
//! 送信内容はログに記録するだけで、配送は行わない。

use serde::{
    Deserialize,
    Serialize,
};

/// 送信完了メッセージ
pub const ACKNOWLEDGEMENT_MESSAGE: &str = "Your question has been submitted!";

/// フォームの入力内容
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Inquiry {
    /// 返信先
    pub email: String,
    /// 質問
    pub question: String,
    /// 返信の希望言語（`cz` / `sk` / `esp` / `en`）
    pub preferred_language: String,
}

/// 送信結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Acknowledgement {
    /// 利用者に表示するメッセージ
    pub message: String,
}

impl Acknowledgement {
    /// 送信完了
    #[must_use]
    pub fn submitted() -> Self {
        Self { message: ACKNOWLEDGEMENT_MESSAGE.to_string() }
    }
}

/// 問い合わせを記録する
pub(crate) fn record(inquiry: &Inquiry, active_language: &str) -> Acknowledgement {
    tracing::info!(
        email = %inquiry.email,
        preferred_language = %inquiry.preferred_language,
        active_language,
        question = %inquiry.question,
        "Inquiry submitted"
    );
    Acknowledgement::submitted()
}
