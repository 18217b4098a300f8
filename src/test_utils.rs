//! テスト用ユーティリティ関数
//!
//! 複数のテストモジュールで使用される共通のヘルパー関数を提供します。
#![cfg(test)]
#![allow(clippy::unwrap_used)]

use tokio::io::{
    AsyncReadExt,
    AsyncWriteExt,
};
use tokio::net::TcpListener;

use crate::localization::{
    HttpSource,
    MemorySource,
};

/// 同梱の辞書（`languages/*.json`）
const BUNDLED_DICTIONARIES: [(&str, &str); 4] = [
    ("cz", include_str!("../languages/cz.json")),
    ("sk", include_str!("../languages/sk.json")),
    ("esp", include_str!("../languages/esp.json")),
    ("en", include_str!("../languages/en.json")),
];

/// 同梱の辞書をすべて持つ取得元を作成する
///
/// # Returns
/// `cz` / `sk` / `esp` / `en` を返す `MemorySource`
pub(crate) fn bundled_source() -> MemorySource {
    BUNDLED_DICTIONARIES
        .iter()
        .fold(MemorySource::new(), |source, (language, body)| source.with(language, *body))
}

/// 常に同じ応答を返すローカル HTTP サーバーを起動する
///
/// # Arguments
/// * `status` - ステータス行（例: "404 Not Found"）
/// * `body` - 応答本文
///
/// # Returns
/// サーバーの `languages` ディレクトリを指す `HttpSource`（プロキシは使わない）
pub(crate) async fn serve_http(status: &'static str, body: &'static str) -> HttpSource {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            let mut request = Vec::new();
            let mut buffer = [0u8; 1024];
            while !request.windows(4).any(|window| window == b"\r\n\r\n") {
                match stream.read(&mut buffer).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(buffer.get(..n).unwrap_or_default()),
                }
            }

            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\n\
                 Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = stream.write_all(response.as_bytes()).await;
            let _ = stream.shutdown().await;
        }
    });

    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    HttpSource::with_client(client, &format!("http://{address}/languages/"))
}
