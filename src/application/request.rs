// リクエスト解釈モジュール
//
// 受信イベントのボディは生のJSONテキストとしてもバイナリとしても届きうる。
// バリデーションの前に必ず一つの構造化形式（`serde_json::Value`）へ
// 正規化してから扱う。

use lambda_http::{Body, Request, RequestExt};
use serde_json::Value;
use thiserror::Error;

/// ボディデコードのエラー型
#[derive(Debug, Error)]
pub enum BodyDecodeError {
    /// ボディがJSONとして解釈できない
    #[error("Request body is not valid JSON: {0}")]
    InvalidJson(String),
}

/// リクエストボディを構造化形式へ正規化する
///
/// # Returns
/// * `Ok(Some(Value))` - デコード済みのJSON
/// * `Ok(None)` - ボディなし（空ボディ・空白のみを含む）
/// * `Err(BodyDecodeError)` - JSONとして解釈できない
pub fn decode_json_body(request: &Request) -> Result<Option<Value>, BodyDecodeError> {
    match request.body() {
        Body::Empty => Ok(None),
        Body::Text(text) => {
            if text.trim().is_empty() {
                return Ok(None);
            }
            serde_json::from_str(text)
                .map(Some)
                .map_err(|e| BodyDecodeError::InvalidJson(e.to_string()))
        }
        Body::Binary(bytes) => {
            if bytes.is_empty() {
                return Ok(None);
            }
            serde_json::from_slice(bytes)
                .map(Some)
                .map_err(|e| BodyDecodeError::InvalidJson(e.to_string()))
        }
        // `Body` is `#[non_exhaustive]` upstream; no current variant reaches here.
        _ => Ok(None),
    }
}

/// クエリ文字列パラメータを取得する
pub fn query_parameter(request: &Request, name: &str) -> Option<String> {
    request
        .query_string_parameters_ref()
        .and_then(|params| params.first(name))
        .map(str::to_string)
}

/// パスパラメータを取得する
pub fn path_parameter(request: &Request, name: &str) -> Option<String> {
    request
        .path_parameters_ref()
        .and_then(|params| params.first(name))
        .map(str::to_string)
}
