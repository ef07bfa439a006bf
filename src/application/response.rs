// レスポンス構築モジュール
//
// 全ハンドラー共通のレスポンスエンベロープを提供する。
// ブラウザクライアントから利用できるよう、成功・失敗を問わず
// すべてのレスポンスにCORSヘッダーを付与する。

use lambda_http::http::header::{
    HeaderMap, HeaderValue, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    CONTENT_TYPE,
};
use lambda_http::{Body, Response};
use serde::{Deserialize, Serialize};

use crate::infrastructure::space_repository::SpaceRepositoryError;

/// エラーレスポンスのボディ
///
/// JSON形式で`error`（エラー種別）と`message`（詳細メッセージ）を含む。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    /// エラー種別（例: "invalid_input", "missing_value", "not_found"）
    pub error: String,
    /// 詳細なエラーメッセージ
    pub message: String,
}

/// 全レスポンス共通のヘッダーを生成
///
/// - Content-Type: application/json
/// - Access-Control-Allow-Origin: *
/// - Access-Control-Allow-Methods: *
pub fn build_cors_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();

    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static("*"));

    headers
}

/// JSONボディ付きレスポンスを構築
///
/// CORSヘッダーを常に付与する。
pub fn json_response(status: u16, body: String) -> Response<Body> {
    let mut response = Response::builder()
        .status(status)
        .body(Body::Text(body))
        .expect("レスポンスの構築に失敗");

    *response.headers_mut() = build_cors_headers();

    response
}

/// エラーレスポンスを構築
pub fn error_response(status: u16, error: &str, message: impl Into<String>) -> Response<Body> {
    let body = ErrorBody {
        error: error.to_string(),
        message: message.into(),
    };
    let json = serde_json::to_string(&body).expect("エラーボディのシリアライズに失敗");
    json_response(status, json)
}

/// 不正入力（400）レスポンスを構築
///
/// リクエストの形が不正（ID・ボディの欠落、JSONとして解釈不能）な場合に使う。
pub fn invalid_input_response() -> Response<Body> {
    error_response(400, "invalid_input", "Error, invalid input!")
}

/// リポジトリエラーをレスポンスへ変換
///
/// `MissingValue`は403、それ以外（NotFound・Conflictを含む）は
/// すべて500として返す。
pub fn repository_error_response(error: &SpaceRepositoryError) -> Response<Body> {
    let status = match error {
        SpaceRepositoryError::MissingValue(_) => 403,
        _ => 500,
    };
    error_response(status, error_kind(error), error.to_string())
}

/// リポジトリエラーの種別文字列を返す
fn error_kind(error: &SpaceRepositoryError) -> &'static str {
    match error {
        SpaceRepositoryError::MissingValue(_) => "missing_value",
        SpaceRepositoryError::InvalidFormat(_) => "invalid_format",
        SpaceRepositoryError::Conflict(_) => "conflict",
        SpaceRepositoryError::NotFound(_) => "not_found",
        SpaceRepositoryError::WriteError(_) => "write_error",
        SpaceRepositoryError::ReadError(_) => "read_error",
        SpaceRepositoryError::SerializationError(_) => "serialization_error",
    }
}
