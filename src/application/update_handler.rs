// スペース更新ハンドラー
//
// PUT /spaces を処理する。更新対象のIDはパスまたはクエリで指定し、
// ボディの指定フィールドだけを既存レコードへマージする。
// 空文字列のname/locationは403、ID・ボディ欠落は400、それ以外の失敗は500。

use std::sync::Arc;

use lambda_http::{Body, Request, Response};
use tracing::{info, warn};

use crate::application::request::{decode_json_body, path_parameter, query_parameter};
use crate::application::response::{
    invalid_input_response, json_response, repository_error_response,
};
use crate::domain::SpaceUpdate;
use crate::infrastructure::SpaceRepository;

/// スペース更新ハンドラー
#[derive(Clone)]
pub struct UpdateSpaceHandler {
    /// スペースリポジトリ
    repository: Arc<dyn SpaceRepository>,
}

impl UpdateSpaceHandler {
    /// 新しいハンドラーを作成
    pub fn new(repository: Arc<dyn SpaceRepository>) -> Self {
        Self { repository }
    }

    /// PUTリクエストを処理してレスポンスを生成
    pub async fn handle(&self, request: Request) -> Response<Body> {
        // IDはパスパラメータ優先、なければクエリパラメータ
        let id = path_parameter(&request, "id").or_else(|| query_parameter(&request, "id"));
        let Some(id) = id else {
            warn!("パラメータidがありません");
            return invalid_input_response();
        };

        let body = match decode_json_body(&request) {
            Ok(Some(body)) => body,
            Ok(None) => {
                warn!("リクエストボディがありません");
                return invalid_input_response();
            }
            Err(error) => {
                warn!(error = %error, "リクエストボディの解釈に失敗");
                return invalid_input_response();
            }
        };

        let update: SpaceUpdate = match serde_json::from_value(body) {
            Ok(update) => update,
            Err(error) => {
                warn!(error = %error, "更新入力のデコードに失敗");
                return invalid_input_response();
            }
        };

        match self.repository.update(&id, update).await {
            Ok(space) => {
                info!(space_id = %space.id, "スペースを更新");
                let json = serde_json::to_string(&space).expect("スペースのシリアライズに失敗");
                json_response(200, json)
            }
            Err(error) => {
                warn!(error = %error, space_id = %id, "スペース更新に失敗");
                repository_error_response(&error)
            }
        }
    }
}
