// スペース取得ハンドラー
//
// GET /spaces/{id} を処理する。パスパラメータ`id`は必須。
// 存在しないIDはストアエラーと区別せず500で返す。

use std::sync::Arc;

use lambda_http::{Body, Request, Response};
use tracing::{info, warn};

use crate::application::request::path_parameter;
use crate::application::response::{
    invalid_input_response, json_response, repository_error_response,
};
use crate::infrastructure::{SpaceRepository, SpaceRepositoryError};

/// スペース取得ハンドラー
#[derive(Clone)]
pub struct ReadSpaceHandler {
    /// スペースリポジトリ
    repository: Arc<dyn SpaceRepository>,
}

impl ReadSpaceHandler {
    /// 新しいハンドラーを作成
    pub fn new(repository: Arc<dyn SpaceRepository>) -> Self {
        Self { repository }
    }

    /// GETリクエストを処理してレスポンスを生成
    pub async fn handle(&self, request: Request) -> Response<Body> {
        let Some(id) = path_parameter(&request, "id") else {
            warn!("パスパラメータidがありません");
            return invalid_input_response();
        };

        info!(space_id = %id, "スペースを取得");

        match self.repository.get(&id).await {
            Ok(Some(space)) => {
                let json = serde_json::to_string(&space).expect("スペースのシリアライズに失敗");
                json_response(200, json)
            }
            Ok(None) => {
                warn!(space_id = %id, "スペースが見つかりません");
                repository_error_response(&SpaceRepositoryError::NotFound(id))
            }
            Err(error) => {
                warn!(error = %error, "スペース取得に失敗");
                repository_error_response(&error)
            }
        }
    }
}
