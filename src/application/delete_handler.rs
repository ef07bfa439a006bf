// スペース削除ハンドラー
//
// DELETE /spaces/{id} を処理する。削除は即時かつ不可逆で、
// 成功時は削除したレコードを返す。存在しないIDは500。

use std::sync::Arc;

use lambda_http::{Body, Request, Response};
use tracing::{info, warn};

use crate::application::request::path_parameter;
use crate::application::response::{
    invalid_input_response, json_response, repository_error_response,
};
use crate::infrastructure::SpaceRepository;

/// スペース削除ハンドラー
#[derive(Clone)]
pub struct DeleteSpaceHandler {
    /// スペースリポジトリ
    repository: Arc<dyn SpaceRepository>,
}

impl DeleteSpaceHandler {
    /// 新しいハンドラーを作成
    pub fn new(repository: Arc<dyn SpaceRepository>) -> Self {
        Self { repository }
    }

    /// DELETEリクエストを処理してレスポンスを生成
    pub async fn handle(&self, request: Request) -> Response<Body> {
        let Some(id) = path_parameter(&request, "id") else {
            warn!("パスパラメータidがありません");
            return invalid_input_response();
        };

        match self.repository.remove(&id).await {
            Ok(space) => {
                info!(space_id = %space.id, "スペースを削除");
                let json = serde_json::to_string(&space).expect("スペースのシリアライズに失敗");
                json_response(200, json)
            }
            Err(error) => {
                warn!(error = %error, space_id = %id, "スペース削除に失敗");
                repository_error_response(&error)
            }
        }
    }
}
