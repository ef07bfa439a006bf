// スペース作成ハンドラー
//
// POST /spaces を処理する。ボディを構造化形式へ正規化してから
// 作成入力としてデコードし、リポジトリへ渡す。
// 必須フィールド欠落は403、ボディ欠落・JSON不正は400、それ以外の失敗は500。

use std::sync::Arc;

use lambda_http::{Body, Request, Response};
use tracing::{info, warn};

use crate::application::request::decode_json_body;
use crate::application::response::{
    invalid_input_response, json_response, repository_error_response,
};
use crate::domain::SpaceDraft;
use crate::infrastructure::SpaceRepository;

/// スペース作成ハンドラー
#[derive(Clone)]
pub struct CreateSpaceHandler {
    /// スペースリポジトリ
    repository: Arc<dyn SpaceRepository>,
}

impl CreateSpaceHandler {
    /// 新しいハンドラーを作成
    pub fn new(repository: Arc<dyn SpaceRepository>) -> Self {
        Self { repository }
    }

    /// POSTリクエストを処理してレスポンスを生成
    pub async fn handle(&self, request: Request) -> Response<Body> {
        // ボディを構造化形式へ正規化してからデコードする
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

        let draft: SpaceDraft = match serde_json::from_value(body) {
            Ok(draft) => draft,
            Err(error) => {
                warn!(error = %error, "作成入力のデコードに失敗");
                return invalid_input_response();
            }
        };

        match self.repository.create(draft).await {
            Ok(space) => {
                info!(space_id = %space.id, name = %space.name, "スペースを作成");
                let json = serde_json::to_string(&space).expect("スペースのシリアライズに失敗");
                json_response(200, json)
            }
            Err(error) => {
                warn!(error = %error, "スペース作成に失敗");
                repository_error_response(&error)
            }
        }
    }
}
