// スペース一覧ハンドラー
//
// GET /spaces を処理する。クエリパラメータ`id`または`location`で
// 絞り込み、どちらもなければ全件を返す。両方ある場合は`id`が優先。

use std::sync::Arc;

use lambda_http::{Body, Request, Response};
use tracing::{info, warn};

use crate::application::request::query_parameter;
use crate::application::response::{json_response, repository_error_response};
use crate::infrastructure::SpaceRepository;

/// スペース一覧ハンドラー
#[derive(Clone)]
pub struct ListSpacesHandler {
    /// スペースリポジトリ
    repository: Arc<dyn SpaceRepository>,
}

impl ListSpacesHandler {
    /// 新しいハンドラーを作成
    pub fn new(repository: Arc<dyn SpaceRepository>) -> Self {
        Self { repository }
    }

    /// GETリクエストを処理してレスポンスを生成
    ///
    /// 結果は常にJSON配列。ID指定時は0件または1件の配列になる。
    pub async fn handle(&self, request: Request) -> Response<Body> {
        let id = query_parameter(&request, "id");
        let location = query_parameter(&request, "location");

        let result = if let Some(id) = id {
            info!(space_id = %id, "ID指定でスペースを検索");
            self.repository
                .get(&id)
                .await
                .map(|space| space.into_iter().collect::<Vec<_>>())
        } else if let Some(location) = location {
            info!(location = %location, "所在地でスペースを検索");
            self.repository.find_by_location(&location).await
        } else {
            info!("全スペースを列挙");
            self.repository.scan().await
        };

        match result {
            Ok(spaces) => {
                let json =
                    serde_json::to_string(&spaces).expect("スペース一覧のシリアライズに失敗");
                json_response(200, json)
            }
            Err(error) => {
                warn!(error = %error, "スペース一覧の取得に失敗");
                repository_error_response(&error)
            }
        }
    }
}
