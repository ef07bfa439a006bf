/// スペース取得Lambdaエントリポイント
///
/// GET /spaces/{id} を処理する。
///
/// # 環境変数
/// - SPACES_TABLE: スペース用DynamoDBテーブル名（必須）
use std::sync::Arc;

use lambda_http::{run, service_fn, Body, Error, Request, Response};
use spacefinder_backend::application::ReadSpaceHandler;
use spacefinder_backend::infrastructure::{
    init_logging, DynamoSpaceRepository, SpacesTableConfig,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Error> {
    // 構造化ログを初期化
    init_logging();

    info!("スペース取得Lambda関数を初期化");

    let config = SpacesTableConfig::from_env().await?;
    let repository = Arc::new(DynamoSpaceRepository::new(
        config.client().clone(),
        config.table_name().to_string(),
    ));
    let handler = ReadSpaceHandler::new(repository);

    run(service_fn(move |request: Request| {
        let handler = handler.clone();
        async move { Ok::<Response<Body>, Error>(handler.handle(request).await) }
    }))
    .await
}
