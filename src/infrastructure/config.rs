// 接続設定モジュール
//
// 環境変数からDynamoDBクライアントとCognito設定を組み立てる。
// クライアントは各Lambdaのプロセス起動時に一度だけ構築し、
// ハンドラーへ明示的に注入する。
use aws_sdk_dynamodb::Client as DynamoDbClient;
use thiserror::Error;

/// 設定読み込みのエラー型
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
}

/// スペーステーブルのDynamoDB設定
///
/// テーブル名は環境変数`SPACES_TABLE`で設定する。
#[derive(Debug, Clone)]
pub struct SpacesTableConfig {
    /// DynamoDBクライアントインスタンス
    client: DynamoDbClient,
    /// スペーステーブル名
    table_name: String,
}

impl SpacesTableConfig {
    /// 環境からAWS設定を読み込み、環境変数からテーブル名を読み取って新しい設定を作成
    ///
    /// 環境変数:
    /// - AWS認証情報: aws-configにより自動読み込み
    /// - SPACES_TABLE: スペース用DynamoDBテーブル名
    pub async fn from_env() -> Result<Self, ConfigError> {
        // 環境からAWS設定を読み込み（認証情報、リージョンなど）
        let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;

        // AWS設定からDynamoDBクライアントを作成
        let client = DynamoDbClient::new(&aws_config);

        let table_name = std::env::var("SPACES_TABLE")
            .map_err(|_| ConfigError::MissingEnvVar("SPACES_TABLE".to_string()))?;

        Ok(Self { client, table_name })
    }

    /// 明示的な値で新しい設定を作成（テスト用）
    pub fn new(client: DynamoDbClient, table_name: String) -> Self {
        Self { client, table_name }
    }

    /// DynamoDBクライアントへの参照を取得
    pub fn client(&self) -> &DynamoDbClient {
        &self.client
    }

    /// スペーステーブル名を取得
    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}

/// Cognito認証の設定
///
/// ユーザープールでのサインインと、アイデンティティプールでの
/// 一時クレデンシャル交換に必要な識別子を保持する。
#[derive(Debug, Clone)]
pub struct CognitoConfig {
    /// ユーザープールのリージョン
    region: String,
    /// CognitoユーザープールID
    user_pool_id: String,
    /// ユーザープールアプリクライアントID
    app_client_id: String,
    /// CognitoアイデンティティプールID
    identity_pool_id: String,
}

impl CognitoConfig {
    /// 環境変数から新しい設定を作成
    ///
    /// 環境変数:
    /// - AWS_REGION: ユーザープールのリージョン（Lambda環境では自動設定）
    /// - USER_POOL_ID: CognitoユーザープールID
    /// - APP_CLIENT_ID: ユーザープールアプリクライアントID
    /// - IDENTITY_POOL_ID: CognitoアイデンティティプールID
    pub fn from_env() -> Result<Self, ConfigError> {
        let region = std::env::var("AWS_REGION")
            .map_err(|_| ConfigError::MissingEnvVar("AWS_REGION".to_string()))?;
        let user_pool_id = std::env::var("USER_POOL_ID")
            .map_err(|_| ConfigError::MissingEnvVar("USER_POOL_ID".to_string()))?;
        let app_client_id = std::env::var("APP_CLIENT_ID")
            .map_err(|_| ConfigError::MissingEnvVar("APP_CLIENT_ID".to_string()))?;
        let identity_pool_id = std::env::var("IDENTITY_POOL_ID")
            .map_err(|_| ConfigError::MissingEnvVar("IDENTITY_POOL_ID".to_string()))?;

        Ok(Self {
            region,
            user_pool_id,
            app_client_id,
            identity_pool_id,
        })
    }

    /// 明示的な値で新しい設定を作成（テスト用）
    pub fn new(
        region: String,
        user_pool_id: String,
        app_client_id: String,
        identity_pool_id: String,
    ) -> Self {
        Self {
            region,
            user_pool_id,
            app_client_id,
            identity_pool_id,
        }
    }

    /// アプリクライアントIDを取得
    pub fn app_client_id(&self) -> &str {
        &self.app_client_id
    }

    /// アイデンティティプールIDを取得
    pub fn identity_pool_id(&self) -> &str {
        &self.identity_pool_id
    }

    /// アイデンティティプールのログインマップで使うプロバイダー名を取得
    ///
    /// 形式: `cognito-idp.<region>.amazonaws.com/<user_pool_id>`
    pub fn user_pool_provider_name(&self) -> String {
        format!(
            "cognito-idp.{}.amazonaws.com/{}",
            self.region, self.user_pool_id
        )
    }
}
