/// 認証フロー確認用CLIスクリプト
///
/// ユーザープールへのサインインと一時クレデンシャル交換を
/// エンドツーエンドで実行し、結果を表示する。
///
/// # 環境変数
/// - AWS_REGION: ユーザープールのリージョン（必須）
/// - USER_POOL_ID: CognitoユーザープールID（必須）
/// - APP_CLIENT_ID: ユーザープールアプリクライアントID（必須）
/// - IDENTITY_POOL_ID: CognitoアイデンティティプールID（必須）
///
/// # ローカル実行
/// ```bash
/// export AWS_REGION=eu-central-1
/// export USER_POOL_ID=eu-central-1_XXXXXXXXX
/// export APP_CLIENT_ID=your-app-client-id
/// export IDENTITY_POOL_ID=eu-central-1:your-identity-pool-id
///
/// cargo run --bin auth_debug -- --username alice --password secret
/// ```
use clap::Parser;
use lambda_http::Error;
use spacefinder_backend::infrastructure::{init_logging, CognitoAuthService, CognitoConfig};
use tracing::info;

/// コマンドライン引数
#[derive(Parser, Debug)]
#[command(name = "auth_debug")]
#[command(about = "Cognitoサインインと一時クレデンシャル交換の動作確認")]
struct CliArgs {
    /// サインインするユーザー名
    #[arg(long, short = 'u')]
    username: String,

    /// パスワード
    #[arg(long, short = 'p')]
    password: String,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // 構造化ログを初期化
    init_logging();

    let args = CliArgs::parse();
    let config = CognitoConfig::from_env()?;

    // 各クライアントはプロセス起動時に一度だけ構築する
    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let idp_client = aws_sdk_cognitoidentityprovider::Client::new(&aws_config);
    let identity_client = aws_sdk_cognitoidentity::Client::new(&aws_config);

    let auth_service = CognitoAuthService::new(idp_client, identity_client, config);

    // サインインしてIDトークンを取得
    let id_token = auth_service.login(&args.username, &args.password).await?;
    info!("サインイン成功");

    // IDトークンを一時クレデンシャルへ交換
    let credentials = auth_service.get_temporary_credentials(&id_token).await?;

    info!(
        access_key_id = %credentials.access_key_id,
        expiration_epoch_seconds = ?credentials.expiration_epoch_seconds,
        "一時クレデンシャルを取得"
    );
    println!("access_key_id: {}", credentials.access_key_id);
    println!(
        "expiration_epoch_seconds: {}",
        credentials
            .expiration_epoch_seconds
            .map(|secs| secs.to_string())
            .unwrap_or_else(|| "-".to_string())
    );

    Ok(())
}
