// Cognito認証と一時クレデンシャル交換モジュール
//
// ユーザープールへのサインインでIDトークンを取得し、
// アイデンティティプール経由でスコープ付きの一時クレデンシャルに交換する。
// 交換はワンショットで、セッションキャッシュは持たない。
// 取得（リフレッシュ相当）の失敗はそのままエラーとして伝播する。

use aws_sdk_cognitoidentity::Client as CognitoIdentityClient;
use aws_sdk_cognitoidentityprovider::types::AuthFlowType;
use aws_sdk_cognitoidentityprovider::Client as CognitoIdpClient;
use thiserror::Error;
use tracing::info;

use crate::infrastructure::config::CognitoConfig;

/// 認証・クレデンシャル交換のエラー型
#[derive(Debug, Error)]
pub enum CredentialsError {
    /// サインインに失敗
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// サインイン結果にIDトークンが含まれない
    #[error("Sign-in response did not include an ID token")]
    MissingIdToken,

    /// アイデンティティIDの解決に失敗
    #[error("Identity lookup failed: {0}")]
    IdentityLookupFailed(String),

    /// 一時クレデンシャルの取得に失敗
    #[error("Credential exchange failed: {0}")]
    ExchangeFailed(String),

    /// 取得したクレデンシャルに必須フィールドが欠けている
    #[error("Received incomplete credentials")]
    IncompleteCredentials,
}

/// 一時クレデンシャル
///
/// アイデンティティプールが発行する短命のアクセスキーセット。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemporaryCredentials {
    /// アクセスキーID
    pub access_key_id: String,
    /// シークレットアクセスキー
    pub secret_access_key: String,
    /// セッショントークン
    pub session_token: String,
    /// 失効時刻（UNIXエポック秒）
    pub expiration_epoch_seconds: Option<i64>,
}

impl TemporaryCredentials {
    /// SDKのクレデンシャル型から変換する
    ///
    /// 必須3フィールドのいずれかが欠けている場合は
    /// `IncompleteCredentials`を返す。
    fn try_from_sdk(
        credentials: &aws_sdk_cognitoidentity::types::Credentials,
    ) -> Result<Self, CredentialsError> {
        let access_key_id = credentials
            .access_key_id()
            .ok_or(CredentialsError::IncompleteCredentials)?
            .to_string();
        let secret_access_key = credentials
            .secret_key()
            .ok_or(CredentialsError::IncompleteCredentials)?
            .to_string();
        let session_token = credentials
            .session_token()
            .ok_or(CredentialsError::IncompleteCredentials)?
            .to_string();

        Ok(Self {
            access_key_id,
            secret_access_key,
            session_token,
            expiration_epoch_seconds: credentials.expiration().map(|dt| dt.secs()),
        })
    }
}

/// Cognito認証サービス
///
/// ユーザープールでのサインインと、フェデレーテッドアイデンティティによる
/// 一時クレデンシャル交換を提供する。
pub struct CognitoAuthService {
    /// ユーザープールクライアント（サインイン用）
    idp_client: CognitoIdpClient,
    /// アイデンティティプールクライアント（クレデンシャル交換用）
    identity_client: CognitoIdentityClient,
    /// Cognito設定
    config: CognitoConfig,
}

impl CognitoAuthService {
    /// 新しいCognitoAuthServiceを作成
    pub fn new(
        idp_client: CognitoIdpClient,
        identity_client: CognitoIdentityClient,
        config: CognitoConfig,
    ) -> Self {
        Self {
            idp_client,
            identity_client,
            config,
        }
    }

    /// ユーザー名とパスワードでサインインし、IDトークンを返す
    ///
    /// USER_PASSWORD_AUTHフローを使用する。追加チャレンジ
    /// （パスワード変更要求など）には対応しない。
    pub async fn login(
        &self,
        user_name: &str,
        password: &str,
    ) -> Result<String, CredentialsError> {
        info!(user_name = user_name, "ユーザープールへサインイン");

        let result = self
            .idp_client
            .initiate_auth()
            .auth_flow(AuthFlowType::UserPasswordAuth)
            .client_id(self.config.app_client_id())
            .auth_parameters("USERNAME", user_name)
            .auth_parameters("PASSWORD", password)
            .send()
            .await
            .map_err(|e| {
                CredentialsError::AuthenticationFailed(e.into_service_error().to_string())
            })?;

        result
            .authentication_result()
            .and_then(|auth| auth.id_token())
            .map(str::to_string)
            .ok_or(CredentialsError::MissingIdToken)
    }

    /// IDトークンを一時クレデンシャルに交換する
    ///
    /// アイデンティティプールでアイデンティティIDを解決し、
    /// その場でクレデンシャルを取得する。取得失敗は伝播し、再試行しない。
    pub async fn get_temporary_credentials(
        &self,
        id_token: &str,
    ) -> Result<TemporaryCredentials, CredentialsError> {
        let provider_name = self.config.user_pool_provider_name();

        // ログインマップからアイデンティティIDを解決
        let identity_id = self
            .identity_client
            .get_id()
            .identity_pool_id(self.config.identity_pool_id())
            .logins(&provider_name, id_token)
            .send()
            .await
            .map_err(|e| {
                CredentialsError::IdentityLookupFailed(e.into_service_error().to_string())
            })?
            .identity_id
            .ok_or(CredentialsError::IncompleteCredentials)?;

        info!(identity_id = %identity_id, "一時クレデンシャルを取得");

        // 即時取得。ここで失敗した場合はそのまま呼び出し元へ返す
        let output = self
            .identity_client
            .get_credentials_for_identity()
            .identity_id(&identity_id)
            .logins(provider_name, id_token)
            .send()
            .await
            .map_err(|e| CredentialsError::ExchangeFailed(e.into_service_error().to_string()))?;

        let credentials = output
            .credentials()
            .ok_or(CredentialsError::IncompleteCredentials)?;

        TemporaryCredentials::try_from_sdk(credentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_cognitoidentity::primitives::DateTime;
    use aws_sdk_cognitoidentity::types::Credentials;

    // ==================== エラー型 ====================

    /// エラー表示メッセージを確認
    #[test]
    fn test_credentials_error_display() {
        assert_eq!(
            CredentialsError::AuthenticationFailed("bad password".to_string()).to_string(),
            "Authentication failed: bad password"
        );
        assert_eq!(
            CredentialsError::MissingIdToken.to_string(),
            "Sign-in response did not include an ID token"
        );
        assert_eq!(
            CredentialsError::IncompleteCredentials.to_string(),
            "Received incomplete credentials"
        );
    }

    // ==================== SDK型からの変換 ====================

    /// 完全なクレデンシャルが変換できることを確認
    #[test]
    fn test_try_from_sdk_complete_credentials() {
        let credentials = Credentials::builder()
            .access_key_id("ASIATESTACCESSKEY")
            .secret_key("test-secret-key")
            .session_token("test-session-token")
            .expiration(DateTime::from_secs(1_750_000_000))
            .build();

        let result = TemporaryCredentials::try_from_sdk(&credentials).unwrap();

        assert_eq!(result.access_key_id, "ASIATESTACCESSKEY");
        assert_eq!(result.secret_access_key, "test-secret-key");
        assert_eq!(result.session_token, "test-session-token");
        assert_eq!(result.expiration_epoch_seconds, Some(1_750_000_000));
    }

    /// 失効時刻なしでも変換できることを確認
    #[test]
    fn test_try_from_sdk_without_expiration() {
        let credentials = Credentials::builder()
            .access_key_id("ASIATESTACCESSKEY")
            .secret_key("test-secret-key")
            .session_token("test-session-token")
            .build();

        let result = TemporaryCredentials::try_from_sdk(&credentials).unwrap();
        assert!(result.expiration_epoch_seconds.is_none());
    }

    /// 必須フィールド欠落がIncompleteCredentialsになることを確認
    #[test]
    fn test_try_from_sdk_missing_secret_key() {
        let credentials = Credentials::builder()
            .access_key_id("ASIATESTACCESSKEY")
            .session_token("test-session-token")
            .build();

        let result = TemporaryCredentials::try_from_sdk(&credentials);
        assert!(matches!(
            result,
            Err(CredentialsError::IncompleteCredentials)
        ));
    }

    /// 空のクレデンシャルがIncompleteCredentialsになることを確認
    #[test]
    fn test_try_from_sdk_empty_credentials() {
        let credentials = Credentials::builder().build();

        let result = TemporaryCredentials::try_from_sdk(&credentials);
        assert!(matches!(
            result,
            Err(CredentialsError::IncompleteCredentials)
        ));
    }
}
