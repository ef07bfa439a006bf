// 認可ゲート
//
// API Gatewayの認可コンテキストに載ったCognitoクレームを検査し、
// `admins`グループに所属するリクエストだけを許可する。
// クレームやグループが存在しない場合は常に拒否（フェイルクローズ）。

use lambda_http::request::RequestContext;
use lambda_http::{Request, RequestExt};

/// 特権操作を許可するグループ名
const ADMIN_GROUP: &str = "admins";

/// リクエストが特権操作を許可されているか判定する
///
/// 上流の認証レイヤーが付与した`cognito:groups`クレームを検査し、
/// リテラル`admins`がグループ一覧に含まれる場合のみ`true`を返す。
/// 認可コンテキストがない、クレームがない、グループが空、
/// `admins`以外のグループのみの場合はいずれも`false`。
pub fn is_authorized(request: &Request) -> bool {
    let Some(context) = request.request_context_ref() else {
        return false;
    };

    claimed_groups(context)
        .map(|groups| contains_admin_group(&groups))
        .unwrap_or(false)
}

/// 認可コンテキストから`cognito:groups`クレームを取り出す
///
/// REST API（Cognitoオーソライザー）とHTTP API（JWTオーソライザー）の
/// 両方のコンテキスト形式をサポートする。
fn claimed_groups(context: &RequestContext) -> Option<String> {
    match context {
        RequestContext::ApiGatewayV1(ctx) => ctx
            .authorizer
            .fields
            .get("claims")
            .and_then(|claims| claims.get("cognito:groups"))
            .and_then(|groups| groups.as_str())
            .map(str::to_string),
        RequestContext::ApiGatewayV2(ctx) => ctx
            .authorizer
            .as_ref()
            .and_then(|authorizer| authorizer.jwt.as_ref())
            .and_then(|jwt| jwt.claims.get("cognito:groups"))
            .cloned(),
        _ => None,
    }
}

/// グループクレーム文字列に`admins`が含まれるか判定する
///
/// クレームは単一グループ（`admins`）、カンマ区切り（`admins,editors`）、
/// 配列の文字列化（`[admins editors]`）のいずれの形でも届きうる。
/// 部分文字列一致ではなくグループ名の完全一致で判定する。
fn contains_admin_group(groups: &str) -> bool {
    groups
        .trim_start_matches('[')
        .trim_end_matches(']')
        .split([',', ' '])
        .map(str::trim)
        .any(|group| group == ADMIN_GROUP)
}
