// スペースエンティティと入力バリデーション
//
// スペースはこのAPIが扱う唯一のドメインエンティティ。
// IDはULID形式で、指定がなければサーバー側で生成する。
// 名前はテーブル全体で一意（一意性の強制はリポジトリ層が担う）。

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use ulid::Ulid;

/// スペースIDの形式（ULID: Crockford Base32の26文字、I/L/O/Uを除く）
static ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0123456789ABCDEFGHJKMNPQRSTVWXYZ]{26}$").unwrap());

/// スペース名に許可する文字
/// 英字（ウムラウト・ß含む）、数字、スペース、カンマ、ピリオド、アポストロフィ、ハイフン
static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9äöüÄÖÜß ,.'-]+$").unwrap());

/// スペース入力バリデーションのエラー型
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SpaceValidationError {
    /// 必須フィールドが欠落、または空文字列
    #[error("Mandatory value is missing: {0}")]
    MissingValue(&'static str),

    /// フィールド値が許可された形式に合わない
    #[error("Invalid value for field: {0}")]
    InvalidFormat(&'static str),
}

/// スペースエンティティ
///
/// `photoUrl`と`date`は任意。JSONシリアライズ時に未設定フィールドは省略される。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Space {
    /// スペースID（ULID、作成後は不変）
    pub id: String,

    /// 表示名（テーブル全体で一意）
    pub name: String,

    /// 所在地（自由テキスト）
    pub location: String,

    /// 写真URL
    #[serde(rename = "photoUrl", skip_serializing_if = "Option::is_none", default)]
    pub photo_url: Option<String>,

    /// 日付（自由テキスト）
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub date: Option<String>,
}

impl Space {
    /// 作成入力からスペースを構築する
    ///
    /// `name`と`location`は必須。`id`が未指定の場合はULIDを生成し、
    /// 指定された場合はULID形式であることを検証する。
    ///
    /// # Returns
    /// * `Ok(Space)` - バリデーション済みのスペース
    /// * `Err(SpaceValidationError)` - 必須フィールド欠落または形式不正
    pub fn from_draft(draft: SpaceDraft) -> Result<Self, SpaceValidationError> {
        let name = match draft.name {
            Some(name) if !name.is_empty() => name,
            _ => return Err(SpaceValidationError::MissingValue("name")),
        };
        let location = match draft.location {
            Some(location) if !location.is_empty() => location,
            _ => return Err(SpaceValidationError::MissingValue("location")),
        };

        if !NAME_PATTERN.is_match(&name) {
            return Err(SpaceValidationError::InvalidFormat("name"));
        }

        let id = match draft.id {
            Some(id) => {
                if !ID_PATTERN.is_match(&id) {
                    return Err(SpaceValidationError::InvalidFormat("id"));
                }
                id
            }
            None => Ulid::new().to_string(),
        };

        Ok(Self {
            id,
            name,
            location,
            photo_url: draft.photo_url,
            date: draft.date,
        })
    }
}

/// スペース作成入力
///
/// リクエストボディのデコード結果。全フィールドが任意で、
/// 必須チェックは`Space::from_draft`が行う。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpaceDraft {
    /// スペースID（省略時はサーバー側で生成）
    pub id: Option<String>,
    /// 表示名
    pub name: Option<String>,
    /// 所在地
    pub location: Option<String>,
    /// 写真URL
    #[serde(rename = "photoUrl")]
    pub photo_url: Option<String>,
    /// 日付
    pub date: Option<String>,
}

/// スペース部分更新入力
///
/// 指定されたフィールドだけを既存レコードにマージする。
/// `id`は更新対象の指定に使うため、このペイロードには含まれない。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpaceUpdate {
    /// 表示名（空文字列は拒否）
    pub name: Option<String>,
    /// 所在地（空文字列は拒否）
    pub location: Option<String>,
    /// 写真URL
    #[serde(rename = "photoUrl")]
    pub photo_url: Option<String>,
    /// 日付
    pub date: Option<String>,
}

impl SpaceUpdate {
    /// 更新入力を検証する
    ///
    /// `name`または`location`が空文字列で指定された場合は拒否する。
    /// 未指定（`None`）のフィールドは検証対象外。
    pub fn validate(&self) -> Result<(), SpaceValidationError> {
        match &self.name {
            Some(name) if name.is_empty() => {
                return Err(SpaceValidationError::MissingValue("name"));
            }
            Some(name) if !NAME_PATTERN.is_match(name) => {
                return Err(SpaceValidationError::InvalidFormat("name"));
            }
            _ => {}
        }
        if let Some(location) = &self.location
            && location.is_empty()
        {
            return Err(SpaceValidationError::MissingValue("location"));
        }
        Ok(())
    }

    /// 既存スペースに更新をマージした結果を返す
    ///
    /// 指定されたフィールドだけを上書きし、`id`は変更しない。
    pub fn merged(&self, existing: &Space) -> Space {
        Space {
            id: existing.id.clone(),
            name: self.name.clone().unwrap_or_else(|| existing.name.clone()),
            location: self
                .location
                .clone()
                .unwrap_or_else(|| existing.location.clone()),
            photo_url: self.photo_url.clone().or_else(|| existing.photo_url.clone()),
            date: self.date.clone().or_else(|| existing.date.clone()),
        }
    }

    /// 全フィールドが未指定かどうか
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.location.is_none()
            && self.photo_url.is_none()
            && self.date.is_none()
    }
}
