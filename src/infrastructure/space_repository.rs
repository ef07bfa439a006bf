// DynamoDBでスペースを管理するためのリポジトリ
//
// シングルテーブル設計:
// - プライマリキー: pk = `space:<id>`, sk = `space:`
// - GSI `gs1`: gs1pk = `space:`, gs1sk = `space:<location>:<id>`
//   （所在地での検索と全件走査に使用。IDがタイブレーク）
// - 名前の一意性: マーカーアイテム pk = `_unique:space:name:<name>` を
//   レコードと同一トランザクションで条件付きPutする
//
// インデックス属性はすべてリポジトリが導出する。呼び出し側からは受け取らない。
use async_trait::async_trait;
use aws_sdk_dynamodb::types::{AttributeValue, Delete, Put, TransactWriteItem};
use aws_sdk_dynamodb::Client as DynamoDbClient;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use crate::domain::{Space, SpaceDraft, SpaceUpdate, SpaceValidationError};

/// スペースリポジトリ操作のエラー型
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SpaceRepositoryError {
    /// 必須フィールドが欠落、または空文字列
    #[error("Mandatory value is missing: {0}")]
    MissingValue(String),

    /// フィールド値が許可された形式に合わない
    #[error("Invalid value for field: {0}")]
    InvalidFormat(String),

    /// スペース名が既に使用されている
    #[error("Space name is already taken: {0}")]
    Conflict(String),

    /// 指定IDのスペースが存在しない
    #[error("Space not found: {0}")]
    NotFound(String),

    /// DynamoDBへの書き込みに失敗
    #[error("Write error: {0}")]
    WriteError(String),

    /// DynamoDBからの読み取りに失敗
    #[error("Read error: {0}")]
    ReadError(String),

    /// データのシリアライズ/デシリアライズに失敗
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<SpaceValidationError> for SpaceRepositoryError {
    fn from(err: SpaceValidationError) -> Self {
        match err {
            SpaceValidationError::MissingValue(field) => {
                SpaceRepositoryError::MissingValue(field.to_string())
            }
            SpaceValidationError::InvalidFormat(field) => {
                SpaceRepositoryError::InvalidFormat(field.to_string())
            }
        }
    }
}

/// スペース永続化用トレイト
///
/// 異なる実装を可能にします（実際のDynamoDB、テスト用モック）。
#[async_trait]
pub trait SpaceRepository: Send + Sync {
    /// スペースを作成する
    ///
    /// # Returns
    /// * `Ok(Space)` - 永続化されたスペース（ID採番済み）
    /// * `Err(MissingValue)` - `name`または`location`が欠落
    /// * `Err(Conflict)` - 同名のスペースが既に存在
    async fn create(&self, draft: SpaceDraft) -> Result<Space, SpaceRepositoryError>;

    /// IDでスペースを取得する
    ///
    /// 見つからない場合は`Ok(None)`。
    async fn get(&self, id: &str) -> Result<Option<Space>, SpaceRepositoryError>;

    /// 所在地でスペースを検索する
    ///
    /// GSIのソートキー前方一致で0件以上を返す。ID昇順。
    async fn find_by_location(&self, location: &str)
        -> Result<Vec<Space>, SpaceRepositoryError>;

    /// 全スペースを列挙する
    ///
    /// GSIの固定パーティションを全走査する。所在地・ID順。
    async fn scan(&self) -> Result<Vec<Space>, SpaceRepositoryError>;

    /// 指定フィールドだけを既存レコードにマージする
    ///
    /// # Returns
    /// * `Ok(Space)` - 更新後のスペース
    /// * `Err(MissingValue)` - `name`/`location`が空文字列で指定された
    /// * `Err(NotFound)` - 指定IDのスペースが存在しない
    /// * `Err(Conflict)` - 変更後の名前が既に使用されている
    async fn update(&self, id: &str, update: SpaceUpdate)
        -> Result<Space, SpaceRepositoryError>;

    /// IDでスペースを削除する
    ///
    /// 削除したレコードを返す。存在しないIDは`Err(NotFound)`。
    async fn remove(&self, id: &str) -> Result<Space, SpaceRepositoryError>;
}

/// プライマリキーとGSIのソートキー定数
const SORT_KEY: &str = "space:";
/// 一意性マーカーのソートキー定数
const UNIQUE_SORT_KEY: &str = "_unique:";

/// SpaceRepositoryのDynamoDB実装
#[derive(Debug, Clone)]
pub struct DynamoSpaceRepository {
    /// DynamoDBクライアント
    client: DynamoDbClient,
    /// スペーステーブル名
    table_name: String,
}

/// DynamoDBに保存するアイテム形式
///
/// インデックス属性（pk/sk/gs1pk/gs1sk）とレコード本体をフラットに持つ。
#[derive(Debug, Serialize, Deserialize)]
struct SpaceItem {
    pk: String,
    sk: String,
    gs1pk: String,
    gs1sk: String,
    #[serde(flatten)]
    space: Space,
}

impl SpaceItem {
    /// スペースからインデックス属性を導出してアイテムを作る
    fn from_space(space: Space) -> Self {
        Self {
            pk: DynamoSpaceRepository::build_pk(&space.id),
            sk: SORT_KEY.to_string(),
            gs1pk: SORT_KEY.to_string(),
            gs1sk: DynamoSpaceRepository::build_gs1sk(&space.location, &space.id),
            space,
        }
    }
}

impl DynamoSpaceRepository {
    /// 新しいDynamoSpaceRepositoryを作成
    ///
    /// # Arguments
    /// * `client` - DynamoDBクライアント
    /// * `table_name` - スペーステーブルの名前
    pub fn new(client: DynamoDbClient, table_name: String) -> Self {
        Self { client, table_name }
    }

    /// IDからパーティションキーを生成
    /// フォーマット: `space:<id>`
    fn build_pk(id: &str) -> String {
        format!("space:{id}")
    }

    /// 所在地とIDからGSIソートキーを生成
    /// フォーマット: `space:<location>:<id>`
    fn build_gs1sk(location: &str, id: &str) -> String {
        format!("space:{location}:{id}")
    }

    /// 名前から一意性マーカーのパーティションキーを生成
    /// フォーマット: `_unique:space:name:<name>`
    fn build_unique_pk(name: &str) -> String {
        format!("_unique:space:name:{name}")
    }

    /// スペースをDynamoDBアイテムに変換
    fn to_item(space: Space) -> Result<HashMap<String, AttributeValue>, SpaceRepositoryError> {
        serde_dynamo::aws_sdk_dynamodb_1::to_item(SpaceItem::from_space(space))
            .map_err(|e| SpaceRepositoryError::SerializationError(e.to_string()))
    }

    /// DynamoDBアイテムをスペースに変換
    fn from_item(item: HashMap<String, AttributeValue>) -> Result<Space, SpaceRepositoryError> {
        let item: SpaceItem = serde_dynamo::aws_sdk_dynamodb_1::from_item(item)
            .map_err(|e| SpaceRepositoryError::SerializationError(e.to_string()))?;
        Ok(item.space)
    }

    /// 一意性マーカーアイテムを構築
    fn build_unique_item(name: &str) -> HashMap<String, AttributeValue> {
        let mut item = HashMap::new();
        item.insert(
            "pk".to_string(),
            AttributeValue::S(Self::build_unique_pk(name)),
        );
        item.insert("sk".to_string(), AttributeValue::S(UNIQUE_SORT_KEY.to_string()));
        item
    }

    /// GSIパーティションをページネーション付きでクエリする
    ///
    /// `gs1sk`の前方一致条件は`prefix`が`Some`の場合のみ付与する。
    async fn query_gs1(
        &self,
        prefix: Option<String>,
    ) -> Result<Vec<Space>, SpaceRepositoryError> {
        let mut spaces = Vec::new();
        let mut last_evaluated_key = None;

        // ページネーション: LastEvaluatedKeyがある限りクエリを続ける
        loop {
            let mut query_builder = self
                .client
                .query()
                .table_name(&self.table_name)
                .index_name("gs1")
                .expression_attribute_values(":pk", AttributeValue::S(SORT_KEY.to_string()));

            query_builder = match &prefix {
                Some(prefix) => query_builder
                    .key_condition_expression("gs1pk = :pk AND begins_with(gs1sk, :prefix)")
                    .expression_attribute_values(":prefix", AttributeValue::S(prefix.clone())),
                None => query_builder.key_condition_expression("gs1pk = :pk"),
            };

            // 前回のクエリの続きから開始
            if let Some(key) = last_evaluated_key.take() {
                query_builder = query_builder.set_exclusive_start_key(Some(key));
            }

            let result = query_builder
                .send()
                .await
                .map_err(|e| SpaceRepositoryError::ReadError(e.into_service_error().to_string()))?;

            if let Some(items) = result.items {
                for item in items {
                    spaces.push(Self::from_item(item)?);
                }
            }

            // 次のページがあるか確認
            match result.last_evaluated_key {
                Some(key) => last_evaluated_key = Some(key),
                None => break,
            }
        }

        Ok(spaces)
    }

    /// レコードと一意性マーカーを置き換えるトランザクションを実行する
    ///
    /// `old_name`が`Some`の場合は旧マーカーの削除も同一トランザクションに含める。
    /// 新マーカーの条件付きPutが失敗した場合は`Conflict`を返す。
    async fn write_with_unique_name(
        &self,
        space: &Space,
        old_name: Option<&str>,
    ) -> Result<(), SpaceRepositoryError> {
        let item = Self::to_item(space.clone())?;

        let put_record = Put::builder()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .build()
            .map_err(|e| SpaceRepositoryError::WriteError(e.to_string()))?;

        let put_marker = Put::builder()
            .table_name(&self.table_name)
            .set_item(Some(Self::build_unique_item(&space.name)))
            .condition_expression("attribute_not_exists(pk)")
            .build()
            .map_err(|e| SpaceRepositoryError::WriteError(e.to_string()))?;

        let mut transaction = self
            .client
            .transact_write_items()
            .transact_items(TransactWriteItem::builder().put(put_record).build())
            .transact_items(TransactWriteItem::builder().put(put_marker).build());

        if let Some(old_name) = old_name {
            let delete_marker = Delete::builder()
                .table_name(&self.table_name)
                .key("pk", AttributeValue::S(Self::build_unique_pk(old_name)))
                .key("sk", AttributeValue::S(UNIQUE_SORT_KEY.to_string()))
                .build()
                .map_err(|e| SpaceRepositoryError::WriteError(e.to_string()))?;
            transaction =
                transaction.transact_items(TransactWriteItem::builder().delete(delete_marker).build());
        }

        match transaction.send().await {
            Ok(_) => Ok(()),
            Err(err) => {
                let service_error = err.into_service_error();
                // TransactionCanceledExceptionの中にConditionalCheckFailedが含まれているか確認
                if service_error.to_string().contains("ConditionalCheckFailed") {
                    return Err(SpaceRepositoryError::Conflict(space.name.clone()));
                }
                Err(SpaceRepositoryError::WriteError(service_error.to_string()))
            }
        }
    }
}

#[async_trait]
impl SpaceRepository for DynamoSpaceRepository {
    async fn create(&self, draft: SpaceDraft) -> Result<Space, SpaceRepositoryError> {
        let space = Space::from_draft(draft)?;

        let item = Self::to_item(space.clone())?;

        // レコードは同一ID上書きを防ぎ、マーカーは同名を防ぐ
        let put_record = Put::builder()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .condition_expression("attribute_not_exists(pk)")
            .build()
            .map_err(|e| SpaceRepositoryError::WriteError(e.to_string()))?;

        let put_marker = Put::builder()
            .table_name(&self.table_name)
            .set_item(Some(Self::build_unique_item(&space.name)))
            .condition_expression("attribute_not_exists(pk)")
            .build()
            .map_err(|e| SpaceRepositoryError::WriteError(e.to_string()))?;

        let result = self
            .client
            .transact_write_items()
            .transact_items(TransactWriteItem::builder().put(put_record).build())
            .transact_items(TransactWriteItem::builder().put(put_marker).build())
            .send()
            .await;

        match result {
            Ok(_) => Ok(space),
            Err(err) => {
                let service_error = err.into_service_error();
                if service_error.to_string().contains("ConditionalCheckFailed") {
                    return Err(SpaceRepositoryError::Conflict(space.name));
                }
                Err(SpaceRepositoryError::WriteError(service_error.to_string()))
            }
        }
    }

    async fn get(&self, id: &str) -> Result<Option<Space>, SpaceRepositoryError> {
        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key("pk", AttributeValue::S(Self::build_pk(id)))
            .key("sk", AttributeValue::S(SORT_KEY.to_string()))
            .send()
            .await
            .map_err(|e| SpaceRepositoryError::ReadError(e.into_service_error().to_string()))?;

        match result.item {
            Some(item) => Ok(Some(Self::from_item(item)?)),
            None => Ok(None),
        }
    }

    async fn find_by_location(
        &self,
        location: &str,
    ) -> Result<Vec<Space>, SpaceRepositoryError> {
        // `space:<location>:` 前方一致でIDのタイブレーク順に並ぶ
        let prefix = format!("space:{location}:");
        self.query_gs1(Some(prefix)).await
    }

    async fn scan(&self) -> Result<Vec<Space>, SpaceRepositoryError> {
        self.query_gs1(None).await
    }

    async fn update(
        &self,
        id: &str,
        update: SpaceUpdate,
    ) -> Result<Space, SpaceRepositoryError> {
        update.validate()?;

        let existing = self
            .get(id)
            .await?
            .ok_or_else(|| SpaceRepositoryError::NotFound(id.to_string()))?;

        let merged = update.merged(&existing);

        if merged.name != existing.name {
            // 名前変更はマーカーの付け替えを伴う
            self.write_with_unique_name(&merged, Some(&existing.name))
                .await?;
        } else {
            let item = Self::to_item(merged.clone())?;
            self.client
                .put_item()
                .table_name(&self.table_name)
                .set_item(Some(item))
                .send()
                .await
                .map_err(|e| {
                    SpaceRepositoryError::WriteError(e.into_service_error().to_string())
                })?;
        }

        Ok(merged)
    }

    async fn remove(&self, id: &str) -> Result<Space, SpaceRepositoryError> {
        let existing = self
            .get(id)
            .await?
            .ok_or_else(|| SpaceRepositoryError::NotFound(id.to_string()))?;

        let delete_record = Delete::builder()
            .table_name(&self.table_name)
            .key("pk", AttributeValue::S(Self::build_pk(id)))
            .key("sk", AttributeValue::S(SORT_KEY.to_string()))
            .build()
            .map_err(|e| SpaceRepositoryError::WriteError(e.to_string()))?;

        let delete_marker = Delete::builder()
            .table_name(&self.table_name)
            .key(
                "pk",
                AttributeValue::S(Self::build_unique_pk(&existing.name)),
            )
            .key("sk", AttributeValue::S(UNIQUE_SORT_KEY.to_string()))
            .build()
            .map_err(|e| SpaceRepositoryError::WriteError(e.to_string()))?;

        self.client
            .transact_write_items()
            .transact_items(TransactWriteItem::builder().delete(delete_record).build())
            .transact_items(TransactWriteItem::builder().delete(delete_marker).build())
            .send()
            .await
            .map_err(|e| SpaceRepositoryError::WriteError(e.into_service_error().to_string()))?;

        Ok(existing)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    // ==================== キー導出 ====================

    /// パーティションキーの形式を確認
    #[test]
    fn test_build_pk() {
        assert_eq!(
            DynamoSpaceRepository::build_pk("01ARZ3NDEKTSV4RRFFQ69G5FAV"),
            "space:01ARZ3NDEKTSV4RRFFQ69G5FAV"
        );
    }

    /// GSIソートキーの形式を確認
    #[test]
    fn test_build_gs1sk() {
        assert_eq!(
            DynamoSpaceRepository::build_gs1sk("Berlin", "01ARZ3NDEKTSV4RRFFQ69G5FAV"),
            "space:Berlin:01ARZ3NDEKTSV4RRFFQ69G5FAV"
        );
    }

    /// 一意性マーカーキーの形式を確認
    #[test]
    fn test_build_unique_pk() {
        assert_eq!(
            DynamoSpaceRepository::build_unique_pk("Room A"),
            "_unique:space:name:Room A"
        );
    }

    /// アイテム変換でインデックス属性が導出されることを確認
    #[test]
    fn test_space_item_derives_index_attributes() {
        let space = Space {
            id: "01ARZ3NDEKTSV4RRFFQ69G5FAV".to_string(),
            name: "Room A".to_string(),
            location: "Berlin".to_string(),
            photo_url: None,
            date: None,
        };

        let item = SpaceItem::from_space(space);

        assert_eq!(item.pk, "space:01ARZ3NDEKTSV4RRFFQ69G5FAV");
        assert_eq!(item.sk, "space:");
        assert_eq!(item.gs1pk, "space:");
        assert_eq!(item.gs1sk, "space:Berlin:01ARZ3NDEKTSV4RRFFQ69G5FAV");
    }

    /// DynamoDBアイテムとの相互変換を確認
    #[test]
    fn test_to_item_from_item_roundtrip() {
        let space = Space {
            id: "01ARZ3NDEKTSV4RRFFQ69G5FAV".to_string(),
            name: "Room A".to_string(),
            location: "Berlin".to_string(),
            photo_url: Some("https://example.com/a.jpg".to_string()),
            date: Some("2024-06-01".to_string()),
        };

        let item = DynamoSpaceRepository::to_item(space.clone()).unwrap();

        // インデックス属性がアイテムに含まれることを確認
        assert_eq!(
            item.get("pk").and_then(|v| v.as_s().ok()).map(String::as_str),
            Some("space:01ARZ3NDEKTSV4RRFFQ69G5FAV")
        );
        assert_eq!(
            item.get("gs1sk").and_then(|v| v.as_s().ok()).map(String::as_str),
            Some("space:Berlin:01ARZ3NDEKTSV4RRFFQ69G5FAV")
        );

        let restored = DynamoSpaceRepository::from_item(item).unwrap();
        assert_eq!(restored, space);
    }

    // ==================== エラー型 ====================

    /// エラー表示メッセージを確認
    #[test]
    fn test_repository_error_display() {
        assert_eq!(
            SpaceRepositoryError::MissingValue("name".to_string()).to_string(),
            "Mandatory value is missing: name"
        );
        assert_eq!(
            SpaceRepositoryError::Conflict("Room A".to_string()).to_string(),
            "Space name is already taken: Room A"
        );
        assert_eq!(
            SpaceRepositoryError::NotFound("abc".to_string()).to_string(),
            "Space not found: abc"
        );
        assert_eq!(
            SpaceRepositoryError::WriteError("boom".to_string()).to_string(),
            "Write error: boom"
        );
    }

    /// バリデーションエラーからの変換を確認
    #[test]
    fn test_validation_error_conversion() {
        let err: SpaceRepositoryError = SpaceValidationError::MissingValue("name").into();
        assert_eq!(err, SpaceRepositoryError::MissingValue("name".to_string()));

        let err: SpaceRepositoryError = SpaceValidationError::InvalidFormat("id").into();
        assert_eq!(err, SpaceRepositoryError::InvalidFormat("id".to_string()));
    }

    // ==================== モックスペースリポジトリ ====================

    /// ユニットテスト用のモックSpaceRepository
    ///
    /// DynamoDB実装と同じ契約（バリデーション、名前の一意性、NotFound）を
    /// インメモリで提供する。
    #[derive(Debug, Clone, Default)]
    pub(crate) struct MockSpaceRepository {
        /// 保存されたスペース: id -> Space
        spaces: Arc<Mutex<HashMap<String, Space>>>,
        /// 次の操作で返すエラー（エラーパスのテスト用）
        next_error: Arc<Mutex<Option<SpaceRepositoryError>>>,
    }

    impl MockSpaceRepository {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        pub(crate) fn set_next_error(&self, error: SpaceRepositoryError) {
            *self.next_error.lock().unwrap() = Some(error);
        }

        pub(crate) fn space_count(&self) -> usize {
            self.spaces.lock().unwrap().len()
        }

        pub(crate) fn get_space_sync(&self, id: &str) -> Option<Space> {
            self.spaces.lock().unwrap().get(id).cloned()
        }

        fn take_error(&self) -> Option<SpaceRepositoryError> {
            self.next_error.lock().unwrap().take()
        }

        /// GSIの並び順（所在地、ID）でソートする
        fn sort_as_index(spaces: &mut [Space]) {
            spaces.sort_by(|a, b| {
                (a.location.as_str(), a.id.as_str()).cmp(&(b.location.as_str(), b.id.as_str()))
            });
        }
    }

    #[async_trait]
    impl SpaceRepository for MockSpaceRepository {
        async fn create(&self, draft: SpaceDraft) -> Result<Space, SpaceRepositoryError> {
            if let Some(error) = self.take_error() {
                return Err(error);
            }

            let space = Space::from_draft(draft)?;

            let mut spaces = self.spaces.lock().unwrap();
            if spaces.values().any(|s| s.name == space.name) {
                return Err(SpaceRepositoryError::Conflict(space.name));
            }
            spaces.insert(space.id.clone(), space.clone());
            Ok(space)
        }

        async fn get(&self, id: &str) -> Result<Option<Space>, SpaceRepositoryError> {
            if let Some(error) = self.take_error() {
                return Err(error);
            }
            Ok(self.spaces.lock().unwrap().get(id).cloned())
        }

        async fn find_by_location(
            &self,
            location: &str,
        ) -> Result<Vec<Space>, SpaceRepositoryError> {
            if let Some(error) = self.take_error() {
                return Err(error);
            }
            let mut result: Vec<Space> = self
                .spaces
                .lock()
                .unwrap()
                .values()
                .filter(|space| space.location == location)
                .cloned()
                .collect();
            Self::sort_as_index(&mut result);
            Ok(result)
        }

        async fn scan(&self) -> Result<Vec<Space>, SpaceRepositoryError> {
            if let Some(error) = self.take_error() {
                return Err(error);
            }
            let mut result: Vec<Space> =
                self.spaces.lock().unwrap().values().cloned().collect();
            Self::sort_as_index(&mut result);
            Ok(result)
        }

        async fn update(
            &self,
            id: &str,
            update: SpaceUpdate,
        ) -> Result<Space, SpaceRepositoryError> {
            if let Some(error) = self.take_error() {
                return Err(error);
            }

            update.validate()?;

            let mut spaces = self.spaces.lock().unwrap();
            let existing = spaces
                .get(id)
                .cloned()
                .ok_or_else(|| SpaceRepositoryError::NotFound(id.to_string()))?;

            let merged = update.merged(&existing);
            if merged.name != existing.name
                && spaces.values().any(|s| s.name == merged.name)
            {
                return Err(SpaceRepositoryError::Conflict(merged.name));
            }

            spaces.insert(id.to_string(), merged.clone());
            Ok(merged)
        }

        async fn remove(&self, id: &str) -> Result<Space, SpaceRepositoryError> {
            if let Some(error) = self.take_error() {
                return Err(error);
            }
            self.spaces
                .lock()
                .unwrap()
                .remove(id)
                .ok_or_else(|| SpaceRepositoryError::NotFound(id.to_string()))
        }
    }

    /// テスト用の作成入力を作る
    fn draft(name: &str, location: &str) -> SpaceDraft {
        SpaceDraft {
            name: Some(name.to_string()),
            location: Some(location.to_string()),
            ..Default::default()
        }
    }

    // ==================== リポジトリ契約（モックで検証） ====================

    /// 作成したスペースがID・scan・所在地検索で取得できることを確認
    #[tokio::test]
    async fn test_created_space_is_retrievable() {
        let repository = MockSpaceRepository::new();

        let created = repository.create(draft("Room A", "Berlin")).await.unwrap();

        let by_id = repository.get(&created.id).await.unwrap();
        assert_eq!(by_id, Some(created.clone()));

        let all = repository.scan().await.unwrap();
        assert!(all.contains(&created), "scanに含まれるべき");

        let by_location = repository.find_by_location("Berlin").await.unwrap();
        assert!(by_location.contains(&created), "所在地検索に含まれるべき");
    }

    /// 同名スペースの二重作成が拒否され、2件目が保存されないことを確認
    #[tokio::test]
    async fn test_duplicate_name_is_rejected() {
        let repository = MockSpaceRepository::new();

        repository.create(draft("Room A", "Berlin")).await.unwrap();
        let result = repository.create(draft("Room A", "Hamburg")).await;

        assert_eq!(
            result,
            Err(SpaceRepositoryError::Conflict("Room A".to_string()))
        );
        assert_eq!(repository.space_count(), 1, "2件目は保存されないべき");
    }

    /// 必須フィールド欠落の作成がMissingValueで拒否されることを確認
    #[tokio::test]
    async fn test_create_missing_location_rejected() {
        let repository = MockSpaceRepository::new();

        let result = repository
            .create(SpaceDraft {
                name: Some("Room A".to_string()),
                ..Default::default()
            })
            .await;

        assert_eq!(
            result,
            Err(SpaceRepositoryError::MissingValue("location".to_string()))
        );
        assert_eq!(repository.space_count(), 0);
    }

    /// 空文字列の更新がMissingValueで拒否され、レコードが変更されないことを確認
    #[tokio::test]
    async fn test_update_with_empty_name_does_not_mutate() {
        let repository = MockSpaceRepository::new();
        let created = repository.create(draft("Room A", "Berlin")).await.unwrap();

        let result = repository
            .update(
                &created.id,
                SpaceUpdate {
                    name: Some(String::new()),
                    ..Default::default()
                },
            )
            .await;

        assert_eq!(
            result,
            Err(SpaceRepositoryError::MissingValue("name".to_string()))
        );
        assert_eq!(
            repository.get_space_sync(&created.id),
            Some(created),
            "既存レコードは変更されないべき"
        );
    }

    /// 部分更新で指定フィールドだけが変わることを確認
    #[tokio::test]
    async fn test_update_merges_partial_fields() {
        let repository = MockSpaceRepository::new();
        let created = repository.create(draft("Room A", "Berlin")).await.unwrap();

        let updated = repository
            .update(
                &created.id,
                SpaceUpdate {
                    location: Some("Hamburg".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Room A");
        assert_eq!(updated.location, "Hamburg");
        assert_eq!(updated.id, created.id);
    }

    /// 存在しないIDの更新がNotFoundになることを確認
    #[tokio::test]
    async fn test_update_unknown_id_not_found() {
        let repository = MockSpaceRepository::new();

        let result = repository
            .update("01ARZ3NDEKTSV4RRFFQ69G5FAV", SpaceUpdate::default())
            .await;

        assert_eq!(
            result,
            Err(SpaceRepositoryError::NotFound(
                "01ARZ3NDEKTSV4RRFFQ69G5FAV".to_string()
            ))
        );
    }

    /// 他スペースが使用中の名前への変更がConflictになることを確認
    #[tokio::test]
    async fn test_update_to_taken_name_conflicts() {
        let repository = MockSpaceRepository::new();
        repository.create(draft("Room A", "Berlin")).await.unwrap();
        let other = repository.create(draft("Room B", "Berlin")).await.unwrap();

        let result = repository
            .update(
                &other.id,
                SpaceUpdate {
                    name: Some("Room A".to_string()),
                    ..Default::default()
                },
            )
            .await;

        assert_eq!(
            result,
            Err(SpaceRepositoryError::Conflict("Room A".to_string()))
        );
    }

    /// 削除後のgetが空を返すことを確認
    #[tokio::test]
    async fn test_removed_space_is_gone() {
        let repository = MockSpaceRepository::new();
        let created = repository.create(draft("Room A", "Berlin")).await.unwrap();

        let removed = repository.remove(&created.id).await.unwrap();
        assert_eq!(removed, created, "削除したレコードが返るべき");

        let after = repository.get(&created.id).await.unwrap();
        assert!(after.is_none(), "削除後はgetで取得できないべき");
    }

    /// 存在しないIDの削除がNotFoundになることを確認
    #[tokio::test]
    async fn test_remove_unknown_id_not_found() {
        let repository = MockSpaceRepository::new();

        let result = repository.remove("01ARZ3NDEKTSV4RRFFQ69G5FAV").await;

        assert_eq!(
            result,
            Err(SpaceRepositoryError::NotFound(
                "01ARZ3NDEKTSV4RRFFQ69G5FAV".to_string()
            ))
        );
    }

    /// 所在地検索が一致しない所在地を返さないことを確認
    #[tokio::test]
    async fn test_find_by_location_filters() {
        let repository = MockSpaceRepository::new();
        repository.create(draft("Room A", "Berlin")).await.unwrap();
        repository.create(draft("Room B", "Hamburg")).await.unwrap();

        let berlin = repository.find_by_location("Berlin").await.unwrap();
        assert_eq!(berlin.len(), 1);
        assert_eq!(berlin[0].name, "Room A");

        let munich = repository.find_by_location("München").await.unwrap();
        assert!(munich.is_empty());
    }

    /// エラー注入が次の1回だけ効くことを確認
    #[tokio::test]
    async fn test_mock_error_injection() {
        let repository = MockSpaceRepository::new();
        repository.set_next_error(SpaceRepositoryError::ReadError("connection lost".to_string()));

        let result = repository.scan().await;
        assert_eq!(
            result,
            Err(SpaceRepositoryError::ReadError("connection lost".to_string()))
        );

        // 2回目は成功する
        assert!(repository.scan().await.is_ok());
    }
}
