//! ObjectStore port - オブジェクトストレージ（S3 / S3 互換 / InMemory）
//!
//! sweeper が必要とする 3 つの操作だけを定義します。
//! - prefix 指定の一覧（カーソル付きページング）
//! - 単一オブジェクトの削除
//! - 一括削除（quiet モード: 失敗したキーだけが返る）

use async_trait::async_trait;

use crate::domain::{ListPage, SweepError};

/// ObjectStore は 1 つのストレージ接続へのハンドル
///
/// # 設計原則
/// - 呼び出しはすべて逐次（同時に複数のリクエストを出さない）
/// - リトライはここではなく `app::retry` で行う
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// `prefix` 配下のオブジェクトを 1 ページ取得
    async fn list_page(
        &self,
        bucket: &str,
        prefix: &str,
        cursor: Option<&str>,
    ) -> Result<ListPage, SweepError>;

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), SweepError>;

    /// quiet モードの一括削除。1 つでも拒否されたら `SweepError::DeleteRejected`
    async fn delete_objects(&self, bucket: &str, keys: &[String]) -> Result<(), SweepError>;
}
