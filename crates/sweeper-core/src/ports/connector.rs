//! StoreConnector port - 接続ごとに ObjectStore を組み立てる
//!
//! 認証情報の解決はここで行い、失敗は `SweepError::Client`（fatal）として返す。

use std::sync::Arc;

use async_trait::async_trait;

use super::ObjectStore;
use crate::domain::{Connection, SweepError};

#[async_trait]
pub trait StoreConnector: Send + Sync {
    async fn connect(&self, connection: &Connection) -> Result<Arc<dyn ObjectStore>, SweepError>;
}
