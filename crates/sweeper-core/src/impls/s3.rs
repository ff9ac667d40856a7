//! S3ObjectStore - AWS S3 / S3 互換ストレージの実装
//!
//! - ListObjectsV2（continuation token）
//! - DeleteObject
//! - DeleteObjects（quiet = true）
//!
//! 認証情報・リージョンの解決は SDK の既定の順序に任せる。

use std::sync::Arc;

use async_trait::async_trait;
use aws_config::{BehaviorVersion, SdkConfig};
use aws_credential_types::provider::ProvideCredentials;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::http::HttpResponse;
use aws_sdk_s3::config::retry::RetryConfig;
use aws_sdk_s3::error::{DisplayErrorContext, SdkError};
use aws_sdk_s3::types::{Delete, ObjectIdentifier};
use chrono::{DateTime, Utc};

use crate::config::StorageSettings;
use crate::domain::{Connection, ErrorKind, ListPage, StorageObject, SweepError};
use crate::ports::{ObjectStore, StoreConnector};

pub struct S3ObjectStore {
    client: Client,
}

impl S3ObjectStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// 設定を解決してクライアントを作る
    ///
    /// 認証情報はここで一度解決し、失敗したら `SweepError::Client` を返す。
    pub async fn connect(bucket: &str, settings: &StorageSettings) -> Result<Self, SweepError> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &settings.region {
            loader = loader.region(aws_config::Region::new(region.clone()));
        }
        if let Some(profile) = &settings.profile {
            loader = loader.profile_name(profile);
        }
        let sdk_config = loader.load().await;

        let client_error = |message: String| SweepError::Client {
            bucket: bucket.to_string(),
            message,
        };
        let provider = sdk_config
            .credentials_provider()
            .ok_or_else(|| client_error("no credentials provider configured".to_string()))?;
        provider
            .provide_credentials()
            .await
            .map_err(|e| client_error(DisplayErrorContext(&e).to_string()))?;

        tracing::debug!(
            bucket,
            region = ?sdk_config.region(),
            path_style = settings.force_path_style,
            "storage client ready"
        );
        Ok(Self::new(Client::from_conf(client_config(&sdk_config, settings))))
    }
}

/// S3 クライアントの設定
///
/// SDK 側のリトライは無効。リトライは `RetryPolicy` だけが行う。
fn client_config(sdk_config: &SdkConfig, settings: &StorageSettings) -> aws_sdk_s3::Config {
    let mut builder = aws_sdk_s3::config::Builder::from(sdk_config)
        .force_path_style(settings.force_path_style)
        .retry_config(RetryConfig::disabled());
    if let Some(endpoint) = &settings.endpoint_url {
        builder = builder.endpoint_url(endpoint);
    }
    builder.build()
}

/// SDK のエラーを運用分類する
///
/// 通信系・タイムアウト・5xx は Transient、それ以外は Permanent。
fn classify<E>(err: &SdkError<E, HttpResponse>) -> ErrorKind {
    match err {
        SdkError::TimeoutError(_) | SdkError::DispatchFailure(_) | SdkError::ResponseError(_) => {
            ErrorKind::Transient
        }
        SdkError::ServiceError(service) if service.raw().status().is_server_error() => {
            ErrorKind::Transient
        }
        _ => ErrorKind::Permanent,
    }
}

fn to_utc(ts: &aws_sdk_s3::primitives::DateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts.secs(), ts.subsec_nanos())
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn list_page(
        &self,
        bucket: &str,
        prefix: &str,
        cursor: Option<&str>,
    ) -> Result<ListPage, SweepError> {
        let output = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .prefix(prefix)
            .set_continuation_token(cursor.map(str::to_string))
            .send()
            .await
            .map_err(|e| SweepError::List {
                kind: classify(&e),
                bucket: bucket.to_string(),
                prefix: prefix.to_string(),
                message: DisplayErrorContext(&e).to_string(),
            })?;

        let objects = output
            .contents()
            .iter()
            .filter_map(|obj| {
                Some(StorageObject {
                    key: obj.key()?.to_string(),
                    last_modified: obj.last_modified().and_then(to_utc),
                })
            })
            .collect();

        let next_cursor = if output.is_truncated().unwrap_or(false) {
            output.next_continuation_token().map(str::to_string)
        } else {
            None
        };

        Ok(ListPage {
            objects,
            next_cursor,
        })
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), SweepError> {
        self.client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| SweepError::Delete {
                kind: classify(&e),
                bucket: bucket.to_string(),
                message: format!("{key}: {}", DisplayErrorContext(&e)),
            })?;
        Ok(())
    }

    async fn delete_objects(&self, bucket: &str, keys: &[String]) -> Result<(), SweepError> {
        let build_error = |message: String| SweepError::Delete {
            kind: ErrorKind::Permanent,
            bucket: bucket.to_string(),
            message,
        };

        let identifiers = keys
            .iter()
            .map(|key| ObjectIdentifier::builder().key(key).build())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| build_error(e.to_string()))?;
        let delete = Delete::builder()
            .set_objects(Some(identifiers))
            .quiet(true)
            .build()
            .map_err(|e| build_error(e.to_string()))?;

        let output = self
            .client
            .delete_objects()
            .bucket(bucket)
            .delete(delete)
            .send()
            .await
            .map_err(|e| SweepError::Delete {
                kind: classify(&e),
                bucket: bucket.to_string(),
                message: DisplayErrorContext(&e).to_string(),
            })?;

        // quiet モードでは失敗したキーだけが返ってくる
        let rejected = output.errors();
        match rejected.first() {
            None => Ok(()),
            Some(first) => Err(SweepError::DeleteRejected {
                bucket: bucket.to_string(),
                failed: rejected.len(),
                first_key: first.key().unwrap_or_default().to_string(),
                first_code: first.code().unwrap_or("unknown").to_string(),
            }),
        }
    }
}

/// 接続ごとに S3ObjectStore を作る
#[derive(Debug, Clone, Default)]
pub struct S3Connector {
    settings: StorageSettings,
}

impl S3Connector {
    pub fn new(settings: StorageSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl StoreConnector for S3Connector {
    async fn connect(&self, connection: &Connection) -> Result<Arc<dyn ObjectStore>, SweepError> {
        let store = S3ObjectStore::connect(&connection.bucket, &self.settings).await?;
        Ok(Arc::new(store))
    }
}
