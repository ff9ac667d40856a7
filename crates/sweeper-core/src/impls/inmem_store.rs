//! InMemoryObjectStore - 開発・テスト用のオブジェクトストレージ
//!
//! # 実装詳細
//! - bucket ごとに BTreeMap<key, last_modified>（キー順の一覧を再現）
//! - ページサイズは任意に設定可能（S3 の 1000 件上限の代わり）
//! - カーソルは「最後に返したキー」。次のページはその次のキーから
//! - 呼び出し回数を記録し、失敗を注入できる

use std::collections::{BTreeMap, HashMap, HashSet};
use std::ops::Bound;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::domain::{ErrorKind, ListPage, StorageObject, SweepError};
use crate::ports::ObjectStore;

/// S3 の ListObjectsV2 の上限
pub const DEFAULT_PAGE_SIZE: usize = 1000;

/// 呼び出し回数の記録
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub list: usize,
    pub delete_object: usize,
    pub delete_objects: usize,
}

#[derive(Default)]
struct State {
    buckets: HashMap<String, BTreeMap<String, Option<DateTime<Utc>>>>,
    calls: CallCounts,
    /// list が失敗する prefix
    failing_prefixes: HashMap<String, ErrorKind>,
    /// 次の N 回の list を Transient で失敗させる
    transient_list_failures: usize,
    /// 削除を拒否するキー
    protected_keys: HashSet<String>,
}

pub struct InMemoryObjectStore {
    page_size: usize,
    state: Mutex<State>,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            state: Mutex::new(State::default()),
        }
    }

    pub async fn put(&self, bucket: &str, key: &str, last_modified: DateTime<Utc>) {
        let mut state = self.state.lock().await;
        state
            .buckets
            .entry(bucket.to_string())
            .or_default()
            .insert(key.to_string(), Some(last_modified));
    }

    /// last_modified の無いオブジェクトを追加
    pub async fn put_undated(&self, bucket: &str, key: &str) {
        let mut state = self.state.lock().await;
        state
            .buckets
            .entry(bucket.to_string())
            .or_default()
            .insert(key.to_string(), None);
    }

    pub async fn keys(&self, bucket: &str) -> Vec<String> {
        let state = self.state.lock().await;
        state
            .buckets
            .get(bucket)
            .map(|objects| objects.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub async fn calls(&self) -> CallCounts {
        self.state.lock().await.calls.clone()
    }

    pub async fn fail_list(&self, prefix: &str, kind: ErrorKind) {
        let mut state = self.state.lock().await;
        state.failing_prefixes.insert(prefix.to_string(), kind);
    }

    pub async fn fail_next_lists(&self, n: usize) {
        self.state.lock().await.transient_list_failures = n;
    }

    pub async fn protect(&self, key: &str) {
        let mut state = self.state.lock().await;
        state.protected_keys.insert(key.to_string());
    }
}

impl Default for InMemoryObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn list_page(
        &self,
        bucket: &str,
        prefix: &str,
        cursor: Option<&str>,
    ) -> Result<ListPage, SweepError> {
        let mut state = self.state.lock().await;
        state.calls.list += 1;

        let injected = if state.transient_list_failures > 0 {
            state.transient_list_failures -= 1;
            Some(ErrorKind::Transient)
        } else {
            state.failing_prefixes.get(prefix).copied()
        };
        if let Some(kind) = injected {
            return Err(SweepError::List {
                kind,
                bucket: bucket.to_string(),
                prefix: prefix.to_string(),
                message: "injected failure".to_string(),
            });
        }

        let Some(objects) = state.buckets.get(bucket) else {
            return Ok(ListPage::default());
        };

        let start = match cursor {
            Some(after) => Bound::Excluded(after.to_string()),
            None => Bound::Included(prefix.to_string()),
        };
        let mut matching = objects
            .range((start, Bound::Unbounded))
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, last_modified)| StorageObject {
                key: key.clone(),
                last_modified: *last_modified,
            });

        let page: Vec<StorageObject> = matching.by_ref().take(self.page_size).collect();
        let truncated = matching.next().is_some();
        let next_cursor = match (truncated, page.last()) {
            (true, Some(last)) => Some(last.key.clone()),
            _ => None,
        };

        Ok(ListPage {
            objects: page,
            next_cursor,
        })
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), SweepError> {
        let mut state = self.state.lock().await;
        state.calls.delete_object += 1;

        if state.protected_keys.contains(key) {
            return Err(SweepError::Delete {
                kind: ErrorKind::Permanent,
                bucket: bucket.to_string(),
                message: format!("AccessDenied: {key}"),
            });
        }
        if let Some(objects) = state.buckets.get_mut(bucket) {
            objects.remove(key);
        }
        Ok(())
    }

    async fn delete_objects(&self, bucket: &str, keys: &[String]) -> Result<(), SweepError> {
        let mut state = self.state.lock().await;
        state.calls.delete_objects += 1;

        let rejected: Vec<String> = keys
            .iter()
            .filter(|k| state.protected_keys.contains(*k))
            .cloned()
            .collect();

        if let Some(objects) = state.buckets.get_mut(bucket) {
            for key in keys.iter().filter(|k| !rejected.contains(*k)) {
                objects.remove(key);
            }
        }

        match rejected.first() {
            None => Ok(()),
            Some(first) => Err(SweepError::DeleteRejected {
                bucket: bucket.to_string(),
                failed: rejected.len(),
                first_key: first.clone(),
                first_code: "AccessDenied".to_string(),
            }),
        }
    }
}
