//! StorageObject / ListPage - 一覧 API の 1 ページ分の読み取り専用ビュー
//!
//! キャッシュはしない。1 回の list 呼び出しごとに作られて捨てられる。

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageObject {
    pub key: String,
    /// バックエンドが返さなかった場合は None
    pub last_modified: Option<DateTime<Utc>>,
}

impl StorageObject {
    pub fn new(key: impl Into<String>, last_modified: DateTime<Utc>) -> Self {
        Self {
            key: key.into(),
            last_modified: Some(last_modified),
        }
    }
}

/// list-objects-by-prefix の 1 ページ
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPage {
    pub objects: Vec<StorageObject>,
    /// 次ページのカーソル。truncated でなければ None
    pub next_cursor: Option<String>,
}

impl ListPage {
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}
