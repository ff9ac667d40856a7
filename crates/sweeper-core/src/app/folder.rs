//! FolderSweeper - 月別フォルダ（`entry/<YYYY-MM>/`）を丸ごと削除
//!
//! 経過時間のチェックはしない。prefix 配下のオブジェクトはすべて削除対象。
//! list / delete のどちらかが失敗したらこの sweep は中断する。

use crate::domain::SweepError;
use crate::ports::ObjectStore;

use super::RetryPolicy;
use super::status::SweepReport;
use super::sweep::{DeleteStrategy, OnDeleteError, SweepTarget, sweep_matching};

pub struct FolderSweeper<'a> {
    store: &'a dyn ObjectStore,
    retry: &'a RetryPolicy,
}

impl<'a> FolderSweeper<'a> {
    pub fn new(store: &'a dyn ObjectStore, retry: &'a RetryPolicy) -> Self {
        Self { store, retry }
    }

    /// `prefix` 配下のオブジェクトをすべて削除
    ///
    /// 空の prefix はバケット全体を意味するので受け付けない。
    pub async fn delete_folder(&self, bucket: &str, prefix: &str) -> Result<SweepReport, SweepError> {
        if prefix.is_empty() {
            return Err(SweepError::EmptyPrefix {
                bucket: bucket.to_string(),
            });
        }

        tracing::info!(bucket, prefix, "deleting folder");
        let target = SweepTarget {
            store: self.store,
            retry: self.retry,
            bucket,
            prefix,
            strategy: DeleteStrategy::Batch,
            on_delete_error: OnDeleteError::Abort,
        };
        let report = sweep_matching(&target, |_| true).await?;

        tracing::info!(
            bucket,
            prefix,
            pages = report.pages,
            deleted = report.deleted,
            "folder deleted"
        );
        Ok(report)
    }
}
