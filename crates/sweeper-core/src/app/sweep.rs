//! Sweep - prefix 配下をページ単位で一覧し、条件に合うものを削除する共通ルーチン
//!
//! FolderSweeper（無条件）と OrphanSweeper（経過時間）はこのルーチンに
//! 別々の predicate を渡しているだけです。
//!
//! # フロー
//! 1. カーソル付きで 1 ページ一覧
//! 2. 空ページなら終了（1 ページ目でも最終ページでも同じ）
//! 3. predicate に合うキーを集める
//! 4. 削除（一括 or 1 件ずつ）
//! 5. 次のカーソルがあれば 1 へ

use crate::domain::{StorageObject, SweepError};
use crate::ports::ObjectStore;

use super::RetryPolicy;
use super::status::SweepReport;

/// 削除リクエストの粒度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteStrategy {
    /// 1 ページ = 1 回の quiet 一括削除
    Batch,
    /// 1 オブジェクト = 1 回の削除
    Individual,
}

/// 削除失敗時の扱い
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnDeleteError {
    /// sweep を中断してエラーを返す
    Abort,
    /// ログに残して次のページへ
    Continue,
}

/// sweep 対象と削除方針
pub struct SweepTarget<'a> {
    pub store: &'a dyn ObjectStore,
    pub retry: &'a RetryPolicy,
    pub bucket: &'a str,
    pub prefix: &'a str,
    pub strategy: DeleteStrategy,
    pub on_delete_error: OnDeleteError,
}

/// `target.prefix` 配下で `predicate` を満たすオブジェクトをすべて削除
pub async fn sweep_matching<P>(
    target: &SweepTarget<'_>,
    mut predicate: P,
) -> Result<SweepReport, SweepError>
where
    P: FnMut(&StorageObject) -> bool,
{
    let store = target.store;
    let (bucket, prefix) = (target.bucket, target.prefix);
    let mut report = SweepReport::default();
    let mut cursor: Option<String> = None;

    loop {
        let after = cursor.as_deref();
        let page = target
            .retry
            .run("list_objects", move || store.list_page(bucket, prefix, after))
            .await?;

        if page.is_empty() {
            tracing::debug!(bucket, prefix, pages = report.pages, "no more objects");
            return Ok(report);
        }

        report.pages += 1;
        report.listed += page.objects.len();

        let candidates: Vec<String> = page
            .objects
            .iter()
            .filter(|obj| predicate(*obj))
            .map(|obj| obj.key.clone())
            .collect();

        tracing::info!(
            bucket,
            prefix,
            page = report.pages,
            listed = page.objects.len(),
            candidates = candidates.len(),
            "sweeping page"
        );

        if !candidates.is_empty() {
            let outcome = match target.strategy {
                DeleteStrategy::Batch => delete_batch(target, &candidates).await,
                DeleteStrategy::Individual => delete_each(target, &candidates).await,
            };
            match outcome {
                Ok(deleted) => report.deleted += deleted,
                Err((deleted, err)) => {
                    report.deleted += deleted;
                    if target.on_delete_error == OnDeleteError::Abort {
                        return Err(err);
                    }
                    report.failed_batches += 1;
                    tracing::error!(
                        bucket,
                        prefix,
                        page = report.pages,
                        error = %err,
                        "delete failed, continuing with next page"
                    );
                }
            }
        }

        match page.next_cursor {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    Ok(report)
}

/// 失敗時は (削除できた件数, エラー)
type DeleteOutcome = Result<usize, (usize, SweepError)>;

async fn delete_batch(target: &SweepTarget<'_>, keys: &[String]) -> DeleteOutcome {
    let store = target.store;
    let bucket = target.bucket;
    match target
        .retry
        .run("delete_objects", move || store.delete_objects(bucket, keys))
        .await
    {
        Ok(()) => Ok(keys.len()),
        Err(err) => {
            let deleted = match &err {
                SweepError::DeleteRejected { failed, .. } => keys.len().saturating_sub(*failed),
                _ => 0,
            };
            Err((deleted, err))
        }
    }
}

async fn delete_each(target: &SweepTarget<'_>, keys: &[String]) -> DeleteOutcome {
    let store = target.store;
    let bucket = target.bucket;
    for (done, key) in keys.iter().enumerate() {
        let key = key.as_str();
        target
            .retry
            .run("delete_object", move || store.delete_object(bucket, key))
            .await
            .map_err(|err| (done, err))?;
    }
    Ok(keys.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorKind;
    use crate::impls::InMemoryObjectStore;
    use chrono::{TimeZone, Utc};

    async fn seeded(page_size: usize, keys: &[&str]) -> InMemoryObjectStore {
        let store = InMemoryObjectStore::with_page_size(page_size);
        let t = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        for key in keys {
            store.put("bucket", key, t).await;
        }
        store
    }

    fn target<'a>(
        store: &'a InMemoryObjectStore,
        retry: &'a RetryPolicy,
        strategy: DeleteStrategy,
        on_delete_error: OnDeleteError,
    ) -> SweepTarget<'a> {
        SweepTarget {
            store,
            retry,
            bucket: "bucket",
            prefix: "p/",
            strategy,
            on_delete_error,
        }
    }

    #[tokio::test]
    async fn predicate_selects_what_is_deleted() {
        let store = seeded(10, &["p/keep-1", "p/drop-1", "p/drop-2", "q/drop-3"]).await;
        let retry = RetryPolicy::none();
        let t = target(&store, &retry, DeleteStrategy::Batch, OnDeleteError::Abort);

        let report = sweep_matching(&t, |obj| obj.key.contains("drop"))
            .await
            .unwrap();

        assert_eq!(report.deleted, 2);
        assert_eq!(report.listed, 3);
        assert_eq!(
            store.keys("bucket").await,
            vec!["p/keep-1".to_string(), "q/drop-3".to_string()]
        );
    }

    #[tokio::test]
    async fn page_without_candidates_issues_no_delete() {
        let store = seeded(10, &["p/a", "p/b"]).await;
        let retry = RetryPolicy::none();
        let t = target(&store, &retry, DeleteStrategy::Batch, OnDeleteError::Abort);

        let report = sweep_matching(&t, |_| false).await.unwrap();

        assert_eq!(report.deleted, 0);
        assert_eq!(store.calls().await.delete_objects, 0);
    }

    #[tokio::test]
    async fn continue_policy_moves_past_failed_batches() {
        let store = seeded(2, &["p/1", "p/2", "p/3", "p/4"]).await;
        store.protect("p/1").await;
        let retry = RetryPolicy::none();
        let t = target(&store, &retry, DeleteStrategy::Batch, OnDeleteError::Continue);

        let report = sweep_matching(&t, |_| true).await.unwrap();

        assert_eq!(report.failed_batches, 1);
        assert_eq!(report.deleted, 3);
        assert_eq!(store.keys("bucket").await, vec!["p/1".to_string()]);
    }

    #[tokio::test]
    async fn abort_policy_stops_at_first_failure() {
        let store = seeded(2, &["p/1", "p/2", "p/3", "p/4"]).await;
        store.protect("p/1").await;
        let retry = RetryPolicy::none();
        let t = target(&store, &retry, DeleteStrategy::Batch, OnDeleteError::Abort);

        let err = sweep_matching(&t, |_| true).await.unwrap_err();

        assert!(matches!(err, SweepError::DeleteRejected { .. }));
        assert_eq!(store.calls().await.list, 1);
        assert_eq!(store.keys("bucket").await.len(), 3);
    }

    #[tokio::test]
    async fn individual_strategy_deletes_one_by_one() {
        let store = seeded(10, &["p/1", "p/2", "p/3"]).await;
        let retry = RetryPolicy::none();
        let t = target(&store, &retry, DeleteStrategy::Individual, OnDeleteError::Abort);

        let report = sweep_matching(&t, |_| true).await.unwrap();

        assert_eq!(report.deleted, 3);
        let calls = store.calls().await;
        assert_eq!(calls.delete_object, 3);
        assert_eq!(calls.delete_objects, 0);
    }

    #[tokio::test]
    async fn transient_list_failure_is_retried() {
        let store = seeded(10, &["p/1"]).await;
        store.fail_next_lists(1).await;
        let retry = RetryPolicy {
            max_attempts: 2,
            base_delay: std::time::Duration::ZERO,
            multiplier: 1.0,
        };
        let t = target(&store, &retry, DeleteStrategy::Batch, OnDeleteError::Abort);

        let report = sweep_matching(&t, |_| true).await.unwrap();

        assert_eq!(report.deleted, 1);
        assert_eq!(store.calls().await.list, 2);
    }

    #[tokio::test]
    async fn permanent_list_failure_is_returned() {
        let store = seeded(10, &["p/1"]).await;
        store.fail_list("p/", ErrorKind::Permanent).await;
        let retry = RetryPolicy::default();
        let t = target(&store, &retry, DeleteStrategy::Batch, OnDeleteError::Continue);

        let err = sweep_matching(&t, |_| true).await.unwrap_err();

        assert!(matches!(err, SweepError::List { .. }));
        assert_eq!(store.calls().await.list, 1);
    }
}
