//! OrphanSweeper - `entry/images/` 配下の古い画像を削除
//!
//! 月別フォルダに属さない画像は、最終更新からの経過時間で個別に期限切れにする。
//! 経過時間がしきい値を超えたものだけが削除対象（ちょうどは残す）。

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};

use crate::config::{ORPHAN_PREFIX, OrphanDeleteMode, SweepConfig};
use crate::domain::{StorageObject, SweepError};
use crate::ports::{Clock, ObjectStore};

use super::RetryPolicy;
use super::status::SweepReport;
use super::sweep::{DeleteStrategy, OnDeleteError, SweepTarget, sweep_matching};

pub struct OrphanSweeper<'a> {
    store: &'a dyn ObjectStore,
    clock: &'a dyn Clock,
    retry: &'a RetryPolicy,
    max_age: TimeDelta,
    mode: OrphanDeleteMode,
}

impl<'a> OrphanSweeper<'a> {
    pub fn new(store: &'a dyn ObjectStore, clock: &'a dyn Clock, config: &'a SweepConfig) -> Self {
        Self {
            store,
            clock,
            retry: &config.retry,
            max_age: to_delta(config.orphan_max_age),
            mode: config.orphan_delete_mode,
        }
    }

    pub async fn delete_orphaned_images(&self, bucket: &str) -> Result<SweepReport, SweepError> {
        let (strategy, on_delete_error) = match self.mode {
            OrphanDeleteMode::Batch => (DeleteStrategy::Batch, OnDeleteError::Continue),
            OrphanDeleteMode::Individual => (DeleteStrategy::Individual, OnDeleteError::Abort),
        };
        let target = SweepTarget {
            store: self.store,
            retry: self.retry,
            bucket,
            prefix: ORPHAN_PREFIX,
            strategy,
            on_delete_error,
        };

        tracing::info!(
            bucket,
            prefix = ORPHAN_PREFIX,
            max_age_secs = self.max_age.num_seconds(),
            mode = ?self.mode,
            "deleting orphaned images"
        );
        let max_age = self.max_age;
        let report = sweep_matching(&target, |obj| is_expired(obj, self.clock.now(), max_age)).await?;

        tracing::info!(
            bucket,
            listed = report.listed,
            deleted = report.deleted,
            failed_batches = report.failed_batches,
            "orphaned images deleted"
        );
        Ok(report)
    }
}

fn to_delta(d: Duration) -> TimeDelta {
    TimeDelta::from_std(d).unwrap_or(TimeDelta::MAX)
}

fn is_expired(obj: &StorageObject, now: DateTime<Utc>, max_age: TimeDelta) -> bool {
    match obj.last_modified {
        Some(modified) => now - modified > max_age,
        None => {
            tracing::debug!(key = %obj.key, "no last-modified, skipping");
            false
        }
    }
}
