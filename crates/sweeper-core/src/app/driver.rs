//! Driver - 1 回の cleanup pass
//!
//! # フロー（active な接続ごと、逐次）
//! 1. StoreConnector でクライアントを組み立てる（失敗は fatal）
//! 2. 2〜13 ヶ月前の月別フォルダを FolderSweeper で削除
//! 3. OrphanSweeper を 1 回
//!
//! sweep の失敗はログに残して次の prefix / 接続へ進む。

use crate::config::SweepConfig;
use crate::domain::{ConnectionStore, MonthPrefix, SweepError};
use crate::ports::{Clock, StoreConnector};

use super::folder::FolderSweeper;
use super::orphan::OrphanSweeper;
use super::status::RunReport;

pub struct Driver<C, K> {
    connector: C,
    clock: K,
    config: SweepConfig,
}

impl<C: StoreConnector, K: Clock> Driver<C, K> {
    pub fn new(connector: C, clock: K, config: SweepConfig) -> Self {
        Self {
            connector,
            clock,
            config,
        }
    }

    /// active な接続をすべて処理する
    ///
    /// `Err` を返すのはクライアント構築（認証情報の解決）に失敗したときだけ。
    pub async fn run(&self, connections: &ConnectionStore) -> Result<RunReport, SweepError> {
        let mut report = RunReport::default();

        for connection in connections.active() {
            let bucket = connection.bucket.as_str();
            let store = self.connector.connect(connection).await?;
            report.connections += 1;

            let prefixes = MonthPrefix::range(self.clock.now(), self.config.month_offsets.clone());
            let folders = FolderSweeper::new(store.as_ref(), &self.config.retry);
            for prefix in &prefixes {
                match folders.delete_folder(bucket, prefix.as_str()).await {
                    Ok(sweep) => report.record_folder(Some(&sweep)),
                    Err(err) => {
                        tracing::error!(bucket, prefix = %prefix, error = %err, "folder sweep failed");
                        report.record_folder(None);
                    }
                }
            }

            let orphans = OrphanSweeper::new(store.as_ref(), &self.clock, &self.config);
            match orphans.delete_orphaned_images(bucket).await {
                Ok(sweep) => report.record_orphan(Some(&sweep)),
                Err(err) => {
                    tracing::error!(bucket, error = %err, "orphan sweep failed");
                    report.record_orphan(None);
                }
            }
        }

        tracing::info!(
            connections = report.connections,
            folder_sweeps = report.folder_sweeps,
            orphan_sweeps = report.orphan_sweeps,
            failed_sweeps = report.failed_sweeps,
            deleted = report.deleted,
            "cleanup pass finished"
        );
        Ok(report)
    }
}
