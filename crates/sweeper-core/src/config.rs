//! 実行時の設定値
//!
//! CLI フラグは持たないので、ここの `Default` がそのまま本番の値になります。

use std::ops::RangeInclusive;
use std::time::Duration;

use crate::app::RetryPolicy;

/// orphan 画像の固定 prefix（設定では変えられない）
pub const ORPHAN_PREFIX: &str = "entry/images/";

/// orphan 画像の削除方法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrphanDeleteMode {
    /// ページごとに一括削除。失敗したページはログに残して次のページへ進む
    #[default]
    Batch,
    /// 1 オブジェクトずつ削除。1 件でも失敗したら sweep を中断
    Individual,
}

#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// 削除対象の月オフセット（2 = 2 ヶ月前）
    pub month_offsets: RangeInclusive<u32>,
    /// これより古い orphan を削除する（境界ちょうどは残す）
    pub orphan_max_age: Duration,
    pub orphan_delete_mode: OrphanDeleteMode,
    pub retry: RetryPolicy,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            month_offsets: 2..=13,
            orphan_max_age: Duration::from_secs(24 * 60 * 60),
            orphan_delete_mode: OrphanDeleteMode::Batch,
            retry: RetryPolicy::default(),
        }
    }
}

/// ストレージクライアントの構築パラメータ
///
/// 明示しない項目は SDK の既定の解決順（環境変数 → 共有プロファイル → インスタンスロール）に任せる。
#[derive(Debug, Clone)]
pub struct StorageSettings {
    pub region: Option<String>,
    /// S3 互換ストレージ（MinIO など）のエンドポイント
    pub endpoint_url: Option<String>,
    pub profile: Option<String>,
    /// path-style アドレッシング（`https://host/bucket/key`）
    pub force_path_style: bool,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            region: None,
            endpoint_url: None,
            profile: None,
            force_path_style: true,
        }
    }
}
