//! Status - sweep と run の集計
//!
//! 機械可読な出力は持たず、最後にログ 1 行として出すだけ。

use serde::{Deserialize, Serialize};

/// 1 回の sweep（1 prefix）の集計
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepReport {
    pub pages: usize,
    pub listed: usize,
    pub deleted: usize,
    pub failed_batches: usize,
}

/// run 全体の集計
///
/// `folder_sweeps` / `orphan_sweeps` は失敗した sweep も数える。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub connections: usize,
    pub folder_sweeps: usize,
    pub orphan_sweeps: usize,
    pub failed_sweeps: usize,
    pub deleted: usize,
}

impl RunReport {
    /// 月別フォルダの sweep 1 回分。失敗なら None
    pub fn record_folder(&mut self, sweep: Option<&SweepReport>) {
        self.folder_sweeps += 1;
        self.absorb(sweep);
    }

    /// orphan sweep 1 回分。失敗なら None
    pub fn record_orphan(&mut self, sweep: Option<&SweepReport>) {
        self.orphan_sweeps += 1;
        self.absorb(sweep);
    }

    fn absorb(&mut self, sweep: Option<&SweepReport>) {
        match sweep {
            Some(sweep) => self.deleted += sweep.deleted,
            None => self.failed_sweeps += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folder_and_orphan_sweeps_are_counted_apart() {
        let mut report = RunReport::default();
        let done = SweepReport {
            deleted: 3,
            ..SweepReport::default()
        };

        report.record_folder(Some(&done));
        report.record_folder(None);
        report.record_orphan(Some(&done));

        assert_eq!(report.folder_sweeps, 2);
        assert_eq!(report.orphan_sweeps, 1);
        assert_eq!(report.failed_sweeps, 1);
        assert_eq!(report.deleted, 6);
    }
}
