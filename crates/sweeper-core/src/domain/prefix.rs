//! MonthPrefix - 月別フォルダのキー prefix（`entry/<YYYY-MM>/`）
//!
//! 現在日時から「N ヶ月前」の月を求めて prefix を作ります。
//! 日付の繰り下げは必ず月初から行うので、3/31 の 1 ヶ月前が 3/3 になるような
//! 日付の溢れは起きません。

use std::fmt;
use std::ops::RangeInclusive;

use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};

/// 月別フォルダの親 prefix
pub const ENTRY_ROOT: &str = "entry/";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MonthPrefix(String);

impl MonthPrefix {
    /// `now` の月から `offset` ヶ月遡った月の prefix
    pub fn months_before(now: DateTime<Utc>, offset: u32) -> Option<Self> {
        let first = NaiveDate::from_ymd_opt(now.year(), now.month(), 1)?;
        let month = first.checked_sub_months(Months::new(offset))?;
        Some(Self(format!("{ENTRY_ROOT}{}/", month.format("%Y-%m"))))
    }

    /// `offsets` の各月の prefix を新しい順に返す
    pub fn range(now: DateTime<Utc>, offsets: RangeInclusive<u32>) -> Vec<Self> {
        offsets
            .filter_map(|offset| Self::months_before(now, offset))
            .collect()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MonthPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn twelve_months_ending_two_months_ago() {
        let prefixes: Vec<String> = MonthPrefix::range(at(2024, 5, 15), 2..=13)
            .into_iter()
            .map(|p| p.to_string())
            .collect();

        assert_eq!(
            prefixes,
            vec![
                "entry/2024-03/",
                "entry/2024-02/",
                "entry/2024-01/",
                "entry/2023-12/",
                "entry/2023-11/",
                "entry/2023-10/",
                "entry/2023-09/",
                "entry/2023-08/",
                "entry/2023-07/",
                "entry/2023-06/",
                "entry/2023-05/",
                "entry/2023-04/",
            ]
        );
    }

    #[rstest]
    #[case::end_of_march(at(2024, 3, 31), 1, "entry/2024-02/")]
    #[case::leap_day(at(2024, 2, 29), 12, "entry/2023-02/")]
    #[case::year_boundary(at(2024, 1, 1), 2, "entry/2023-11/")]
    #[case::current_month(at(2024, 7, 4), 0, "entry/2024-07/")]
    fn month_arithmetic_starts_from_first_of_month(
        #[case] now: DateTime<Utc>,
        #[case] offset: u32,
        #[case] expected: &str,
    ) {
        let prefix = MonthPrefix::months_before(now, offset).unwrap();
        assert_eq!(prefix.as_str(), expected);
    }

    #[test]
    fn prefixes_are_never_empty() {
        for p in MonthPrefix::range(at(2025, 10, 1), 2..=13) {
            assert!(p.as_str().starts_with(ENTRY_ROOT));
            assert!(p.as_str().ends_with('/'));
        }
    }
}
