//! App - アプリケーション層
//!
//! ports を組み合わせて cleanup のロジックを実装します。
//!
//! # 主要コンポーネント
//! - **sweep_matching**: ページング + predicate + 削除の共通ルーチン
//! - **FolderSweeper**: 月別フォルダの無条件削除
//! - **OrphanSweeper**: `entry/images/` の経過時間による削除
//! - **Driver**: 接続ごとに上の 2 つを回す
//! - **RetryPolicy**: 一時的なエラーのリトライ

pub mod driver;
pub mod folder;
pub mod orphan;
pub mod retry;
pub mod status;
pub mod sweep;

pub use self::driver::Driver;
pub use self::folder::FolderSweeper;
pub use self::orphan::OrphanSweeper;
pub use self::retry::RetryPolicy;
pub use self::status::{RunReport, SweepReport};
pub use self::sweep::{DeleteStrategy, OnDeleteError, SweepTarget, sweep_matching};
