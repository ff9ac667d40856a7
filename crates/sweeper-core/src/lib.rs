//! sweeper-core
//!
//! Scheduled cleanup of competition entry images in object storage.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（connection, month prefix, object view, errors）
//! - **ports**: 抽象化レイヤー（ObjectStore, StoreConnector, Clock）
//! - **app**: sweep ロジック（sweep_matching, FolderSweeper, OrphanSweeper, Driver, retry）
//! - **impls**: 実装（InMemoryObjectStore, S3ObjectStore）
//! - **config**: 実行時の設定値
//! - **logging**: tracing の初期化

pub mod app;
pub mod config;
pub mod domain;
pub mod impls;
pub mod logging;
pub mod ports;
