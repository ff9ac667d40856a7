//! Impls - ports の実装
//!
//! - **InMemoryObjectStore**: 開発・テスト用
//! - **S3ObjectStore** / **S3Connector**: 本番用（AWS SDK）

pub mod inmem_store;
pub mod s3;

pub use self::inmem_store::{CallCounts, InMemoryObjectStore};
pub use self::s3::{S3Connector, S3ObjectStore};
