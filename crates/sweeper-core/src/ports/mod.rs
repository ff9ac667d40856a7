//! Ports - 抽象化レイヤー
//!
//! 外部システム（オブジェクトストレージ、時計）へのインターフェース。
//! 実装は `impls` にあり、テストでは InMemory 実装に差し替えます。

pub mod clock;
pub mod connector;
pub mod object_store;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::connector::StoreConnector;
pub use self::object_store::ObjectStore;
