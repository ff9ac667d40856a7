//! Domain model (connections, month prefixes, object views, errors).

pub mod connection;
pub mod errors;
pub mod object;
pub mod prefix;

pub use self::connection::{CONNECTIONS_FILE, Connection, ConnectionStore};
pub use self::errors::{ConfigError, ErrorKind, SweepError};
pub use self::object::{ListPage, StorageObject};
pub use self::prefix::{ENTRY_ROOT, MonthPrefix};
