//! Durable key-value store contract and implementations.
//!
//! # Responsibility
//! - Define the single-slot blob contract the people repository persists through.
//! - Provide a SQLite-backed durable store and an in-process store.
//!
//! # Invariants
//! - `set` either stores the whole blob or fails; no partial writes are visible.
//! - `get` returns `Ok(None)` for a key that was never written.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteKvStore;

/// Key holding the serialized people collection.
pub const PEOPLE_KEY: &str = "people";
/// Key receiving an unreadable people blob before the repository starts empty.
pub const CORRUPT_PEOPLE_KEY: &str = "people.corrupt";

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug)]
pub enum StoreError {
    Sqlite(rusqlite::Error),
    /// The database was stamped by a newer schema than this build knows.
    IncompatibleSchema { found: u32, supported: u32 },
    /// The backend refused the operation.
    Unavailable(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::IncompatibleSchema { found, supported } => write!(
                f,
                "key-value schema version {found} is newer than supported {supported}"
            ),
            Self::Unavailable(message) => write!(f, "store unavailable: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::IncompatibleSchema { .. } | Self::Unavailable(_) => None,
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Blob store addressed by string keys.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    fn set(&mut self, key: &str, blob: &str) -> StoreResult<()>;
}
