//! Core data store for the gift list tracker.
//! This crate is the single source of truth for people/ideas invariants.

pub mod codec;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod ordering;
pub mod repo;
pub mod store;

pub use codec::{decode_people, encode_people, CodecError};
pub use config::CoreConfig;
pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingError};
pub use model::person::{
    normalize_date_input, parse_date_of_birth, DateInputFormat, Idea, IdeaId,
    ModelValidationError, Person, PersonId,
};
pub use ordering::order_by_birthday;
pub use repo::people_repo::{Loaded, MissingEntity, PeopleRepository, RepoError, RepoResult};
pub use store::{KeyValueStore, MemoryStore, SqliteKvStore, StoreError, StoreResult, PEOPLE_KEY};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
