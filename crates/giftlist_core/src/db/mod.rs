//! SQLite bootstrap for the durable key-value store.
//!
//! # Invariants
//! - A returned connection has the `kv_store` table and
//!   `PRAGMA user_version = KV_SCHEMA_VERSION`.
//! - Files stamped with a newer version are refused, never rewritten.

mod open;

pub use open::{ensure_kv_schema, open_db, open_db_in_memory, KV_SCHEMA_VERSION};
