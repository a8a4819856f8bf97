//! Repository layer over the durable key-value store.
//!
//! # Responsibility
//! - Own the canonical in-memory people collection.
//! - Keep memory and the stored blob reconciled after every mutation.
//!
//! # Invariants
//! - Write paths validate input before touching memory or storage.
//! - Repository APIs return semantic errors (`NotFound`, `Validation`) in
//!   addition to storage errors.

pub mod people_repo;
