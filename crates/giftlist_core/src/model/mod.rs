//! Domain model for tracked people and their gift ideas.
//!
//! # Responsibility
//! - Define the canonical People -> Ideas entity graph.
//! - Own field-level validation shared by repository write and read paths.
//!
//! # Invariants
//! - Every person and idea is identified by a stable UUID.
//! - Ideas exist only inside their owning person's list.

pub mod person;
