//! Persistence layer for the Guidebook backend.
//!
//! This crate contains:
//! - Database connection management
//! - Entity definitions (database row mappings)
//! - Repository implementations
//!
//! Repositories express the domain visibility predicate as SQL so row-level
//! filtering happens in the database, not in application memory.

pub mod db;
pub mod entities;
pub mod repositories;
