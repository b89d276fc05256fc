//! Domain layer for the Guidebook backend.
//!
//! This crate contains:
//! - Core model types (caller identity, roles, field enums)
//! - Pure authorization logic (visibility predicate, access-control policy)
//!
//! Nothing in here performs I/O; everything is unit-testable without a store.

pub mod models;
pub mod services;

pub use models::user::{Caller, Role};
