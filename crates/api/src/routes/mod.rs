//! HTTP route handlers.

pub mod activities;
pub mod auth;
pub mod guides;
pub mod health;
pub mod invitations;
pub mod users;
