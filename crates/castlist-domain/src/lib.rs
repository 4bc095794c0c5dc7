//! Castlist Domain Layer
//!
//! Core business types for the actor-request application. This crate has
//! ZERO external dependencies and defines the fundamental records, value
//! objects, and trait interfaces that all other layers depend upon.
//!
//! ## Key Concepts
//!
//! - **ActorDraft**: a structured record extracted from free text, not yet persisted
//! - **Actor**: a stored record owned by a user account
//! - **User**: an account auto-created from an email address
//! - **ActorFilter**: optional conjunctive criteria for list queries
//!
//! ## Architecture
//!
//! - No external crate dependencies
//! - Pure business logic only
//! - Infrastructure implementations live in other crates
//! - Trait definitions for all external interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod actor;
pub mod filter;
pub mod traits;
pub mod user;

// Re-exports for convenience
pub use actor::{Actor, ActorDraft, Gender};
pub use filter::{ActorFilter, ActorPage, DEFAULT_PER_PAGE};
pub use user::User;
