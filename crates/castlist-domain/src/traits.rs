//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and
//! infrastructure. Implementations live in other crates.

use crate::{Actor, ActorDraft, ActorFilter, ActorPage, User};

/// Trait for LLM completion calls
///
/// Implemented by the infrastructure layer (castlist-llm). One outbound
/// call per invocation, at most once; failures propagate to the caller.
pub trait CompletionClient {
    /// Error type for completion operations
    type Error;

    /// Send a prompt and return the model's raw text output
    fn complete(&self, prompt: &str) -> Result<String, Self::Error>;
}

/// Trait for persisting users and actor records
///
/// Implemented by the infrastructure layer (castlist-store)
pub trait ActorStore {
    /// Error type for store operations
    type Error;

    /// Return the user with this email, creating one if none exists
    ///
    /// Must be idempotent under races: concurrent callers all receive
    /// the same row, backed by the storage layer's unique email index.
    fn get_or_create_user(&mut self, email: &str) -> Result<User, Self::Error>;

    /// Persist an extracted draft as an actor owned by `user_id`
    ///
    /// A second record with the same `(user_id, description)` pair must
    /// be rejected with the store's duplicate error.
    fn create_actor(&mut self, user_id: i64, draft: &ActorDraft) -> Result<Actor, Self::Error>;

    /// Whether this user already has a record with byte-identical description
    fn has_actor_with_description(
        &self,
        user_id: i64,
        description: &str,
    ) -> Result<bool, Self::Error>;

    /// Query actors matching the filter, newest first, paginated
    fn query_actors(&self, filter: &ActorFilter) -> Result<ActorPage, Self::Error>;
}
