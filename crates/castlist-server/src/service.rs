//! The store pipeline and list service.
//!
//! `submit` runs the full sequence: request-shape validation, the
//! uniqueness guard, resolve-or-create of the user, extraction, and
//! persistence. Every extraction or validation failure is converted
//! into field errors here; callers only see `ServiceError`.

use castlist_domain::traits::{ActorStore, CompletionClient};
use castlist_domain::{Actor, ActorFilter, ActorPage, User};
use castlist_extractor::Extractor;
use castlist_store::{SqliteStore, StoreError};
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

/// Maximum accepted description length in characters
pub const MAX_DESCRIPTION_CHARS: usize = 2_000;

/// A user-facing validation error attached to a form field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Field the error belongs to ("email" or "description")
    pub field: &'static str,

    /// Human-readable message
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Errors surfaced by the actor service
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// One or more user-facing field errors; nothing was persisted
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    /// Storage failure unrelated to user input
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Internal invariant failure (e.g., a poisoned lock)
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Application service for submitting and listing actor records
pub struct ActorService<C>
where
    C: CompletionClient,
{
    store: Arc<Mutex<SqliteStore>>,
    extractor: Extractor<C>,
}

impl<C> ActorService<C>
where
    C: CompletionClient + Send + Sync + 'static,
    C::Error: std::fmt::Display,
{
    /// Create a new service over a shared store and an extractor
    pub fn new(store: Arc<Mutex<SqliteStore>>, extractor: Extractor<C>) -> Self {
        Self { store, extractor }
    }

    /// Run the full store pipeline for one submission
    ///
    /// On success returns the owning user (for session establishment by
    /// the caller) and the stored actor. On any user-facing failure
    /// returns `ServiceError::Validation` and persists nothing beyond
    /// the auto-created user account.
    pub async fn submit(
        &self,
        email: &str,
        description: &str,
    ) -> Result<(User, Actor), ServiceError> {
        let email = normalize_email(email);

        let mut errors = validate_submission(&email, description);
        self.check_unique_description(&email, description, &mut errors)?;
        if !errors.is_empty() {
            return Err(ServiceError::Validation(errors));
        }

        let user = self.with_store(|store| store.get_or_create_user(&email))??;

        let draft = match self.extractor.extract(description).await {
            Ok(draft) => draft,
            Err(e) => {
                warn!("Extraction failed for user {}: {}", user.id, e);
                return Err(ServiceError::Validation(vec![FieldError::new(
                    "description",
                    e.to_string(),
                )]));
            }
        };

        let actor = match self.with_store(|store| store.create_actor(user.id, &draft))? {
            Ok(actor) => actor,
            // Lost a race against a concurrent identical submission; the
            // storage constraint is authoritative
            Err(StoreError::Duplicate) => {
                return Err(ServiceError::Validation(vec![duplicate_error()]));
            }
            Err(e) => return Err(e.into()),
        };

        info!("Stored actor {} for user {}", actor.id, user.id);

        Ok((user, actor))
    }

    /// List actors matching the filter
    pub fn list(&self, filter: &ActorFilter) -> Result<ActorPage, ServiceError> {
        Ok(self.with_store(|store| store.query_actors(filter))??)
    }

    /// Uniqueness guard: flag a duplicate (user, description) pair
    ///
    /// Skips entirely when either input is empty; this is a secondary
    /// check layered on top of the required-field validation. Resolving
    /// the user creates it when absent, matching the store pipeline's
    /// semantics.
    fn check_unique_description(
        &self,
        email: &str,
        description: &str,
        errors: &mut Vec<FieldError>,
    ) -> Result<(), ServiceError> {
        if email.is_empty() || description.is_empty() {
            return Ok(());
        }

        let user = self.with_store(|store| store.get_or_create_user(email))??;
        let exists =
            self.with_store(|store| store.has_actor_with_description(user.id, description))??;

        if exists {
            errors.push(duplicate_error());
        }

        Ok(())
    }

    /// Run a closure against the locked store
    ///
    /// The lock is never held across an await point.
    fn with_store<T>(
        &self,
        f: impl FnOnce(&mut SqliteStore) -> T,
    ) -> Result<T, ServiceError> {
        let mut store = self
            .store
            .lock()
            .map_err(|e| ServiceError::Internal(format!("Store lock poisoned: {}", e)))?;
        Ok(f(&mut store))
    }
}

fn duplicate_error() -> FieldError {
    FieldError::new(
        "description",
        "You have already submitted this description",
    )
}

/// Normalize an email for lookup and storage
///
/// Trimmed and lowercased, so differently-cased submissions resolve to
/// one account.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validate the submission shape before any external call
pub fn validate_submission(email: &str, description: &str) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if email.is_empty() {
        errors.push(FieldError::new("email", "The email field is required"));
    } else if !is_valid_email(email) {
        errors.push(FieldError::new(
            "email",
            "The email must be a valid email address",
        ));
    }

    if description.is_empty() {
        errors.push(FieldError::new(
            "description",
            "The description field is required",
        ));
    } else if description.chars().count() > MAX_DESCRIPTION_CHARS {
        errors.push(FieldError::new(
            "description",
            format!(
                "The description may not be greater than {} characters",
                MAX_DESCRIPTION_CHARS
            ),
        ));
    }

    errors
}

/// Minimal email syntax check: one @, non-empty local part, and a
/// dotted domain without whitespace
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains("..")
        && !domain.contains('@')
}

#[cfg(test)]
mod tests {
    use super::*;
    use castlist_extractor::ExtractorConfig;
    use castlist_llm::MockClient;

    const VALID_RESPONSE: &str = r#"{
        "first_name": "John",
        "last_name": "Doe",
        "address": "New York",
        "gender": "male",
        "height": 180,
        "weight": 75,
        "age": 25
    }"#;

    fn service_with(client: MockClient) -> ActorService<MockClient> {
        let store = Arc::new(Mutex::new(SqliteStore::new(":memory:").unwrap()));
        ActorService::new(store, Extractor::new(client, ExtractorConfig::default()))
    }

    fn test_service() -> ActorService<MockClient> {
        service_with(MockClient::new(VALID_RESPONSE))
    }

    #[tokio::test]
    async fn test_submit_happy_path() {
        let service = test_service();

        let (user, actor) = service
            .submit("actor@example.com", "John Doe, 25, lives in New York")
            .await
            .unwrap();

        assert_eq!(user.email, "actor@example.com");
        assert_eq!(actor.user_id, user.id);
        assert_eq!(actor.first_name, "John");
        assert_eq!(actor.height, Some(180));
        assert_eq!(actor.description, "John Doe, 25, lives in New York");
    }

    #[tokio::test]
    async fn test_submit_reuses_existing_user() {
        let service = test_service();

        let (first, _) = service
            .submit("actor@example.com", "description one")
            .await
            .unwrap();
        let (second, _) = service
            .submit("actor@example.com", "description two")
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_submit_normalizes_email_case() {
        let service = test_service();

        let (first, _) = service
            .submit("Actor@Example.com", "description one")
            .await
            .unwrap();
        let (second, _) = service
            .submit("  actor@example.com ", "description two")
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(first.email, "actor@example.com");
    }

    #[tokio::test]
    async fn test_submit_duplicate_description_rejected() {
        let service = test_service();

        service
            .submit("actor@example.com", "same description")
            .await
            .unwrap();
        let result = service.submit("actor@example.com", "same description").await;

        match result {
            Err(ServiceError::Validation(errors)) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].field, "description");
                assert!(errors[0].message.contains("already submitted"));
            }
            other => panic!("Expected validation error, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_submit_same_description_for_other_user_succeeds() {
        let service = test_service();

        service
            .submit("a@example.com", "shared description")
            .await
            .unwrap();
        let result = service.submit("b@example.com", "shared description").await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_submit_invalid_email_skips_llm() {
        let client = MockClient::new(VALID_RESPONSE);
        let service = service_with(client.clone());

        let result = service.submit("invalid-email", "some description").await;

        match result {
            Err(ServiceError::Validation(errors)) => {
                assert_eq!(errors[0].field, "email");
            }
            other => panic!("Expected validation error, got {:?}", other.map(|_| ())),
        }
        // Rejected before any external call
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn test_submit_oversize_description_skips_llm() {
        let client = MockClient::new(VALID_RESPONSE);
        let service = service_with(client.clone());

        let long = "a".repeat(MAX_DESCRIPTION_CHARS + 1);
        let result = service.submit("actor@example.com", &long).await;

        match result {
            Err(ServiceError::Validation(errors)) => {
                assert_eq!(errors[0].field, "description");
            }
            other => panic!("Expected validation error, got {:?}", other.map(|_| ())),
        }
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn test_submit_extraction_failure_maps_to_description_error() {
        let service = service_with(MockClient::new("not json at all"));

        let result = service.submit("actor@example.com", "gibberish").await;

        match result {
            Err(ServiceError::Validation(errors)) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].field, "description");
            }
            other => panic!("Expected validation error, got {:?}", other.map(|_| ())),
        }

        // Nothing persisted beyond the user
        let page = service.list(&ActorFilter::default()).unwrap();
        assert_eq!(page.total, 0);
    }

    #[tokio::test]
    async fn test_submit_llm_transport_failure_maps_to_description_error() {
        let client = MockClient::new("unused");
        client.fail_with("connection refused");
        let service = service_with(client);

        let result = service.submit("actor@example.com", "anything").await;

        match result {
            Err(ServiceError::Validation(errors)) => {
                assert_eq!(errors[0].field, "description");
            }
            other => panic!("Expected validation error, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_guard_skips_empty_inputs() {
        let service = test_service();
        let mut errors = Vec::new();

        service
            .check_unique_description("", "some description", &mut errors)
            .unwrap();
        service
            .check_unique_description("a@example.com", "", &mut errors)
            .unwrap();

        assert!(errors.is_empty());
    }

    #[tokio::test]
    async fn test_guard_flags_only_the_exact_pair() {
        let service = test_service();
        service.submit("a@example.com", "desc").await.unwrap();

        let mut errors = Vec::new();
        service
            .check_unique_description("a@example.com", "desc", &mut errors)
            .unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "description");

        let mut errors = Vec::new();
        service
            .check_unique_description("a@example.com", "other", &mut errors)
            .unwrap();
        assert!(errors.is_empty());

        let mut errors = Vec::new();
        service
            .check_unique_description("b@example.com", "desc", &mut errors)
            .unwrap();
        assert!(errors.is_empty());
    }

    #[tokio::test]
    async fn test_list_filters_by_user() {
        let service = test_service();

        let (a, _) = service.submit("a@example.com", "first").await.unwrap();
        service.submit("a@example.com", "second").await.unwrap();
        service.submit("b@example.com", "third").await.unwrap();

        let page = service
            .list(&ActorFilter {
                user_id: Some(a.id),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(page.total, 2);
        assert!(page.items.iter().all(|actor| actor.user_id == a.id));
    }

    #[test]
    fn test_validate_submission_collects_both_fields() {
        let errors = validate_submission("", "");
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field, "email");
        assert_eq!(errors[1].field, "description");
    }

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("a@b.com"));
        assert!(is_valid_email("first.last@sub.domain.org"));
        assert!(!is_valid_email("invalid-email"));
        assert!(!is_valid_email("@b.com"));
        assert!(!is_valid_email("a@"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a@.com"));
        assert!(!is_valid_email("a@b..com"));
        assert!(!is_valid_email("a b@c.com"));
    }
}
