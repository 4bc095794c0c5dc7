//! HTTP request handlers for the actor service.
//!
//! Implements the submission and listing endpoints plus a health check
//! using axum. The submission handler establishes the session: it mints
//! a token for the user returned by the store pipeline.

use crate::service::{ActorService, FieldError, ServiceError};
use crate::session::SessionManager;
use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router as AxumRouter,
};
use castlist_domain::traits::CompletionClient;
use castlist_domain::{Actor, ActorFilter, ActorPage, Gender};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Shared application state
pub struct AppState<C>
where
    C: CompletionClient,
{
    /// Actor submission and listing service
    pub service: Arc<ActorService<C>>,
    /// Session manager for token operations
    pub sessions: Arc<SessionManager>,
}

impl<C> Clone for AppState<C>
where
    C: CompletionClient,
{
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            sessions: Arc::clone(&self.sessions),
        }
    }
}

/// Submission request body
#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    /// Submitter email; the account is created on first use
    #[serde(default)]
    pub email: Option<String>,

    /// Free-text person description
    #[serde(default)]
    pub description: Option<String>,
}

/// Query parameters for the listing endpoint
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    first_name: Option<String>,
    last_name: Option<String>,
    address: Option<String>,
    gender: Option<String>,
    description: Option<String>,
    height: Option<u32>,
    weight: Option<u32>,
    age: Option<u32>,
    page: Option<u32>,
    per_page: Option<u32>,
}

impl ListParams {
    /// Build the filter for the authenticated user
    ///
    /// Empty string parameters apply no constraint, matching the
    /// "present means filter" semantics of the form.
    fn into_filter(self, user_id: i64) -> ActorFilter {
        ActorFilter {
            user_id: Some(user_id),
            first_name: self.first_name.filter(|s| !s.is_empty()),
            last_name: self.last_name.filter(|s| !s.is_empty()),
            address: self.address.filter(|s| !s.is_empty()),
            gender: self.gender.as_deref().and_then(Gender::parse),
            description: self.description.filter(|s| !s.is_empty()),
            height: self.height,
            weight: self.weight,
            age: self.age,
            page: self.page,
            per_page: self.per_page,
        }
    }
}

/// Wire representation of a stored actor
#[derive(Debug, Serialize, Deserialize)]
pub struct ActorView {
    /// Record identifier
    pub id: i64,
    /// Extracted first name
    pub first_name: String,
    /// Extracted last name
    pub last_name: String,
    /// Extracted address
    pub address: String,
    /// Extracted gender, if stated
    pub gender: Option<String>,
    /// Height, if stated
    pub height: Option<u32>,
    /// Weight, if stated
    pub weight: Option<u32>,
    /// Age, if stated
    pub age: Option<u32>,
    /// Original submitted description
    pub description: String,
    /// Creation timestamp (Unix epoch seconds)
    pub created_at: u64,
}

impl From<&Actor> for ActorView {
    fn from(actor: &Actor) -> Self {
        Self {
            id: actor.id,
            first_name: actor.first_name.clone(),
            last_name: actor.last_name.clone(),
            address: actor.address.clone(),
            gender: actor.gender.map(|g| g.as_str().to_string()),
            height: actor.height,
            weight: actor.weight,
            age: actor.age,
            description: actor.description.clone(),
            created_at: actor.created_at,
        }
    }
}

/// Successful submission response
#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitResponse {
    /// Session token for the owning user
    pub token: String,
    /// The stored record
    pub actor: ActorView,
}

/// One page of the listing response
#[derive(Debug, Serialize, Deserialize)]
pub struct ListResponse {
    /// Records on this page, newest first
    pub items: Vec<ActorView>,
    /// Total records matching the filter
    pub total: u64,
    /// 1-based page number
    pub page: u32,
    /// Page size used
    pub per_page: u32,
    /// Number of pages covering the total
    pub total_pages: u64,
}

impl From<&ActorPage> for ListResponse {
    fn from(page: &ActorPage) -> Self {
        Self {
            items: page.items.iter().map(ActorView::from).collect(),
            total: page.total,
            page: page.page,
            per_page: page.per_page,
            total_pages: page.total_pages(),
        }
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// Overall health status
    pub status: String,
}

/// One field-level error on the wire
#[derive(Debug, Serialize, Deserialize)]
pub struct FieldErrorView {
    /// Field the error belongs to
    pub field: String,
    /// Human-readable message
    pub message: String,
}

/// Validation failure response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ValidationResponse {
    /// Field-level errors, in check order
    pub errors: Vec<FieldErrorView>,
}

/// Non-validation error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// User-facing field errors
    Validation(Vec<FieldError>),
    /// Missing or invalid session token
    Unauthorized(String),
    /// Internal server error
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(errors) => {
                let body = ValidationResponse {
                    errors: errors
                        .into_iter()
                        .map(|e| FieldErrorView {
                            field: e.field.to_string(),
                            message: e.message,
                        })
                        .collect(),
                };
                (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
            }
            AppError::Unauthorized(message) => (
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse { error: message }),
            )
                .into_response(),
            AppError::Internal(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse { error: message }),
            )
                .into_response(),
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(errors) => AppError::Validation(errors),
            ServiceError::Store(e) => AppError::Internal(e.to_string()),
            ServiceError::Internal(message) => AppError::Internal(message),
        }
    }
}

/// POST /actors - Submit a description and store the extracted record
async fn submit_actor<C>(
    State(state): State<AppState<C>>,
    Json(request): Json<SubmitRequest>,
) -> Result<Response, AppError>
where
    C: CompletionClient + Send + Sync + 'static,
    C::Error: std::fmt::Display,
{
    let email = request.email.unwrap_or_default();
    let description = request.description.unwrap_or_default();

    let (user, actor) = state.service.submit(&email, &description).await?;

    let token = state
        .sessions
        .generate_token(user.id)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let body = SubmitResponse {
        token,
        actor: ActorView::from(&actor),
    };

    Ok((StatusCode::CREATED, Json(body)).into_response())
}

/// GET /actors - List the authenticated user's records, filtered and paginated
async fn list_actors<C>(
    State(state): State<AppState<C>>,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Result<Json<ListResponse>, AppError>
where
    C: CompletionClient + Send + Sync + 'static,
    C::Error: std::fmt::Display,
{
    let token = bearer_token(&headers)
        .ok_or_else(|| AppError::Unauthorized("Missing session token".to_string()))?;

    let claims = state
        .sessions
        .validate_token(token)
        .map_err(|e| AppError::Unauthorized(e.to_string()))?;

    let filter = params.into_filter(claims.user_id);
    let page = state.service.list(&filter)?;

    Ok(Json(ListResponse::from(&page)))
}

/// GET /health - Liveness check
async fn health_check() -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "ok".to_string(),
    })
}

/// Extract a bearer token from the Authorization header
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Create the axum router with all routes
pub fn create_router<C>(state: AppState<C>) -> AxumRouter
where
    C: CompletionClient + Send + Sync + 'static,
    C::Error: std::fmt::Display,
{
    AxumRouter::new()
        .route("/actors", get(list_actors::<C>).post(submit_actor::<C>))
        .route("/health", get(health_check))
        .with_state(state)
}
