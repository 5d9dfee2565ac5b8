//! HTTP surface: router, handlers, and error mapping.
//!
//! Handlers are thin wrappers over [`BookStore`] operations; the store handle
//! is injected through axum state rather than living in a global. Store
//! errors map onto the wire contract through [`ApiError`].

use crate::book::Book;
use crate::error::Error;
use crate::limit::{RateLimitConfig, RateLimiter};
use crate::store::BookStore;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{ConnectInfo, Path, Query, Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, put};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;

/// Shared state for the router: the store handle and the books-endpoint
/// rate limiter.
#[derive(Clone)]
pub struct AppState {
    store: Arc<BookStore>,
    limiter: Arc<RateLimiter>,
}

impl AppState {
    /// State wrapping `store`, with `limits` applied to `/api/books`.
    pub fn new(store: Arc<BookStore>, limits: RateLimitConfig) -> Self {
        Self {
            store,
            limiter: Arc::new(RateLimiter::new(limits)),
        }
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &BookStore {
        &self.store
    }
}

/// Builds the full application router.
pub fn router(state: AppState) -> Router {
    let books = Router::new()
        .route("/api/books", get(list_books).post(create_book))
        .route_layer(middleware::from_fn_with_state(state.clone(), throttle));

    Router::new()
        .route("/", get(home))
        .merge(books)
        .route("/api/books/:id", put(update_book))
        .route("/api/books/delete/:id", delete(delete_book))
        .fallback(not_found)
        .layer(middleware::map_response(normalize_method_not_allowed))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Error mapping
// ---------------------------------------------------------------------------

/// Store and routing failures as seen on the wire.
#[derive(Debug)]
pub enum ApiError {
    /// No book with the requested id.
    BookNotFound,
    /// Submitted record or patch was rejected by validation.
    InvalidBook,
    /// The request never matched a usable route (bad id segment).
    RouteNotFound,
    /// Persistence or serialization failure.
    Internal(String),
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::NotFound(_) => ApiError::BookNotFound,
            Error::InvalidBook(_) => ApiError::InvalidBook,
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BookNotFound => (StatusCode::NOT_FOUND, json!({"error": "Book not found"})),
            ApiError::InvalidBook => {
                (StatusCode::BAD_REQUEST, json!({"error": "Invalid book data"}))
            }
            ApiError::RouteNotFound => (StatusCode::NOT_FOUND, json!({"error": "Not Found"})),
            ApiError::Internal(msg) => {
                // Full detail (including paths) goes to the log only.
                tracing::error!(error = %msg, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({"error": "Internal Server Error"}),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn home() -> impl IntoResponse {
    (StatusCode::IM_A_TEAPOT, "I am a teapot")
}

#[derive(Debug, Deserialize)]
struct ListParams {
    author: Option<String>,
}

async fn list_books(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Json<Vec<Book>> {
    let books = match params.author {
        Some(author) => {
            tracing::info!(%author, "listing books by author");
            state.store.by_author(&author)
        }
        None => {
            tracing::info!("listing all books");
            state.store.list()
        }
    };
    Json(books)
}

async fn create_book(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(record) = payload.map_err(|_| ApiError::InvalidBook)?;
    let book = state.store.add(record)?;
    Ok((
        StatusCode::CREATED,
        Json(json!({"book added": book.title})),
    ))
}

async fn update_book(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Book>, ApiError> {
    let Path(id) = id.map_err(|_| ApiError::RouteNotFound)?;
    let Json(patch) = payload.map_err(|_| ApiError::InvalidBook)?;
    let book = state.store.update(id, patch)?;
    Ok(Json(book))
}

async fn delete_book(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
) -> Result<Json<Value>, ApiError> {
    let Path(id) = id.map_err(|_| ApiError::RouteNotFound)?;
    let removed = state.store.remove(id)?;
    Ok(Json(json!({"book deleted": removed.title})))
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({"error": "Not Found"})))
}

// ---------------------------------------------------------------------------
// Middleware
// ---------------------------------------------------------------------------

/// One token per request from the peer's bucket; 429 when empty. Requests
/// arriving without peer info (direct service calls in tests) share one
/// bucket under a fixed key.
async fn throttle(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let key = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string());
    if state.limiter.allow(&key) {
        next.run(req).await
    } else {
        tracing::warn!(%key, "rate limit exceeded");
        (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({"error": "Too Many Requests"})),
        )
            .into_response()
    }
}

/// axum's built-in method-not-allowed response has an empty body; give it
/// the catalog's JSON error shape instead.
async fn normalize_method_not_allowed(response: Response) -> Response {
    if response.status() == StatusCode::METHOD_NOT_ALLOWED {
        (
            StatusCode::METHOD_NOT_ALLOWED,
            Json(json!({"error": "Method Not Allowed"})),
        )
            .into_response()
    } else {
        response
    }
}
