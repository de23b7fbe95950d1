use std::sync::Arc;
use std::time::Instant;

use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing::get};
use serde_json::json;

use super::response::ApiError;
use super::{comments, documents, drafts};
use crate::service::DocumentService;
use crate::store::Store;

pub struct AppState {
    pub service: DocumentService,
    /// Author recorded on comments until requests are authenticated.
    pub default_user_id: i64,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<dyn Store>, default_user_id: i64) -> Self {
        Self {
            service: DocumentService::new(store),
            default_user_id,
        }
    }
}

/// Method and path of every API route, in registration order.
pub const ROUTE_TABLE: &[(&str, &str)] = &[
    ("GET", "/api/drafts"),
    ("POST", "/api/drafts"),
    ("GET", "/api/drafts/comments"),
    ("GET", "/api/drafts/{id}"),
    ("GET", "/api/drafts/{id}/comments"),
    ("POST", "/api/drafts/{id}/comments"),
    ("GET", "/api/comments/{id}"),
    ("GET", "/api/documents"),
    ("GET", "/api/documents/{id}"),
];

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn no_route() -> ApiError {
    ApiError::not_found("No such route")
}

async fn wrong_method() -> ApiError {
    ApiError::method_not_allowed("Method not allowed")
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let response = next.run(request).await;

    let latency = start.elapsed();
    let status = response.status();

    tracing::info!(
        "{} {} {} {}ms",
        method,
        uri.path(),
        status.as_u16(),
        latency.as_millis()
    );

    response
}

fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        // Drafts
        .route("/drafts", get(drafts::list_drafts).post(drafts::create_draft))
        // Search over draft text; static segment wins over `{id}`
        .route("/drafts/comments", get(drafts::search_drafts))
        .route("/drafts/{id}", get(drafts::get_draft))
        // Comments
        .route(
            "/drafts/{id}/comments",
            get(comments::list_draft_comments).post(comments::create_draft_comment),
        )
        .route("/comments/{id}", get(comments::get_comment))
        // Documents
        .route("/documents", get(documents::list_documents))
        .route("/documents/{id}", get(documents::get_document))
        .method_not_allowed_fallback(wrong_method)
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api", api_router())
        .fallback(no_route)
        .method_not_allowed_fallback(wrong_method)
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}
