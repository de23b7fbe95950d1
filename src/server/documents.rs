use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};

use crate::server::AppState;
use crate::server::extract::PathParam;
use crate::server::response::{ApiError, ServiceResultExt};

/// Every document that has at least one draft, with its newest draft's text.
pub async fn list_documents(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let summaries = state.service.list_documents_with_latest_draft()?;

    Ok::<_, ApiError>(Json(summaries))
}

pub async fn get_document(
    State(state): State<Arc<AppState>>,
    PathParam(id): PathParam<i64>,
) -> impl IntoResponse {
    let document = state
        .service
        .get_document_by_id(id)
        .or_not_found("Document not found")?;

    Ok::<_, ApiError>(Json(document))
}
