use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};

use crate::server::AppState;
use crate::server::dto::{CreateDraftRequest, SearchDraftsParams};
use crate::server::extract::{JsonBody, PathParam, QueryParam};
use crate::server::response::{ApiError, ServiceResultExt};

pub async fn list_drafts(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let drafts = state.service.list_drafts()?;

    Ok::<_, ApiError>(Json(drafts))
}

pub async fn create_draft(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<CreateDraftRequest>,
) -> impl IntoResponse {
    let draft = state.service.create_draft(&req.name, &req.text)?;

    Ok::<_, ApiError>((StatusCode::CREATED, Json(draft)))
}

pub async fn get_draft(
    State(state): State<Arc<AppState>>,
    PathParam(id): PathParam<i64>,
) -> impl IntoResponse {
    let draft = state
        .service
        .get_draft_by_id(id)
        .or_not_found("Draft not found")?;

    Ok::<_, ApiError>(Json(draft))
}

/// Contains-match over draft text; a missing `text` parameter lists everything.
pub async fn search_drafts(
    State(state): State<Arc<AppState>>,
    QueryParam(pairs): QueryParam<Vec<(String, String)>>,
) -> impl IntoResponse {
    let params = SearchDraftsParams::from_pairs(pairs);
    let drafts = state.service.search_drafts(&params.text)?;

    Ok::<_, ApiError>(Json(drafts))
}
