use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

use crate::auth::CurrentUser;
use crate::server::AppState;
use crate::server::dto::CreateDraftCommentRequest;
use crate::server::extract::{JsonBody, PathParam};
use crate::server::response::{ApiError, ServiceResultExt};

pub async fn create_draft_comment(
    user: CurrentUser,
    State(state): State<Arc<AppState>>,
    PathParam(draft_id): PathParam<i64>,
    JsonBody(req): JsonBody<CreateDraftCommentRequest>,
) -> impl IntoResponse {
    if req.id.is_some_and(|id| id != draft_id) {
        return Err(ApiError::bad_request(
            "Draft id in body does not match the path",
        ));
    }

    let comment = state
        .service
        .create_draft_comment(user.user_id, draft_id, &req.text)
        .or_not_found("Draft not found")?;

    Ok::<_, ApiError>((StatusCode::CREATED, Json(comment)))
}

pub async fn list_draft_comments(
    State(state): State<Arc<AppState>>,
    PathParam(draft_id): PathParam<i64>,
) -> impl IntoResponse {
    let comments = state
        .service
        .list_draft_comments(draft_id)
        .or_not_found("Draft not found")?;

    Ok::<_, ApiError>(Json(comments))
}

pub async fn get_comment(
    State(state): State<Arc<AppState>>,
    PathParam(id): PathParam<i64>,
) -> impl IntoResponse {
    let comment = state
        .service
        .get_draft_comment_by_id(id)
        .or_not_found("Comment not found")?;

    Ok::<_, ApiError>(Json(comment))
}
