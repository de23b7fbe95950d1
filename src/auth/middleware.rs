use std::convert::Infallible;
use std::sync::Arc;

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::server::AppState;

/// The user a request acts on behalf of.
///
/// Requests carry no credentials yet, so every request resolves to the
/// server's configured default user. Handlers that record authorship take
/// this extractor so a real identity can replace it without touching them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser {
    pub user_id: i64,
}

impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = Infallible;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        Ok(CurrentUser {
            user_id: state.default_user_id,
        })
    }
}
