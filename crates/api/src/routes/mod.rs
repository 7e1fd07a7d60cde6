pub mod forms;
pub mod health;
pub mod responses;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use formkit_core::FormId;
use tower_http::limit::RequestBodyLimitLayer;

use crate::error::ApiError;
use crate::state::AppState;

/// Assemble the full router with all route groups.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config().max_upload_bytes;
    Router::new()
        .merge(health::routes())
        .merge(forms::routes())
        .merge(responses::routes())
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(body_limit))
        .with_state(state)
}

/// Parse a form id path segment.
pub(crate) fn parse_form_id(raw: &str) -> Result<FormId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest(format!("invalid form id: {raw}")))
}
