use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use formkit_core::events::types::{FormEvent, SubmissionReceived};
use formkit_core::{ResponseTable, StoredSubmission, Submission, SubmittedValue};
use serde::Deserialize;
use serde_json::{json, Value};

use super::parse_form_id;
use crate::error::ApiResult;
use crate::state::AppState;

/// Submission and response routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/forms/{id}/submissions", post(submit_answers))
        .route("/v1/forms/{id}/responses", get(list_responses))
        .route("/v1/forms/{id}/responses/table", get(response_table))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmitRequest {
    submitted_values: Vec<SubmittedValue>,
}

#[derive(Debug, Deserialize)]
struct TableParams {
    search: Option<String>,
}

async fn submit_answers(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<SubmitRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let form_id = parse_form_id(&id)?;
    let submission = Submission {
        form_id,
        submitted_values: request.submitted_values,
    };
    let stored = state.store().submit_answers(submission).await?;
    state
        .event_bus()
        .publish(FormEvent::SubmissionReceived(SubmissionReceived {
            form_id,
            submission_id: stored.id,
            value_count: stored.submission.submitted_values.len(),
            timestamp: Utc::now(),
        }));

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Form values submitted successfully!",
            "submissionId": stored.id,
        })),
    ))
}

async fn list_responses(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<StoredSubmission>>> {
    let form_id = parse_form_id(&id)?;
    // 404 for an unknown form rather than an empty list
    state.store().get_form(form_id).await?;
    Ok(Json(state.store().list_responses(form_id).await?))
}

/// Responses decoded against the current form, optionally filtered.
async fn response_table(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<TableParams>,
) -> ApiResult<Json<ResponseTable>> {
    let form_id = parse_form_id(&id)?;
    let stored = state.store().get_form(form_id).await?;
    let submissions = state.store().list_responses(form_id).await?;
    let term = params.search.unwrap_or_default();
    Ok(Json(ResponseTable::search(&stored.form, &submissions, &term)))
}
