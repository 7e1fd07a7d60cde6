use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use formkit_core::events::types::{FormChange, FormEvent};
use formkit_core::{render, AnswerState, Form, FormId, RenderedForm, StoredForm};
use serde_json::{json, Value};

use super::parse_form_id;
use crate::error::ApiResult;
use crate::state::AppState;

/// Form definition routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/forms", get(list_forms).post(save_form))
        .route("/v1/forms/{id}", get(get_form).put(update_form))
        .route("/v1/forms/{id}/render", get(render_form))
}

fn change(form_id: FormId, form: &Form) -> FormChange {
    FormChange {
        form_id,
        title: form.title.clone(),
        field_count: form.fields.len(),
        timestamp: Utc::now(),
    }
}

async fn save_form(
    State(state): State<AppState>,
    Json(form): Json<Form>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let event_form = form.clone();
    let form_id = state.store().save_form(form).await?;
    state
        .event_bus()
        .publish(FormEvent::FormSaved(change(form_id, &event_form)));

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Form saved successfully!", "formId": form_id })),
    ))
}

async fn list_forms(State(state): State<AppState>) -> ApiResult<Json<Vec<StoredForm>>> {
    Ok(Json(state.store().list_forms().await?))
}

async fn get_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<StoredForm>> {
    let id = parse_form_id(&id)?;
    Ok(Json(state.store().get_form(id).await?))
}

async fn update_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(form): Json<Form>,
) -> ApiResult<Json<StoredForm>> {
    let id = parse_form_id(&id)?;
    let stored = state.store().update_form(id, form).await?;
    state
        .event_bus()
        .publish(FormEvent::FormUpdated(change(id, &stored.form)));
    Ok(Json(stored))
}

/// A fresh, unanswered instance of the form, ready to fill.
async fn render_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<RenderedForm>> {
    let id = parse_form_id(&id)?;
    let stored = state.store().get_form(id).await?;
    Ok(Json(render(&stored.form, &AnswerState::new())))
}
