//! Form endpoints: schema CRUD and public submission

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use event_forms::{FormDefinition, FormInput, NormalizedPayload};
use std::sync::Arc;

use crate::{models::*, ApiResult, ApiState};

/// Form routes, nested under `/api/forms`
pub fn router() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/", get(list_forms).post(create_form))
        .route("/:id", get(get_form).post(save_form).delete(delete_form))
        .route("/:id/submit", post(submit_form))
}

/// Build and store a form from admin input.
pub(crate) async fn store_input(state: &ApiState, input: FormInput) -> ApiResult<Json<SaveResponse>> {
    let form = FormDefinition::create(input, Utc::now())?;
    let saved = state.store.save_form(form).await?;
    tracing::info!(form_id = %saved.id, admin_id = %saved.admin_id, extra_fields = saved.extra_fields.len(), "form saved");
    Ok(Json(SaveResponse::ok(saved)))
}

/// List all forms
#[utoipa::path(
    get,
    path = "/api/forms",
    responses(
        (status = 200, description = "All forms, most recently updated first", body = Vec<FormDefinition>)
    ),
    tag = "forms"
)]
pub async fn list_forms(State(state): State<Arc<ApiState>>) -> ApiResult<Json<Vec<FormDefinition>>> {
    Ok(Json(state.store.list_forms().await?))
}

/// Create a form (id from `id`, then `eventId`, else generated)
#[utoipa::path(
    post,
    path = "/api/forms",
    request_body = FormInput,
    responses(
        (status = 200, description = "Form stored", body = SaveResponse),
        (status = 400, description = "Invalid schema", body = ErrorResponse)
    ),
    tag = "forms"
)]
pub async fn create_form(
    State(state): State<Arc<ApiState>>,
    input: Result<Json<FormInput>, JsonRejection>,
) -> ApiResult<Json<SaveResponse>> {
    let Json(input) = input?;
    store_input(&state, input).await
}

/// Get form by ID
#[utoipa::path(
    get,
    path = "/api/forms/{id}",
    params(("id" = String, Path, description = "Form / event ID")),
    responses(
        (status = 200, description = "Form schema", body = FormDefinition),
        (status = 404, description = "Form not found", body = ErrorResponse)
    ),
    tag = "forms"
)]
pub async fn get_form(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<FormDefinition>> {
    Ok(Json(state.store.get_form(&id).await?))
}

/// Create or replace the form stored under `id`
#[utoipa::path(
    post,
    path = "/api/forms/{id}",
    params(("id" = String, Path, description = "Form / event ID")),
    request_body = FormInput,
    responses(
        (status = 200, description = "Form stored", body = SaveResponse),
        (status = 400, description = "Invalid schema", body = ErrorResponse)
    ),
    tag = "forms"
)]
pub async fn save_form(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
    input: Result<Json<FormInput>, JsonRejection>,
) -> ApiResult<Json<SaveResponse>> {
    let Json(mut input) = input?;
    input.id = Some(id);
    store_input(&state, input).await
}

/// Delete a form and all of its responses
#[utoipa::path(
    delete,
    path = "/api/forms/{id}",
    params(("id" = String, Path, description = "Form / event ID")),
    responses(
        (status = 200, description = "Form deleted", body = StatusResponse),
        (status = 404, description = "Form not found", body = ErrorResponse)
    ),
    tag = "forms"
)]
pub async fn delete_form(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<StatusResponse>> {
    state.store.delete_form(&id).await?;
    tracing::info!(form_id = %id, "form deleted");
    Ok(Json(StatusResponse::ok(id)))
}

/// Public submission of a validated, normalized response
#[utoipa::path(
    post,
    path = "/api/forms/{id}/submit",
    params(("id" = String, Path, description = "Form / event ID")),
    request_body = NormalizedPayload,
    responses(
        (status = 200, description = "Response stored; `id` is the submission id", body = StatusResponse),
        (status = 400, description = "Payload does not fit the form", body = ErrorResponse),
        (status = 404, description = "Form not found", body = ErrorResponse)
    ),
    tag = "forms"
)]
pub async fn submit_form(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
    payload: Result<Json<NormalizedPayload>, JsonRejection>,
) -> ApiResult<Json<StatusResponse>> {
    let Json(payload) = payload?;
    let record = state.store.submit(&id, payload).await?;
    tracing::info!(form_id = %id, submission_id = %record.id, connections = record.connections.len(), "submission stored");
    Ok(Json(StatusResponse::ok(record.id.to_string())))
}
