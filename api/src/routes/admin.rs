//! Forms owned by one admin

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use event_forms::{FormDefinition, FormInput};
use std::sync::Arc;

use super::forms::store_input;
use crate::{models::SaveResponse, ApiResult, ApiState};

/// Admin routes, nested under `/api/admin/{admin_id}/forms`
pub fn router() -> Router<Arc<ApiState>> {
    Router::new().route("/", get(list_admin_forms).post(create_admin_form))
}

/// List an admin's forms, most recently updated first
#[utoipa::path(
    get,
    path = "/api/admin/{admin_id}/forms",
    params(("admin_id" = String, Path, description = "Admin ID")),
    responses(
        (status = 200, description = "Forms owned by the admin", body = Vec<FormDefinition>)
    ),
    tag = "admin"
)]
pub async fn list_admin_forms(
    State(state): State<Arc<ApiState>>,
    Path(admin_id): Path<String>,
) -> ApiResult<Json<Vec<FormDefinition>>> {
    Ok(Json(state.store.forms_for_admin(&admin_id).await?))
}

/// Save a form on behalf of the admin in the path
#[utoipa::path(
    post,
    path = "/api/admin/{admin_id}/forms",
    params(("admin_id" = String, Path, description = "Admin ID")),
    request_body = FormInput,
    responses(
        (status = 200, description = "Form stored", body = SaveResponse),
        (status = 400, description = "Invalid schema", body = crate::models::ErrorResponse)
    ),
    tag = "admin"
)]
pub async fn create_admin_form(
    State(state): State<Arc<ApiState>>,
    Path(admin_id): Path<String>,
    input: Result<Json<FormInput>, JsonRejection>,
) -> ApiResult<Json<SaveResponse>> {
    let Json(mut input) = input?;
    input.admin_id = Some(admin_id);
    store_input(&state, input).await
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use crate::models::SaveResponse;
    use event_forms::FormDefinition;

    #[tokio::test]
    async fn test_admin_forms_are_scoped() {
        let server = server();
        server.post("/api/forms").json(&form_body("EVT-1", "alice")).await.assert_status_ok();
        server.post("/api/forms").json(&form_body("EVT-2", "bob")).await.assert_status_ok();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;

        let mut body = form_body("EVT-3", "ignored");
        body.as_object_mut().unwrap().remove("adminId");
        let saved: SaveResponse = server.post("/api/admin/alice/forms").json(&body).await.json();
        assert_eq!(saved.form.admin_id, "alice");

        let forms: Vec<FormDefinition> = server.get("/api/admin/alice/forms").await.json();
        let ids: Vec<_> = forms.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["EVT-3", "EVT-1"]);

        let forms: Vec<FormDefinition> = server.get("/api/admin/nobody/forms").await.json();
        assert!(forms.is_empty());
    }
}
