//! Stored responses: preview and CSV download

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use event_forms::export_csv;
use std::sync::Arc;

use crate::{models::RowsResponse, ApiResult, ApiState};

/// Response routes, merged into `/api/forms`
pub fn router() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/:id/responses", get(list_responses))
        .route("/:id/export", get(export_responses))
}

/// List responses for a form, newest first
#[utoipa::path(
    get,
    path = "/api/forms/{id}/responses",
    params(("id" = String, Path, description = "Form / event ID")),
    responses(
        (status = 200, description = "Stored responses", body = RowsResponse)
    ),
    tag = "responses"
)]
pub async fn list_responses(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<RowsResponse>> {
    let rows = state.store.responses(&id).await?;
    Ok(Json(RowsResponse { rows }))
}

/// Download all responses for a form as CSV
#[utoipa::path(
    get,
    path = "/api/forms/{id}/export",
    params(("id" = String, Path, description = "Form / event ID")),
    responses(
        (status = 200, description = "CSV attachment", content_type = "text/csv", body = String),
        (status = 404, description = "No responses yet", body = crate::models::ErrorResponse)
    ),
    tag = "responses"
)]
pub async fn export_responses(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let rows = state.store.responses(&id).await?;
    let csv = export_csv(&rows)?;
    tracing::info!(form_id = %id, rows = rows.len(), bytes = csv.len(), "responses exported");

    let disposition = format!("attachment; filename=\"{}_responses.csv\"", id);
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    ))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use crate::models::ErrorResponse;
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_export_without_responses_is_404() {
        let server = server();
        server.post("/api/forms").json(&form_body("EVT-1", "admin")).await.assert_status_ok();

        let response = server.get("/api/forms/EVT-1/export").expect_failure().await;
        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(
            response.json::<ErrorResponse>().error,
            "No responses available for this form yet."
        );
    }

    #[tokio::test]
    async fn test_export_csv_attachment() {
        let server = server();
        server.post("/api/forms").json(&form_body("EVT-1", "admin")).await.assert_status_ok();

        let mut body = payload("EVT-1");
        body["values"]["addressStreet"] = json!("1 MAIN ST, SUITE 4");
        server.post("/api/forms/EVT-1/submit").json(&body).await.assert_status_ok();

        let response = server.get("/api/forms/EVT-1/export").await;
        response.assert_status_ok();
        assert!(response.header("content-type").to_str().unwrap().starts_with("text/csv"));
        assert_eq!(
            response.header("content-disposition").to_str().unwrap(),
            "attachment; filename=\"EVT-1_responses.csv\""
        );

        let text = response.text();
        let mut lines = text.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("submittedAt,eventId,eventName,eventDate,"));
        assert!(header.ends_with(",connections"));
        assert!(header.contains("role"));
        let row = lines.next().unwrap();
        assert!(row.contains("\"1 MAIN ST, SUITE 4\""));
        assert!(lines.next().is_none());
    }

    #[tokio::test]
    async fn test_responses_newest_first() {
        let server = server();
        server.post("/api/forms").json(&form_body("EVT-1", "admin")).await.assert_status_ok();

        for org in ["first", "second"] {
            let mut body = payload("EVT-1");
            body["values"]["orgName"] = json!(org.to_uppercase());
            server.post("/api/forms/EVT-1/submit").json(&body).await.assert_status_ok();
        }

        let rows: crate::models::RowsResponse = server.get("/api/forms/EVT-1/responses").await.json();
        assert_eq!(rows.rows.len(), 2);
        assert_eq!(rows.rows[0].values["orgName"], "SECOND");
    }
}
