//! Event Forms HTTP API
//!
//! REST surface over the form & response store.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       EVENT FORMS API                        │
//! │                                                              │
//! │  /api/forms ............ form CRUD, public submit, export    │
//! │  /api/admin/{id}/forms . forms owned by one admin            │
//! │  /health, /docs ........ liveness, OpenAPI UI                │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │  FormStore (event-forms)                               │  │
//! │  │  schema checks | re-validation | cascading delete      │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod models;
pub mod routes;

use axum::extract::DefaultBodyLimit;
use axum::{routing::get, Router};
use event_forms::FormStore;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use config::ServerConfig;
pub use error::{ApiError, ApiResult};
pub use models::*;

/// API state
#[derive(Clone)]
pub struct ApiState {
    /// Form & response store
    pub store: Arc<dyn FormStore>,
    /// API version
    pub version: String,
}

impl ApiState {
    /// State over `store`, reporting this crate's version
    pub fn new(store: Arc<dyn FormStore>) -> Self {
        Self {
            store,
            version: env!("CARGO_PKG_VERSION").into(),
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Event Forms API",
        version = "1.0.0",
        description = "Event registration forms: schemas, public submissions, response export",
        license(name = "Apache-2.0")
    ),
    paths(
        routes::health::health_check,
        routes::forms::list_forms,
        routes::forms::create_form,
        routes::forms::get_form,
        routes::forms::save_form,
        routes::forms::delete_form,
        routes::forms::submit_form,
        routes::responses::list_responses,
        routes::responses::export_responses,
        routes::admin::list_admin_forms,
        routes::admin::create_admin_form,
    ),
    components(
        schemas(
            StatusResponse, SaveResponse, ErrorResponse, RowsResponse,
            routes::health::HealthResponse,
            event_forms::FormDefinition, event_forms::FormInput, event_forms::FieldDefinition,
            event_forms::FieldType, event_forms::ConnectionRecord, event_forms::NormalizedPayload,
            event_forms::SubmissionRecord
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "forms", description = "Form schemas and public submission"),
        (name = "responses", description = "Stored responses and CSV export"),
        (name = "admin", description = "Forms owned by an admin")
    )
)]
pub struct ApiDoc;

/// Build the API router
pub fn build_router(state: ApiState, config: &ServerConfig) -> Router {
    let mut router = Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(routes::health::health_check))
        .nest("/api", api_routes());
    if config.permissive_cors {
        router = router.layer(CorsLayer::permissive());
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(DefaultBodyLimit::max(config.body_limit_bytes)),
        )
        .with_state(Arc::new(state))
}

fn api_routes() -> Router<Arc<ApiState>> {
    Router::new()
        .nest("/forms", routes::forms::router().merge(routes::responses::router()))
        .nest("/admin/:admin_id/forms", routes::admin::router())
}
