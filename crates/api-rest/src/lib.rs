//! # API REST
//!
//! REST API implementation for MediReg.
//!
//! Handles:
//! - Registration form sessions: one `FormSession` per browser, driven step by step
//! - Health-record submission on behalf of a signed-in doctor
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, status mapping, CORS)
//!
//! Uses `api-shared` for wire types and `api-client` collaborators in production.

#![warn(rust_2018_idioms)]

mod convert;
pub mod error;
pub mod routes;
pub mod state;

pub use state::{AppState, SessionStore};

use api_shared::{
    ChangeFieldReq, ErrorRes, FieldDto, HealthRes, NewHealthRecordReq, NewHealthRecordRes,
    NoticeDto, SelectOptionDto, SessionRes, StepDto, StepsRes,
};
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::health,
        routes::list_steps,
        routes::create_registration,
        routes::get_registration,
        routes::discard_registration,
        routes::change_field,
        routes::advance,
        routes::retreat,
        routes::lookup_address,
        routes::submit,
        routes::new_health_record,
    ),
    components(schemas(
        HealthRes,
        StepsRes,
        StepDto,
        FieldDto,
        SelectOptionDto,
        SessionRes,
        NoticeDto,
        ChangeFieldReq,
        NewHealthRecordReq,
        NewHealthRecordRes,
        ErrorRes,
    ))
)]
pub struct ApiDoc;

/// Builds the REST router with Swagger UI at `/swagger-ui` and permissive CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/steps", get(routes::list_steps))
        .route("/registrations", post(routes::create_registration))
        .route(
            "/registrations/:id",
            get(routes::get_registration).delete(routes::discard_registration),
        )
        .route("/registrations/:id/fields/:field", put(routes::change_field))
        .route("/registrations/:id/advance", post(routes::advance))
        .route("/registrations/:id/retreat", post(routes::retreat))
        .route("/registrations/:id/lookup", post(routes::lookup_address))
        .route("/registrations/:id/submit", post(routes::submit))
        .route("/records", post(routes::new_health_record))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
