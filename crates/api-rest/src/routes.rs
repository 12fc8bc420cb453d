//! REST handlers.
//!
//! Each registration handler locks the session only for its synchronous transition and the
//! snapshot that follows; the lookup and submit handlers release it while the network call
//! is outstanding.

use api_client::StaticIdentity;
use api_shared::auth::{doctor_id_from_header, DOCTOR_ID_HEADER};
use api_shared::{
    ChangeFieldReq, ErrorRes, HealthRes, HealthService, NewHealthRecordReq, NewHealthRecordRes,
    SessionRes, StepsRes,
};
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use medireg_core::{
    FieldId, FormController, FormError, FormSession, HealthRecordController, HealthRecordField,
    Navigator, Submission,
};
use std::sync::{Arc, Mutex, PoisonError};
use uuid::Uuid;

use crate::convert;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Captures the route a successful submission asks to go to, for the response body.
#[derive(Default)]
struct RedirectCapture {
    route: Mutex<Option<String>>,
}

impl RedirectCapture {
    fn into_route(self) -> Option<String> {
        self.route
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Navigator for RedirectCapture {
    fn navigate(&self, route: &str) {
        *self.route.lock().unwrap_or_else(PoisonError::into_inner) = Some(route.to_string());
    }
}

fn find_session(state: &AppState, id: &str) -> ApiResult<(Uuid, Arc<FormSession>)> {
    let id = Uuid::parse_str(id).map_err(|_| ApiError::SessionNotFound)?;
    let session = state.sessions.get(&id).ok_or(ApiError::SessionNotFound)?;
    Ok((id, session))
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Used by monitoring and load balancer health checks.
#[axum::debug_handler]
pub async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    get,
    path = "/steps",
    responses(
        (status = 200, description = "Registration steps with field widgets", body = StepsRes)
    )
)]
/// The five registration steps, their fields and how each field is rendered.
#[axum::debug_handler]
pub async fn list_steps(State(_state): State<AppState>) -> Json<StepsRes> {
    Json(convert::steps())
}

#[utoipa::path(
    post,
    path = "/registrations",
    responses(
        (status = 201, description = "Registration session created", body = SessionRes)
    )
)]
/// Open a registration session
///
/// The session starts on the first step with an empty record.
///
/// # Returns
/// * `(201, Json<SessionRes>)` - Snapshot of the new session, including its id
#[axum::debug_handler]
pub async fn create_registration(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionRes>) {
    let controller = FormController::new(state.cfg.success_route());
    let (id, session) = state.sessions.create(controller);
    tracing::info!("registration session {} opened", id);
    let snapshot = session.with(|c| convert::snapshot(&id, c, None));
    (StatusCode::CREATED, Json(snapshot))
}

#[utoipa::path(
    get,
    path = "/registrations/{id}",
    params(("id" = String, Path, description = "Registration session id")),
    responses(
        (status = 200, description = "Session snapshot", body = SessionRes),
        (status = 404, description = "Unknown session", body = ErrorRes)
    )
)]
/// Current state of a registration session
///
/// Queued notices are returned once and then dropped.
#[axum::debug_handler]
pub async fn get_registration(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<SessionRes>> {
    let (id, session) = find_session(&state, &id)?;
    Ok(Json(session.with(|c| convert::snapshot(&id, c, None))))
}

#[utoipa::path(
    delete,
    path = "/registrations/{id}",
    params(("id" = String, Path, description = "Registration session id")),
    responses(
        (status = 204, description = "Session discarded"),
        (status = 404, description = "Unknown session", body = ErrorRes)
    )
)]
/// Discard a registration session that will not be finished
#[axum::debug_handler]
pub async fn discard_registration(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = Uuid::parse_str(&id).map_err(|_| ApiError::SessionNotFound)?;
    state
        .sessions
        .remove(&id)
        .ok_or(ApiError::SessionNotFound)?;
    tracing::info!("registration session {} discarded", id);
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    put,
    path = "/registrations/{id}/fields/{field}",
    params(
        ("id" = String, Path, description = "Registration session id"),
        ("field" = String, Path, description = "Field name, e.g. `firstName`")
    ),
    request_body = ChangeFieldReq,
    responses(
        (status = 200, description = "Field updated and validated", body = SessionRes),
        (status = 400, description = "Unknown field", body = ErrorRes),
        (status = 404, description = "Unknown session", body = ErrorRes)
    )
)]
/// Set one field's value
///
/// The new value is validated immediately; the field's error entry in the snapshot reflects
/// the result. Other fields are not revalidated.
///
/// # Errors
/// Returns `400 Bad Request` if the field name is not recognised.
#[axum::debug_handler]
pub async fn change_field(
    State(state): State<AppState>,
    Path((id, field)): Path<(String, String)>,
    Json(req): Json<ChangeFieldReq>,
) -> ApiResult<Json<SessionRes>> {
    let (id, session) = find_session(&state, &id)?;
    let field: FieldId = field
        .parse()
        .map_err(|e: FormError| ApiError::BadRequest(e.to_string()))?;
    let snapshot = session.with(|c| {
        c.change_field(field, req.value);
        convert::snapshot(&id, c, None)
    });
    Ok(Json(snapshot))
}

#[utoipa::path(
    post,
    path = "/registrations/{id}/advance",
    params(("id" = String, Path, description = "Registration session id")),
    responses(
        (status = 200, description = "Moved to the next step", body = SessionRes),
        (status = 404, description = "Unknown session", body = ErrorRes),
        (status = 422, description = "Current step has invalid fields", body = SessionRes)
    )
)]
/// Validate the current step and move to the next one
///
/// # Errors
/// Returns `422 Unprocessable Entity` with the snapshot when any field on the current step
/// fails validation; the step does not change.
#[axum::debug_handler]
pub async fn advance(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<SessionRes>> {
    let (id, session) = find_session(&state, &id)?;
    let (outcome, snapshot) = session.with(|c| {
        let outcome = c.advance();
        (outcome, convert::snapshot(&id, c, None))
    });
    match outcome {
        Ok(_) => Ok(Json(snapshot)),
        Err(FormError::IncompleteStep { .. }) => Err(ApiError::IncompleteStep(snapshot)),
        Err(e) => Err(ApiError::BadRequest(e.to_string())),
    }
}

#[utoipa::path(
    post,
    path = "/registrations/{id}/retreat",
    params(("id" = String, Path, description = "Registration session id")),
    responses(
        (status = 200, description = "Moved to the previous step", body = SessionRes),
        (status = 404, description = "Unknown session", body = ErrorRes)
    )
)]
/// Move to the previous step without validating
#[axum::debug_handler]
pub async fn retreat(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<SessionRes>> {
    let (id, session) = find_session(&state, &id)?;
    let snapshot = session.with(|c| {
        c.retreat();
        convert::snapshot(&id, c, None)
    });
    Ok(Json(snapshot))
}

#[utoipa::path(
    post,
    path = "/registrations/{id}/lookup",
    params(("id" = String, Path, description = "Registration session id")),
    responses(
        (status = 200, description = "Lookup finished; notices report the outcome", body = SessionRes),
        (status = 404, description = "Unknown session", body = ErrorRes)
    )
)]
/// Fill district and state from the session's postal code
///
/// Lookup failures are reported as notices in the snapshot, not as an error status.
#[axum::debug_handler]
pub async fn lookup_address(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<SessionRes>> {
    let (id, session) = find_session(&state, &id)?;
    session.lookup_address(state.lookup.as_ref()).await;
    Ok(Json(session.with(|c| convert::snapshot(&id, c, None))))
}

#[utoipa::path(
    post,
    path = "/registrations/{id}/submit",
    params(("id" = String, Path, description = "Registration session id")),
    responses(
        (status = 200, description = "Registration accepted; session closed", body = SessionRes),
        (status = 202, description = "A submission is already in flight", body = SessionRes),
        (status = 404, description = "Unknown session", body = ErrorRes),
        (status = 409, description = "Session is not on the final step", body = ErrorRes),
        (status = 422, description = "Final step has invalid fields", body = SessionRes),
        (status = 502, description = "Backend rejected the registration", body = SessionRes)
    )
)]
/// Submit the completed registration
///
/// On success the snapshot carries `redirect` and the session is discarded. On failure the
/// session is left intact so the client can retry.
///
/// # Errors
/// Returns:
/// - `409 Conflict` if the session is not on the final step,
/// - `422 Unprocessable Entity` if the final step does not validate,
/// - `502 Bad Gateway` if the backend call fails.
#[axum::debug_handler]
pub async fn submit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<(StatusCode, Json<SessionRes>)> {
    let (id, session) = find_session(&state, &id)?;
    let navigator = RedirectCapture::default();
    let outcome = session.submit_final(state.gateway.as_ref(), &navigator).await;

    match outcome {
        Ok(Submission::Accepted) => {
            state.sessions.remove(&id);
            tracing::info!("registration session {} submitted and closed", id);
            let redirect = navigator.into_route();
            let snapshot = session.with(|c| convert::snapshot(&id, c, redirect));
            Ok((StatusCode::OK, Json(snapshot)))
        }
        Ok(Submission::AlreadyInFlight) => {
            let snapshot = session.with(|c| convert::snapshot(&id, c, None));
            Ok((StatusCode::ACCEPTED, Json(snapshot)))
        }
        Ok(Submission::Failed) => Err(ApiError::UpstreamFailed(
            session.with(|c| convert::snapshot(&id, c, None)),
        )),
        Err(FormError::NotOnFinalStep) => {
            Err(ApiError::Conflict(FormError::NotOnFinalStep.to_string()))
        }
        Err(FormError::IncompleteStep { .. }) => Err(ApiError::IncompleteStep(
            session.with(|c| convert::snapshot(&id, c, None)),
        )),
        Err(e) => {
            tracing::error!("Submit registration error: {:?}", e);
            Err(ApiError::BadRequest(e.to_string()))
        }
    }
}

#[utoipa::path(
    post,
    path = "/records",
    request_body = NewHealthRecordReq,
    params(("x-doctor-id" = String, Header, description = "Signed-in doctor's id")),
    responses(
        (status = 201, description = "Health record added", body = NewHealthRecordRes),
        (status = 400, description = "Doctor or patient identity missing", body = ErrorRes),
        (status = 502, description = "Backend rejected the record", body = NewHealthRecordRes)
    )
)]
/// Add a health record for a patient
///
/// The doctor is identified by the `x-doctor-id` header. A record is never forwarded without
/// both a doctor and a patient id.
///
/// # Errors
/// Returns:
/// - `400 Bad Request` if the doctor header or patient id is missing or blank,
/// - `502 Bad Gateway` if the backend call fails.
#[axum::debug_handler]
pub async fn new_health_record(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<NewHealthRecordReq>,
) -> ApiResult<(StatusCode, Json<NewHealthRecordRes>)> {
    let doctor_id = doctor_id_from_header(
        headers
            .get(DOCTOR_ID_HEADER)
            .and_then(|value| value.to_str().ok()),
    );
    let identity = StaticIdentity::new(doctor_id);
    let mut controller =
        HealthRecordController::initialise(&identity, Some(req.patient_id.as_str())).await;
    controller.change_field(HealthRecordField::Diagnosis, req.diagnosis);
    controller.change_field(HealthRecordField::Prescription, req.prescription);
    controller.change_field(HealthRecordField::Status, req.status);
    controller.change_field(HealthRecordField::Notes, req.notes);

    match controller.submit(state.gateway.as_ref()).await {
        Ok(Submission::Accepted) => Ok((
            StatusCode::CREATED,
            Json(NewHealthRecordRes {
                accepted: true,
                notices: convert::notices(controller.take_notices()),
            }),
        )),
        Ok(_) => Err(ApiError::RecordFailed(NewHealthRecordRes {
            accepted: false,
            notices: convert::notices(controller.take_notices()),
        })),
        Err(e) => {
            tracing::warn!("health record refused: {}", e);
            Err(ApiError::BadRequest(e.to_string()))
        }
    }
}
