use api_shared::{ErrorRes, NewHealthRecordRes, SessionRes};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

/// Handler failure, rendered as a status code with a JSON body.
///
/// Form-level rejections carry the session snapshot so the client can show field errors and
/// notices without a second request.
#[derive(Debug)]
pub enum ApiError {
    /// 404: no open session with the given id.
    SessionNotFound,
    /// 400: malformed request, such as an unknown field name.
    BadRequest(String),
    /// 409: operation not allowed in the session's current state.
    Conflict(String),
    /// 422: the current step has invalid fields.
    IncompleteStep(SessionRes),
    /// 502: the backend rejected or could not be reached.
    UpstreamFailed(SessionRes),
    /// 502 for the health-record route.
    RecordFailed(NewHealthRecordRes),
}

pub type ApiResult<T> = Result<T, ApiError>;

fn error_body(status: StatusCode, message: String) -> Response {
    (status, Json(ErrorRes { error: message })).into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::SessionNotFound => {
                error_body(StatusCode::NOT_FOUND, "Registration session not found".into())
            }
            ApiError::BadRequest(message) => error_body(StatusCode::BAD_REQUEST, message),
            ApiError::Conflict(message) => error_body(StatusCode::CONFLICT, message),
            ApiError::IncompleteStep(snapshot) => {
                (StatusCode::UNPROCESSABLE_ENTITY, Json(snapshot)).into_response()
            }
            ApiError::UpstreamFailed(snapshot) => {
                (StatusCode::BAD_GATEWAY, Json(snapshot)).into_response()
            }
            ApiError::RecordFailed(res) => (StatusCode::BAD_GATEWAY, Json(res)).into_response(),
        }
    }
}
