//! Constants used throughout the MediReg core crate.

/// Default base URL of the backend that persists registrations and health records.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000";

/// Default bind address of the REST server. Must not share a port with
/// [`DEFAULT_API_BASE_URL`].
pub const DEFAULT_REST_ADDR: &str = "0.0.0.0:8080";

/// Default base URL of the postal code lookup service.
pub const DEFAULT_POSTAL_LOOKUP_URL: &str = "https://api.postalpincode.in";

/// Where the user is sent after a successful registration.
pub const DEFAULT_SUCCESS_ROUTE: &str = "/";

/// Backend path for user registration.
pub const REGISTER_USER_PATH: &str = "/api/register/user";

/// Backend path for new health records.
pub const NEW_HEALTH_RECORD_PATH: &str = "/api/records/newrecord";

/// Lookup service path prefix; the postal code is appended as the last segment.
pub const POSTAL_LOOKUP_PATH: &str = "/pincode";
