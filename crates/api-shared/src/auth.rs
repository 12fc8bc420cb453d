/// Header carrying the signed-in doctor's identifier, set by the upstream auth proxy.
pub const DOCTOR_ID_HEADER: &str = "x-doctor-id";

/// Normalises a raw doctor-id header value. Blank values count as absent.
pub fn doctor_id_from_header(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
