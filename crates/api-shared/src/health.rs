use crate::HealthRes;

/// Liveness check shared by every MediReg HTTP surface.
#[derive(Clone, Default)]
pub struct HealthService;

impl HealthService {
    /// Returns a `HealthRes` indicating the service is healthy.
    pub fn check_health() -> HealthRes {
        HealthRes {
            ok: true,
            message: "MediReg is alive".into(),
        }
    }
}
