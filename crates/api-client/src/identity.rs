use async_trait::async_trait;
use medireg_core::{GatewayResult, IdentityProvider};

/// Identity that is already known when the form is created.
#[derive(Clone, Debug, Default)]
pub struct StaticIdentity {
    doctor_id: Option<String>,
}

impl StaticIdentity {
    pub fn new(doctor_id: Option<String>) -> Self {
        Self { doctor_id }
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentity {
    async fn doctor_id(&self) -> GatewayResult<Option<String>> {
        Ok(self.doctor_id.clone())
    }
}
