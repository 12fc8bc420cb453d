//! Seams to the external collaborators.
//!
//! The controllers never perform I/O themselves. Network-backed implementations live in the
//! `api-client` crate; tests use in-memory fakes.

use crate::error::GatewayResult;
use crate::payload::{HealthRecordPayload, RegistrationPayload};
use async_trait::async_trait;

/// Backend endpoints that persist submitted forms.
#[async_trait]
pub trait RecordGateway: Send + Sync {
    /// Posts a completed registration.
    async fn submit_registration(&self, payload: &RegistrationPayload) -> GatewayResult<()>;

    /// Posts a doctor's health-record entry.
    async fn submit_health_record(&self, payload: &HealthRecordPayload) -> GatewayResult<()>;
}

/// Result of a successful round trip to the postal lookup service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AddressLookup {
    Found { district: String, state: String },
    NotFound,
}

#[async_trait]
pub trait AddressLookupService: Send + Sync {
    async fn lookup(&self, postal_code: &str) -> GatewayResult<AddressLookup>;
}

/// Source of the authenticated doctor's identifier.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// `Ok(None)` when no one is signed in.
    async fn doctor_id(&self) -> GatewayResult<Option<String>>;
}

/// Moves the user elsewhere once a registration has been accepted.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: &str);
}

/// Navigator for front ends that have nowhere to go.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoNavigation;

impl Navigator for NoNavigation {
    fn navigate(&self, route: &str) {
        tracing::debug!("navigation to {} ignored", route);
    }
}
