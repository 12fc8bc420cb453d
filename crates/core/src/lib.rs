//! # MediReg Core
//!
//! Form state and validation for patient registration and health-record entry.
//!
//! This crate contains the pure state machines and their collaborator seams:
//! - Field identifiers, the step table and the per-field validator
//! - [`FormController`], the multi-step registration state machine
//! - [`FormSession`], a lock-wrapped controller for concurrent front ends
//! - [`HealthRecordController`], the doctor-facing single-step form
//! - Traits for the external gateway, postal lookup, identity and navigation
//!
//! **No transport concerns**: HTTP clients live in `api-client`, the REST surface in
//! `api-rest`, and terminal interaction in `medireg-cli`.

pub mod config;
pub mod constants;
pub mod controller;
pub mod error;
pub mod field;
pub mod gateway;
pub mod health_record;
pub mod notice;
pub mod payload;
pub mod record;
pub mod session;
pub mod steps;
pub mod validation;

pub use config::{gateway_config_from_env_values, GatewayConfig};
pub use controller::{FormController, Submission};
pub use error::{
    FormError, FormResult, GatewayError, GatewayResult, ValidationError, ValidationResult,
};
pub use field::{FieldId, SelectOption, Widget, WidgetKind};
pub use gateway::{
    AddressLookup, AddressLookupService, IdentityProvider, Navigator, NoNavigation,
    RecordGateway,
};
pub use health_record::{HealthRecordController, HealthRecordDraft, HealthRecordField};
pub use notice::{Notice, NoticeLevel};
pub use payload::{HealthRecordPayload, RegistrationPayload};
pub use record::{ErrorMap, FormRecord};
pub use session::FormSession;
pub use steps::{FieldSpec, StepDefinition, LAST_STEP, STEPS, STEP_COUNT};
pub use validation::validate_field;
