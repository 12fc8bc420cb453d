//! # API Shared
//!
//! Wire types and small services shared by the MediReg HTTP surfaces.
//!
//! Contains:
//! - Request/response DTOs (`dto` module) with OpenAPI schemas
//! - `HealthService` for liveness checks
//! - Identity header handling (`auth` module)
//!
//! The DTOs are plain strings and maps; mapping from `medireg-core` types
//! happens in `api-rest`.

pub mod auth;
pub mod dto;
pub mod health;

pub use dto::*;
pub use health::HealthService;
