use crate::field::FieldId;

/// Per-field validation failure. The `Display` text is what the user sees.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{} is required", .0.label())]
    Required(FieldId),
    #[error("Invalid mobile number")]
    InvalidMobile,
    #[error("Invalid email address")]
    InvalidEmail,
    #[error("Invalid national ID number")]
    InvalidNationalId,
    #[error("Invalid {}", .0.label().to_lowercase())]
    InvalidMeasurement(FieldId),
    #[error("Invalid postal code")]
    InvalidPostalCode,
    #[error("Password must be at least {min} characters")]
    PasswordTooShort { min: usize },
    #[error("Passwords do not match")]
    PasswordMismatch,
}

pub type ValidationResult<T> = std::result::Result<T, ValidationError>;

/// Failure talking to an external collaborator (submission gateway, lookup service,
/// identity source).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("request rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("failed to decode response: {0}")]
    Decode(String),
}

pub type GatewayResult<T> = std::result::Result<T, GatewayError>;

#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error("step {step} has invalid fields: {}", join_fields(.failing))]
    IncompleteStep { step: usize, failing: Vec<FieldId> },
    #[error("submission is only possible from the final step")]
    NotOnFinalStep,
    #[error("missing {0} identity")]
    MissingIdentity(&'static str),
    #[error("unknown field: {0}")]
    UnknownField(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("gateway error: {0}")]
    Gateway(#[from] GatewayError),
}

pub type FormResult<T> = std::result::Result<T, FormError>;

fn join_fields(fields: &[FieldId]) -> String {
    fields
        .iter()
        .map(|f| f.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
