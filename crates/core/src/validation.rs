//! Field validation rules for the registration form.
//!
//! [`validate_field`] is pure: it looks only at its arguments. The one cross-field rule
//! (confirm-password) takes the *current* password as an explicit argument so callers cannot
//! accidentally validate against a stale copy.

use crate::error::{ValidationError, ValidationResult};
use crate::field::FieldId;
use medireg_types::{MobileNumber, NationalId, NonEmptyText, PostalCode};

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Validates a single field value.
///
/// # Arguments
///
/// * `field` - Which field is being validated.
/// * `value` - The raw value as typed by the user.
/// * `required` - Whether the field is required on its step.
/// * `current_password` - The password currently held in the record; only consulted for
///   [`FieldId::ConfirmPassword`].
///
/// # Errors
///
/// Returns the [`ValidationError`] whose message should be shown next to the field.
pub fn validate_field(
    field: FieldId,
    value: &str,
    required: bool,
    current_password: &str,
) -> ValidationResult<()> {
    if !required && value.is_empty() {
        return Ok(());
    }

    match field {
        FieldId::FirstName
        | FieldId::Surname
        | FieldId::Building
        | FieldId::City
        | FieldId::District
        | FieldId::State => NonEmptyText::new(value)
            .map(|_| ())
            .map_err(|_| ValidationError::Required(field)),
        FieldId::Mobile => MobileNumber::parse(value)
            .map(|_| ())
            .map_err(|_| ValidationError::InvalidMobile),
        FieldId::Email => {
            if looks_like_email(value) {
                Ok(())
            } else {
                Err(ValidationError::InvalidEmail)
            }
        }
        FieldId::NationalId => NationalId::parse(value)
            .map(|_| ())
            .map_err(|_| ValidationError::InvalidNationalId),
        FieldId::DateOfBirth | FieldId::Gender | FieldId::BloodGroup => {
            if value.is_empty() {
                Err(ValidationError::Required(field))
            } else {
                Ok(())
            }
        }
        FieldId::Weight | FieldId::Height => {
            if value.is_empty() || is_positive_number(value) {
                Ok(())
            } else {
                Err(ValidationError::InvalidMeasurement(field))
            }
        }
        FieldId::PostalCode => PostalCode::parse(value)
            .map(|_| ())
            .map_err(|_| ValidationError::InvalidPostalCode),
        FieldId::Password => {
            if value.chars().count() >= MIN_PASSWORD_LEN {
                Ok(())
            } else {
                Err(ValidationError::PasswordTooShort {
                    min: MIN_PASSWORD_LEN,
                })
            }
        }
        FieldId::ConfirmPassword => {
            // Reaching here with an empty value means the field is required.
            if value.is_empty() || value != current_password {
                Err(ValidationError::PasswordMismatch)
            } else {
                Ok(())
            }
        }
        FieldId::MiddleName
        | FieldId::SubDistrict
        | FieldId::Allergies
        | FieldId::MedicationName
        | FieldId::MedicationFrequency => Ok(()),
    }
}

/// `local@domain.tld`: no whitespace, exactly one `@`, non-empty local part, and a dot in the
/// domain with text on both sides of it.
fn looks_like_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

fn is_positive_number(value: &str) -> bool {
    value
        .trim()
        .parse::<f64>()
        .map(|n| n.is_finite() && n > 0.0)
        .unwrap_or(false)
}
