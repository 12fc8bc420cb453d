//! The fixed step table of the registration form.

use crate::field::FieldId;
use serde::Serialize;

/// A field as declared on a step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub field: FieldId,
    pub required: bool,
}

/// One page of the multi-step form.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct StepDefinition {
    pub title: &'static str,
    pub fields: &'static [FieldSpec],
}

const fn req(field: FieldId) -> FieldSpec {
    FieldSpec {
        field,
        required: true,
    }
}

const fn opt(field: FieldId) -> FieldSpec {
    FieldSpec {
        field,
        required: false,
    }
}

/// Number of steps in the form.
pub const STEP_COUNT: usize = 5;

/// Steps in the order they are presented. Order is significant.
pub static STEPS: [StepDefinition; STEP_COUNT] = [
    StepDefinition {
        title: "Personal Information",
        fields: &[
            req(FieldId::FirstName),
            opt(FieldId::MiddleName),
            req(FieldId::Surname),
            req(FieldId::Mobile),
            req(FieldId::Email),
            req(FieldId::NationalId),
        ],
    },
    StepDefinition {
        title: "Additional Details",
        fields: &[
            req(FieldId::DateOfBirth),
            req(FieldId::Gender),
            opt(FieldId::Weight),
            opt(FieldId::Height),
            req(FieldId::BloodGroup),
        ],
    },
    StepDefinition {
        title: "Address",
        fields: &[
            req(FieldId::PostalCode),
            req(FieldId::Building),
            req(FieldId::City),
            opt(FieldId::SubDistrict),
            req(FieldId::District),
            req(FieldId::State),
        ],
    },
    StepDefinition {
        title: "Medical Information",
        fields: &[
            opt(FieldId::Allergies),
            opt(FieldId::MedicationName),
            opt(FieldId::MedicationFrequency),
        ],
    },
    StepDefinition {
        title: "Account Setup",
        fields: &[req(FieldId::Password), req(FieldId::ConfirmPassword)],
    },
];

/// Index of the final step.
pub const LAST_STEP: usize = STEP_COUNT - 1;

/// Whether `field` is declared required on its step.
pub fn is_required(field: FieldId) -> bool {
    spec_for(field).is_some_and(|spec| spec.required)
}

fn spec_for(field: FieldId) -> Option<&'static FieldSpec> {
    STEPS
        .iter()
        .flat_map(|step| step.fields.iter())
        .find(|spec| spec.field == field)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_field_appears_on_exactly_one_step() {
        for field in FieldId::ALL {
            let count = STEPS
                .iter()
                .flat_map(|s| s.fields)
                .filter(|spec| spec.field == field)
                .count();
            assert_eq!(count, 1, "{field} declared {count} times");
        }
    }

    #[test]
    fn required_flags_follow_the_table() {
        assert!(is_required(FieldId::FirstName));
        assert!(!is_required(FieldId::MiddleName));
        assert!(!is_required(FieldId::SubDistrict));
        assert!(is_required(FieldId::ConfirmPassword));
        assert!(!is_required(FieldId::Allergies));
    }

    #[test]
    fn five_steps_end_with_credentials() {
        assert_eq!(LAST_STEP, 4);
        assert!(STEPS[LAST_STEP]
            .fields
            .iter()
            .any(|spec| spec.field == FieldId::Password));
    }
}
