//! Field identifiers and the declarative widget table.
//!
//! Every input on the registration form is named by a [`FieldId`]. The enum is the single
//! source of truth for wire names (used by REST paths and the CLI) and human labels; the
//! record's accessor/mutator arms and the validator both match on it exhaustively, so adding
//! a field is a compile error until every site handles it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::FormError;

/// Identifier of a single registration form field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldId {
    FirstName,
    MiddleName,
    Surname,
    Mobile,
    Email,
    NationalId,
    DateOfBirth,
    Gender,
    Weight,
    Height,
    BloodGroup,
    PostalCode,
    Building,
    City,
    SubDistrict,
    District,
    State,
    Allergies,
    MedicationName,
    MedicationFrequency,
    Password,
    ConfirmPassword,
}

impl FieldId {
    /// All fields in form order.
    pub const ALL: [FieldId; 22] = [
        FieldId::FirstName,
        FieldId::MiddleName,
        FieldId::Surname,
        FieldId::Mobile,
        FieldId::Email,
        FieldId::NationalId,
        FieldId::DateOfBirth,
        FieldId::Gender,
        FieldId::Weight,
        FieldId::Height,
        FieldId::BloodGroup,
        FieldId::PostalCode,
        FieldId::Building,
        FieldId::City,
        FieldId::SubDistrict,
        FieldId::District,
        FieldId::State,
        FieldId::Allergies,
        FieldId::MedicationName,
        FieldId::MedicationFrequency,
        FieldId::Password,
        FieldId::ConfirmPassword,
    ];

    /// Stable camelCase name used on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldId::FirstName => "firstName",
            FieldId::MiddleName => "middleName",
            FieldId::Surname => "surname",
            FieldId::Mobile => "mobile",
            FieldId::Email => "email",
            FieldId::NationalId => "nationalId",
            FieldId::DateOfBirth => "dateOfBirth",
            FieldId::Gender => "gender",
            FieldId::Weight => "weight",
            FieldId::Height => "height",
            FieldId::BloodGroup => "bloodGroup",
            FieldId::PostalCode => "postalCode",
            FieldId::Building => "building",
            FieldId::City => "city",
            FieldId::SubDistrict => "subDistrict",
            FieldId::District => "district",
            FieldId::State => "state",
            FieldId::Allergies => "allergies",
            FieldId::MedicationName => "medicationName",
            FieldId::MedicationFrequency => "medicationFrequency",
            FieldId::Password => "password",
            FieldId::ConfirmPassword => "confirmPassword",
        }
    }

    /// Human-readable label shown next to the input.
    pub fn label(self) -> &'static str {
        match self {
            FieldId::FirstName => "First Name",
            FieldId::MiddleName => "Middle Name",
            FieldId::Surname => "Surname",
            FieldId::Mobile => "Mobile",
            FieldId::Email => "Email",
            FieldId::NationalId => "National ID",
            FieldId::DateOfBirth => "Date of Birth",
            FieldId::Gender => "Gender",
            FieldId::Weight => "Weight",
            FieldId::Height => "Height",
            FieldId::BloodGroup => "Blood Group",
            FieldId::PostalCode => "Postal Code",
            FieldId::Building => "Building",
            FieldId::City => "City",
            FieldId::SubDistrict => "Sub-district",
            FieldId::District => "District",
            FieldId::State => "State",
            FieldId::Allergies => "Allergies",
            FieldId::MedicationName => "Medication Name",
            FieldId::MedicationFrequency => "Medication Frequency",
            FieldId::Password => "Password",
            FieldId::ConfirmPassword => "Confirm Password",
        }
    }

    /// Whether the value must never be echoed back to a client or written to logs.
    pub fn is_secret(self) -> bool {
        matches!(self, FieldId::Password | FieldId::ConfirmPassword)
    }

    /// Input widget used to render this field.
    pub fn widget(self) -> Widget {
        let kind = match self {
            FieldId::Gender => WidgetKind::Select,
            FieldId::DateOfBirth => WidgetKind::Date,
            FieldId::Password | FieldId::ConfirmPassword => WidgetKind::Password,
            _ => WidgetKind::Text,
        };
        let options: &'static [SelectOption] = match self {
            FieldId::Gender => GENDER_OPTIONS,
            _ => &[],
        };
        Widget {
            label: self.label(),
            kind,
            options,
        }
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldId {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldId::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| FormError::UnknownField(s.to_string()))
    }
}

/// Kind of input control.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum WidgetKind {
    Text,
    Date,
    Password,
    Select,
}

/// One entry of a select input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
}

/// Declarative description of how a field is rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Widget {
    pub label: &'static str,
    pub kind: WidgetKind,
    pub options: &'static [SelectOption],
}

const GENDER_OPTIONS: &[SelectOption] = &[
    SelectOption {
        value: "male",
        label: "Male",
    },
    SelectOption {
        value: "female",
        label: "Female",
    },
    SelectOption {
        value: "other",
        label: "Other",
    },
];
