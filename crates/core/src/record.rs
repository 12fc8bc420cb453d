//! The registration record and its per-field error map.

use crate::error::ValidationError;
use crate::field::FieldId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub first_name: String,
    pub middle_name: String,
    pub surname: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub mobile: String,
    pub email: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identifier {
    pub national_id: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Demographics {
    pub date_of_birth: String,
    pub gender: String,
    pub weight: String,
    pub height: String,
    pub blood_group: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub postal_code: String,
    pub building: String,
    pub city: String,
    pub sub_district: String,
    pub district: String,
    pub state: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalProfile {
    pub allergies: String,
    pub medication_name: String,
    pub medication_frequency: String,
}

/// Not `Serialize`: credentials only leave the process through
/// [`RegistrationPayload`](crate::payload::RegistrationPayload), which has no confirm field.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub password: String,
    pub confirm_password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("password", &"<redacted>")
            .field("confirm_password", &"<redacted>")
            .finish()
    }
}

/// The complete nested record built up across the form steps.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormRecord {
    pub identity: Identity,
    pub contact: Contact,
    pub identifier: Identifier,
    pub demographics: Demographics,
    pub address: Address,
    pub medical_profile: MedicalProfile,
    pub credentials: Credentials,
}

impl FormRecord {
    /// Current value of `field`.
    pub fn get(&self, field: FieldId) -> &str {
        match field {
            FieldId::FirstName => &self.identity.first_name,
            FieldId::MiddleName => &self.identity.middle_name,
            FieldId::Surname => &self.identity.surname,
            FieldId::Mobile => &self.contact.mobile,
            FieldId::Email => &self.contact.email,
            FieldId::NationalId => &self.identifier.national_id,
            FieldId::DateOfBirth => &self.demographics.date_of_birth,
            FieldId::Gender => &self.demographics.gender,
            FieldId::Weight => &self.demographics.weight,
            FieldId::Height => &self.demographics.height,
            FieldId::BloodGroup => &self.demographics.blood_group,
            FieldId::PostalCode => &self.address.postal_code,
            FieldId::Building => &self.address.building,
            FieldId::City => &self.address.city,
            FieldId::SubDistrict => &self.address.sub_district,
            FieldId::District => &self.address.district,
            FieldId::State => &self.address.state,
            FieldId::Allergies => &self.medical_profile.allergies,
            FieldId::MedicationName => &self.medical_profile.medication_name,
            FieldId::MedicationFrequency => &self.medical_profile.medication_frequency,
            FieldId::Password => &self.credentials.password,
            FieldId::ConfirmPassword => &self.credentials.confirm_password,
        }
    }

    /// Overwrites `field` with `value`.
    pub fn set(&mut self, field: FieldId, value: String) {
        *self.slot_mut(field) = value;
    }

    fn slot_mut(&mut self, field: FieldId) -> &mut String {
        match field {
            FieldId::FirstName => &mut self.identity.first_name,
            FieldId::MiddleName => &mut self.identity.middle_name,
            FieldId::Surname => &mut self.identity.surname,
            FieldId::Mobile => &mut self.contact.mobile,
            FieldId::Email => &mut self.contact.email,
            FieldId::NationalId => &mut self.identifier.national_id,
            FieldId::DateOfBirth => &mut self.demographics.date_of_birth,
            FieldId::Gender => &mut self.demographics.gender,
            FieldId::Weight => &mut self.demographics.weight,
            FieldId::Height => &mut self.demographics.height,
            FieldId::BloodGroup => &mut self.demographics.blood_group,
            FieldId::PostalCode => &mut self.address.postal_code,
            FieldId::Building => &mut self.address.building,
            FieldId::City => &mut self.address.city,
            FieldId::SubDistrict => &mut self.address.sub_district,
            FieldId::District => &mut self.address.district,
            FieldId::State => &mut self.address.state,
            FieldId::Allergies => &mut self.medical_profile.allergies,
            FieldId::MedicationName => &mut self.medical_profile.medication_name,
            FieldId::MedicationFrequency => &mut self.medical_profile.medication_frequency,
            FieldId::Password => &mut self.credentials.password,
            FieldId::ConfirmPassword => &mut self.credentials.confirm_password,
        }
    }
}

/// Current validation message per field. A missing entry and an empty message both mean
/// the field is valid.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ErrorMap(BTreeMap<FieldId, String>);

impl ErrorMap {
    /// Message for `field`, or `""` when valid.
    pub fn get(&self, field: FieldId) -> &str {
        self.0.get(&field).map(String::as_str).unwrap_or("")
    }

    /// Records the outcome of validating `field`.
    pub fn record(&mut self, field: FieldId, outcome: Result<(), ValidationError>) {
        let message = match outcome {
            Ok(()) => String::new(),
            Err(err) => err.to_string(),
        };
        self.0.insert(field, message);
    }

    pub fn clear(&mut self, field: FieldId) {
        self.0.insert(field, String::new());
    }

    pub fn is_valid(&self, field: FieldId) -> bool {
        self.get(field).is_empty()
    }

    /// Fields that currently carry a non-empty message.
    pub fn failing(&self) -> impl Iterator<Item = FieldId> + '_ {
        self.0
            .iter()
            .filter(|(_, message)| !message.is_empty())
            .map(|(field, _)| *field)
    }

    /// All entries, including fields recorded as valid.
    pub fn iter(&self) -> impl Iterator<Item = (FieldId, &str)> + '_ {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }
}
