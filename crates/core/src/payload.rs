//! JSON bodies sent to the backend.
//!
//! The key names follow the backend's existing contract, which predates the record's
//! grouping, so the payload is built by conversion rather than by serialising
//! [`FormRecord`] directly.

use crate::record::FormRecord;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullName {
    pub first_name: String,
    pub middle_name: String,
    #[serde(rename = "surName")]
    pub surname: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressPayload {
    pub pincode: String,
    pub building: String,
    pub city: String,
    pub taluka: String,
    pub district: String,
    pub state: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Medication {
    pub name: String,
    pub frequency: String,
}

/// Body of `POST /api/register/user`.
///
/// There is no confirm-password field: it exists only for local validation.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationPayload {
    pub fullname: FullName,
    pub mobile: String,
    pub email: String,
    #[serde(rename = "adharCard")]
    pub national_id: String,
    #[serde(rename = "dob")]
    pub date_of_birth: String,
    pub gender: String,
    pub weight: String,
    pub height: String,
    pub blood_group: String,
    pub address: AddressPayload,
    pub allergies: String,
    pub medication: Medication,
    pub password: String,
}

impl std::fmt::Debug for RegistrationPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationPayload")
            .field("fullname", &self.fullname)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl From<&FormRecord> for RegistrationPayload {
    fn from(record: &FormRecord) -> Self {
        Self {
            fullname: FullName {
                first_name: record.identity.first_name.clone(),
                middle_name: record.identity.middle_name.clone(),
                surname: record.identity.surname.clone(),
            },
            mobile: record.contact.mobile.clone(),
            email: record.contact.email.clone(),
            national_id: record.identifier.national_id.clone(),
            date_of_birth: record.demographics.date_of_birth.clone(),
            gender: record.demographics.gender.clone(),
            weight: record.demographics.weight.clone(),
            height: record.demographics.height.clone(),
            blood_group: record.demographics.blood_group.clone(),
            address: AddressPayload {
                pincode: record.address.postal_code.clone(),
                building: record.address.building.clone(),
                city: record.address.city.clone(),
                taluka: record.address.sub_district.clone(),
                district: record.address.district.clone(),
                state: record.address.state.clone(),
            },
            allergies: record.medical_profile.allergies.clone(),
            medication: Medication {
                name: record.medical_profile.medication_name.clone(),
                frequency: record.medical_profile.medication_frequency.clone(),
            },
            password: record.credentials.password.clone(),
        }
    }
}

/// Body of `POST /api/records/newrecord`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthRecordPayload {
    pub diagnosis: String,
    pub prescription: String,
    pub status: String,
    pub notes: String,
    pub patient_id: String,
    pub doctor_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldId;

    #[test]
    fn registration_payload_uses_backend_keys_and_omits_confirm_password() {
        let mut record = FormRecord::default();
        record.set(FieldId::FirstName, "Asha".into());
        record.set(FieldId::Surname, "Patil".into());
        record.set(FieldId::NationalId, "123456789012".into());
        record.set(FieldId::PostalCode, "400001".into());
        record.set(FieldId::SubDistrict, "Fort".into());
        record.set(FieldId::MedicationName, "Metformin".into());
        record.set(FieldId::Password, "abcdefgh".into());
        record.set(FieldId::ConfirmPassword, "abcdefgh".into());

        let json = serde_json::to_value(RegistrationPayload::from(&record)).unwrap();

        assert_eq!(json["fullname"]["firstName"], "Asha");
        assert_eq!(json["fullname"]["surName"], "Patil");
        assert_eq!(json["adharCard"], "123456789012");
        assert_eq!(json["address"]["pincode"], "400001");
        assert_eq!(json["address"]["taluka"], "Fort");
        assert_eq!(json["medication"]["name"], "Metformin");
        assert_eq!(json["password"], "abcdefgh");
        assert!(json.get("confirmPassword").is_none());
        assert!(!json.to_string().contains("confirm"));
    }

    #[test]
    fn health_record_payload_is_camel_case() {
        let payload = HealthRecordPayload {
            diagnosis: "Flu".into(),
            prescription: "Rest".into(),
            status: "open".into(),
            notes: "".into(),
            patient_id: "p-1".into(),
            doctor_id: "d-1".into(),
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["patientId"], "p-1");
        assert_eq!(json["doctorId"], "d-1");
    }
}
