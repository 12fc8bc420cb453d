//! Doctor-facing health-record entry.
//!
//! A single-step form: four free-text fields plus the patient being treated and the doctor
//! making the entry. The doctor identity comes from an [`IdentityProvider`] injected at
//! construction. A record is never posted without both identities; a missing one is reported
//! as a configuration problem instead of being sent as a blank id.

use crate::controller::Submission;
use crate::error::{FormError, FormResult, GatewayResult};
use crate::gateway::{IdentityProvider, RecordGateway};
use crate::notice::{self, Notice};
use crate::payload::HealthRecordPayload;
use medireg_types::NonEmptyText;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HealthRecordField {
    Diagnosis,
    Prescription,
    Status,
    Notes,
}

impl HealthRecordField {
    pub const ALL: [HealthRecordField; 4] = [
        HealthRecordField::Diagnosis,
        HealthRecordField::Prescription,
        HealthRecordField::Status,
        HealthRecordField::Notes,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            HealthRecordField::Diagnosis => "diagnosis",
            HealthRecordField::Prescription => "prescription",
            HealthRecordField::Status => "status",
            HealthRecordField::Notes => "notes",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            HealthRecordField::Diagnosis => "Diagnosis",
            HealthRecordField::Prescription => "Prescription",
            HealthRecordField::Status => "Status",
            HealthRecordField::Notes => "Notes",
        }
    }
}

impl FromStr for HealthRecordField {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HealthRecordField::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| FormError::UnknownField(s.to_string()))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HealthRecordDraft {
    pub diagnosis: String,
    pub prescription: String,
    pub status: String,
    pub notes: String,
}

impl HealthRecordDraft {
    fn slot_mut(&mut self, field: HealthRecordField) -> &mut String {
        match field {
            HealthRecordField::Diagnosis => &mut self.diagnosis,
            HealthRecordField::Prescription => &mut self.prescription,
            HealthRecordField::Status => &mut self.status,
            HealthRecordField::Notes => &mut self.notes,
        }
    }
}

#[derive(Debug)]
pub struct HealthRecordController {
    draft: HealthRecordDraft,
    patient_id: Option<NonEmptyText>,
    doctor_id: Option<NonEmptyText>,
    is_submitting: bool,
    notices: Vec<Notice>,
}

impl HealthRecordController {
    /// Creates a controller with already-known identities. Blank ids count as missing.
    pub fn new(patient_id: Option<&str>, doctor_id: Option<&str>) -> Self {
        Self {
            draft: HealthRecordDraft::default(),
            patient_id: patient_id.and_then(|id| NonEmptyText::new(id).ok()),
            doctor_id: doctor_id.and_then(|id| NonEmptyText::new(id).ok()),
            is_submitting: false,
            notices: Vec::new(),
        }
    }

    /// Creates a controller, resolving the doctor identity from `identity`.
    ///
    /// A failure to resolve is logged and leaves the doctor unset; submission will then be
    /// refused with [`FormError::MissingIdentity`].
    pub async fn initialise(identity: &dyn IdentityProvider, patient_id: Option<&str>) -> Self {
        let doctor_id = match identity.doctor_id().await {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!("could not resolve doctor identity: {}", e);
                None
            }
        };
        Self::new(patient_id, doctor_id.as_deref())
    }

    pub fn draft(&self) -> &HealthRecordDraft {
        &self.draft
    }

    pub fn patient_id(&self) -> Option<&str> {
        self.patient_id.as_ref().map(NonEmptyText::as_str)
    }

    pub fn doctor_id(&self) -> Option<&str> {
        self.doctor_id.as_ref().map(NonEmptyText::as_str)
    }

    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub fn change_field(&mut self, field: HealthRecordField, value: impl Into<String>) {
        *self.draft.slot_mut(field) = value.into();
    }

    /// Clears the draft. Identities are kept.
    pub fn cancel(&mut self) {
        self.draft = HealthRecordDraft::default();
    }

    /// Marks a submission as in flight and returns its payload, or `None` if one already is.
    ///
    /// # Errors
    ///
    /// Returns `FormError::MissingIdentity` when the doctor or patient is unknown.
    pub fn begin_submission(&mut self) -> FormResult<Option<HealthRecordPayload>> {
        if self.is_submitting {
            return Ok(None);
        }
        let Some(doctor_id) = self.doctor_id.as_ref() else {
            self.notices
                .push(Notice::error("Doctor identity is not available; sign in again"));
            return Err(FormError::MissingIdentity("doctor"));
        };
        let Some(patient_id) = self.patient_id.as_ref() else {
            self.notices.push(Notice::error("No patient selected"));
            return Err(FormError::MissingIdentity("patient"));
        };

        let payload = HealthRecordPayload {
            diagnosis: self.draft.diagnosis.clone(),
            prescription: self.draft.prescription.clone(),
            status: self.draft.status.clone(),
            notes: self.draft.notes.clone(),
            patient_id: patient_id.to_string(),
            doctor_id: doctor_id.to_string(),
        };
        self.is_submitting = true;
        Ok(Some(payload))
    }

    pub fn complete_submission(&mut self, outcome: GatewayResult<()>) -> Submission {
        self.is_submitting = false;
        match outcome {
            Ok(()) => {
                tracing::info!(
                    "health record added for patient {}",
                    self.patient_id().unwrap_or_default()
                );
                self.notices.push(Notice::success(notice::HEALTH_RECORD_ADDED));
                self.cancel();
                Submission::Accepted
            }
            Err(e) => {
                tracing::warn!("health record submission failed: {}", e);
                self.notices.push(Notice::error(notice::HEALTH_RECORD_FAILED));
                Submission::Failed
            }
        }
    }

    pub async fn submit(&mut self, gateway: &dyn RecordGateway) -> FormResult<Submission> {
        let Some(payload) = self.begin_submission()? else {
            return Ok(Submission::AlreadyInFlight);
        };
        let outcome = gateway.submit_health_record(&payload).await;
        Ok(self.complete_submission(outcome))
    }
}
