//! REST request and response bodies.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SelectOptionDto {
    pub value: String,
    pub label: String,
}

/// A field as rendered on a step.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FieldDto {
    pub field: String,
    pub label: String,
    /// One of `text`, `date`, `password`, `select`.
    pub kind: String,
    pub required: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOptionDto>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StepDto {
    pub index: usize,
    pub title: String,
    pub fields: Vec<FieldDto>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StepsRes {
    pub steps: Vec<StepDto>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NoticeDto {
    /// `success` or `error`.
    pub level: String,
    pub message: String,
}

/// Snapshot of a registration session after an operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionRes {
    pub id: String,
    pub current_step: usize,
    pub step_title: String,
    pub step_count: usize,
    /// Field values keyed by field name. Password fields are never included.
    pub values: BTreeMap<String, String>,
    /// Non-empty validation messages keyed by field name.
    pub errors: BTreeMap<String, String>,
    pub is_submitting: bool,
    pub notices: Vec<NoticeDto>,
    /// Route the client should navigate to, set after a successful submission.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ChangeFieldReq {
    pub value: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewHealthRecordReq {
    #[serde(default)]
    pub diagnosis: String,
    #[serde(default)]
    pub prescription: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub notes: String,
    pub patient_id: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NewHealthRecordRes {
    pub accepted: bool,
    pub notices: Vec<NoticeDto>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub error: String,
}
