//! Toast-style messages queued for the presentation layer.

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A plain-text message shown to the user once.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

pub const FILL_REQUIRED_FIELDS: &str = "Please fill in all required fields correctly";
pub const ENTER_POSTAL_CODE: &str = "Please enter a postal code";
pub const ADDRESS_FETCHED: &str = "Address details fetched successfully";
pub const INVALID_POSTAL_CODE: &str = "Invalid postal code";
pub const ADDRESS_LOOKUP_FAILED: &str = "Error fetching address details";
pub const REGISTRATION_SUCCEEDED: &str = "User registration successful";
pub const REGISTRATION_FAILED: &str = "User registration failed";
pub const HEALTH_RECORD_ADDED: &str = "Health record added";
pub const HEALTH_RECORD_FAILED: &str = "Health record registration failed";
