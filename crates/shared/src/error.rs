use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A draft that cannot be submitted. Resolved locally by disabling submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationFailure {
    #[error("name is required")]
    MissingName,
    #[error("email is required")]
    MissingEmail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Audience {
    Guest,
    Host,
}

impl fmt::Display for Audience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Guest => "guest confirmation",
            Self::Host => "host alert",
        })
    }
}

pub const GENERIC_NOTIFICATION_ERROR: &str = "We couldn't send your RSVP. Please try again.";

/// Any rejection from the notification collaborator. Always retryable.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{audience} failed: {reason}")]
pub struct NotificationFailure {
    pub audience: Audience,
    pub reason: String,
}

impl NotificationFailure {
    pub fn new(audience: Audience, reason: impl Into<String>) -> Self {
        Self {
            audience,
            reason: reason.into(),
        }
    }

    pub fn user_message(&self) -> &'static str {
        GENERIC_NOTIFICATION_ERROR
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("unknown form field '{0}'")]
    UnknownField(String),
    #[error("unknown attendance value '{0}' (expected yes, no or maybe)")]
    UnknownAttendance(String),
}
