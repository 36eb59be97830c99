use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::FieldError;

pub const MIN_GUEST_COUNT: u8 = 1;
pub const MAX_GUEST_COUNT: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attendance {
    #[default]
    Yes,
    No,
    Maybe,
}

impl Attendance {
    pub const ALL: [Attendance; 3] = [Attendance::Yes, Attendance::No, Attendance::Maybe];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
            Self::Maybe => "maybe",
        }
    }

    /// Human-readable answer shown in the form and interpolated into emails.
    pub fn phrase(&self) -> &'static str {
        match self {
            Self::Yes => "Yes, I'll be there! 🎉",
            Self::No => "Sorry, can't make it 😢",
            Self::Maybe => "Maybe, not sure yet 🤔",
        }
    }
}

impl FromStr for Attendance {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yes" => Ok(Self::Yes),
            "no" => Ok(Self::No),
            "maybe" => Ok(Self::Maybe),
            _ => Err(FieldError::UnknownAttendance(s.to_string())),
        }
    }
}

impl fmt::Display for Attendance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn guest_count_label(count: u8) -> String {
    if count == 1 {
        "1 person".to_string()
    } else {
        format!("{count} people")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RsvpDraft {
    pub name: String,
    pub email: String,
    pub attendance: Attendance,
    pub guest_count: u8,
    pub dietary_notes: String,
    pub message: String,
}

impl Default for RsvpDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            attendance: Attendance::Yes,
            guest_count: MIN_GUEST_COUNT,
            dietary_notes: String::new(),
            message: String::new(),
        }
    }
}

impl RsvpDraft {
    pub fn is_attending(&self) -> bool {
        self.attendance == Attendance::Yes
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FormField {
    Name,
    Email,
    Attendance,
    GuestCount,
    DietaryNotes,
    Message,
}

impl FormField {
    pub const ALL: [FormField; 6] = [
        FormField::Name,
        FormField::Email,
        FormField::Attendance,
        FormField::GuestCount,
        FormField::DietaryNotes,
        FormField::Message,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Attendance => "attendance",
            Self::GuestCount => "guestCount",
            Self::DietaryNotes => "dietaryNotes",
            Self::Message => "message",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Name => "Your Name *",
            Self::Email => "Email *",
            Self::Attendance => "Will you attend? *",
            Self::GuestCount => "Number of Guests",
            Self::DietaryNotes => "Dietary Restrictions",
            Self::Message => "Message (Optional)",
        }
    }

    pub fn placeholder(&self) -> Option<&'static str> {
        match self {
            Self::Name => Some("Enter your full name"),
            Self::Email => Some("your.email@example.com"),
            Self::DietaryNotes => Some("Any allergies or dietary needs?"),
            Self::Message => Some("Any special message or questions?"),
            Self::Attendance | Self::GuestCount => None,
        }
    }

    pub fn is_required(&self) -> bool {
        matches!(self, Self::Name | Self::Email | Self::Attendance)
    }

    /// Fields that only apply to guests who are coming.
    pub fn is_conditional(&self) -> bool {
        matches!(self, Self::GuestCount | Self::DietaryNotes)
    }
}

impl FromStr for FormField {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(Self::Name),
            "email" => Ok(Self::Email),
            "attendance" => Ok(Self::Attendance),
            "guestCount" | "guest_count" | "guests" => Ok(Self::GuestCount),
            "dietaryNotes" | "dietary_notes" | "dietaryRestrictions" => Ok(Self::DietaryNotes),
            "message" => Ok(Self::Message),
            _ => Err(FieldError::UnknownField(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub field: FormField,
    pub label: &'static str,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<&'static str>,
}

impl From<FormField> for FieldSpec {
    fn from(field: FormField) -> Self {
        Self {
            field,
            label: field.label(),
            required: field.is_required(),
            placeholder: field.placeholder(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartyDetails {
    pub honoree: String,
    pub date: String,
    pub time: String,
    pub location: String,
}

impl Default for PartyDetails {
    fn default() -> Self {
        Self {
            honoree: "Alex".into(),
            date: "Saturday, July 20th, 2025".into(),
            time: "6:00 PM - 11:00 PM".into(),
            location: "123 Celebration Street, Party City".into(),
        }
    }
}
