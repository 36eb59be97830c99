//! Form state for one RSVP modal: the draft plus field-by-field updates.

use shared::{
    domain::{
        guest_count_label, Attendance, FieldSpec, FormField, RsvpDraft, MAX_GUEST_COUNT,
        MIN_GUEST_COUNT,
    },
    error::FieldError,
};
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RsvpForm {
    draft: RsvpDraft,
}

impl RsvpForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &RsvpDraft {
        &self.draft
    }

    /// Applies raw form input to one field. Other fields are never touched.
    pub fn set_field(&mut self, field: FormField, value: &str) -> Result<(), FieldError> {
        match field {
            FormField::Name => self.draft.name = value.to_string(),
            FormField::Email => self.draft.email = value.to_string(),
            FormField::Attendance => self.draft.attendance = value.parse::<Attendance>()?,
            FormField::GuestCount => self.draft.guest_count = coerce_guest_count(value),
            FormField::DietaryNotes => self.draft.dietary_notes = value.to_string(),
            FormField::Message => self.draft.message = value.to_string(),
        }
        debug!(field = field.key(), "form field updated");
        Ok(())
    }

    pub fn set_field_by_key(&mut self, key: &str, value: &str) -> Result<(), FieldError> {
        let field = key.parse::<FormField>()?;
        self.set_field(field, value)
    }

    pub fn reset(&mut self) {
        self.draft = RsvpDraft::default();
    }

    /// Fields the form should render for the current draft, in display order.
    pub fn field_list(&self) -> Vec<FieldSpec> {
        let attending = self.draft.is_attending();
        FormField::ALL
            .into_iter()
            .filter(|field| attending || !field.is_conditional())
            .map(FieldSpec::from)
            .collect()
    }
}

pub fn guest_count_options() -> Vec<(u8, String)> {
    (MIN_GUEST_COUNT..=MAX_GUEST_COUNT)
        .map(|count| (count, guest_count_label(count)))
        .collect()
}

pub fn attendance_options() -> [(Attendance, &'static str); 3] {
    Attendance::ALL.map(|attendance| (attendance, attendance.phrase()))
}

/// Unparseable input falls back to one guest; numbers are clamped into the allowed range.
pub fn coerce_guest_count(value: &str) -> u8 {
    match value.trim().parse::<i64>() {
        Ok(count) if count >= i64::from(MIN_GUEST_COUNT) => {
            count.min(i64::from(MAX_GUEST_COUNT)) as u8
        }
        _ => MIN_GUEST_COUNT,
    }
}

#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod tests;
