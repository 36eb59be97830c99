use shared::{domain::RsvpDraft, error::ValidationFailure};

/// Loose submission policy: only name and email are required, and only to be non-blank.
pub fn validate(draft: &RsvpDraft) -> Result<(), ValidationFailure> {
    if draft.name.trim().is_empty() {
        return Err(ValidationFailure::MissingName);
    }
    if draft.email.trim().is_empty() {
        return Err(ValidationFailure::MissingEmail);
    }
    Ok(())
}

pub fn is_submittable(draft: &RsvpDraft) -> bool {
    validate(draft).is_ok()
}

#[cfg(test)]
#[path = "tests/validator_tests.rs"]
mod tests;
