use super::*;
use shared::domain::Attendance;

fn draft(name: &str, email: &str) -> RsvpDraft {
    RsvpDraft {
        name: name.into(),
        email: email.into(),
        ..RsvpDraft::default()
    }
}

#[test]
fn blank_name_or_email_is_not_submittable() {
    for (name, email) in [
        ("", "ada@example.com"),
        ("   ", "ada@example.com"),
        ("\t\n", "ada@example.com"),
        ("Ada", ""),
        ("Ada", "  "),
        ("", ""),
    ] {
        assert!(
            !is_submittable(&draft(name, email)),
            "name={name:?} email={email:?} should be rejected"
        );
    }
}

#[test]
fn missing_name_is_reported_before_missing_email() {
    assert_eq!(validate(&draft(" ", " ")), Err(ValidationFailure::MissingName));
    assert_eq!(
        validate(&draft("Ada", " ")),
        Err(ValidationFailure::MissingEmail)
    );
}

#[test]
fn other_fields_never_block_submission() {
    let mut candidate = draft(" Ada ", "not-even-an-address");
    for attendance in Attendance::ALL {
        candidate.attendance = attendance;
        for guest_count in [0, 1, 5, u8::MAX] {
            candidate.guest_count = guest_count;
            candidate.dietary_notes = "x".repeat(guest_count as usize);
            candidate.message = String::new();
            assert!(is_submittable(&candidate));
        }
    }
}

#[test]
fn validation_is_repeatable() {
    let candidate = draft("Ada", "ada@example.com");
    let first = validate(&candidate);
    for _ in 0..10 {
        assert_eq!(validate(&candidate), first);
    }
}
