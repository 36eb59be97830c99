use std::{sync::Arc, time::Duration};

use notifier::MemoryNotifier;
use rsvp_core::{
    CloseReason, RsvpSession, SessionConfig, SessionEvent, SubmissionResult, SubmissionStatus,
};
use shared::domain::RsvpDraft;

#[tokio::test]
async fn modal_session_from_first_keystroke_to_auto_close() {
    let notifier = Arc::new(MemoryNotifier::new());
    let session = RsvpSession::new(
        notifier.clone(),
        SessionConfig {
            auto_close_delay: Duration::from_millis(50),
            ..SessionConfig::new("host@example.com")
        },
    );
    let mut events = session.subscribe_events();

    for (key, value) in [
        ("name", "Ada"),
        ("email", "ada@example.com"),
        ("attendance", "yes"),
        ("guests", "abc"),
        ("guests", "2"),
        ("dietaryRestrictions", ""),
        ("message", "Congrats!"),
    ] {
        session
            .set_field_by_key(key, value)
            .await
            .expect("form input");
    }
    assert!(session.is_submittable().await);

    assert_eq!(session.submit().await, SubmissionResult::Sent);

    let delivered = notifier.delivered().await;
    assert_eq!(delivered.len(), 2);
    let guest = delivered
        .iter()
        .find(|m| m.to == "ada@example.com")
        .expect("guest confirmation");
    assert!(guest.text.contains("Ada"));
    assert!(guest.text.contains("2 people"));
    let host = delivered
        .iter()
        .find(|m| m.to == "host@example.com")
        .expect("host alert");
    assert!(host.text.contains("Ada"));
    assert!(host.text.contains("ada@example.com"));

    let closed = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            match events.recv().await {
                Ok(SessionEvent::Closed(reason)) => return reason,
                Ok(_) => continue,
                Err(err) => panic!("event stream ended: {err}"),
            }
        }
    })
    .await
    .expect("auto close fired");

    assert_eq!(closed, CloseReason::AutoAfterSuccess);
    assert_eq!(session.status().await, SubmissionStatus::Idle);
    assert_eq!(session.draft().await, RsvpDraft::default());
}

#[tokio::test]
async fn declined_rsvp_omits_party_size_everywhere() {
    let notifier = Arc::new(MemoryNotifier::new());
    let session = RsvpSession::new(notifier.clone(), SessionConfig::new("host@example.com"));

    for (key, value) in [
        ("name", "Ada"),
        ("email", "ada@example.com"),
        ("guests", "3"),
        ("attendance", "no"),
    ] {
        session
            .set_field_by_key(key, value)
            .await
            .expect("form input");
    }
    assert_eq!(session.draft().await.guest_count, 3);

    assert_eq!(session.submit().await, SubmissionResult::Sent);
    for message in notifier.delivered().await {
        assert!(!message.text.contains("Party size"));
        assert!(!message.html.contains("Party size"));
        assert!(!message.text.contains("3 people"));
    }
}
