use std::{
    sync::{Arc, Weak},
    time::Duration,
};

use chrono::Utc;
use futures::future::join_all;
use notifier::Notifier;
use shared::{
    domain::{FieldSpec, FormField, PartyDetails, RsvpDraft, SessionId},
    error::{FieldError, NotificationFailure, ValidationFailure},
};
use tokio::{
    sync::{broadcast, Mutex},
    task::JoinHandle,
};
use tracing::{debug, info, warn};

use crate::{
    form::RsvpForm,
    templates::{build_notifications, TemplateContext},
    validator,
};

pub const DEFAULT_AUTO_CLOSE_DELAY: Duration = Duration::from_millis(2000);
pub const SUCCESS_TITLE: &str = "RSVP Received!";
pub const SUCCESS_MESSAGE: &str = "Thank you for responding! We can't wait to celebrate with you.";

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub host_email: String,
    pub party: PartyDetails,
    pub auto_close_delay: Duration,
}

impl SessionConfig {
    pub fn new(host_email: impl Into<String>) -> Self {
        Self {
            host_email: host_email.into(),
            party: PartyDetails::default(),
            auto_close_delay: DEFAULT_AUTO_CLOSE_DELAY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionStatus {
    Idle,
    Submitting,
    Succeeded,
    Failed(NotificationFailure),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionResult {
    Sent,
    Failed(NotificationFailure),
    /// The draft is not submittable; nothing was dispatched.
    Invalid(ValidationFailure),
    /// Another submission is still running; this call did nothing.
    InFlight,
    /// Already succeeded and waiting for the automatic close.
    AwaitingClose,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    Dismissed,
    AutoAfterSuccess,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    StatusChanged(SubmissionStatus),
    DraftReset,
    Closed(CloseReason),
}

struct SessionState {
    form: RsvpForm,
    status: SubmissionStatus,
    open: bool,
    // bumped on every close so late completions can tell the session moved on
    epoch: u64,
    auto_close: Option<JoinHandle<()>>,
}

/// One RSVP modal: owns the draft and the submission lifecycle.
pub struct RsvpSession {
    id: SessionId,
    config: SessionConfig,
    notifier: Arc<dyn Notifier>,
    inner: Mutex<SessionState>,
    events: broadcast::Sender<SessionEvent>,
}

impl RsvpSession {
    pub fn new(notifier: Arc<dyn Notifier>, config: SessionConfig) -> Arc<Self> {
        let (events, _) = broadcast::channel(64);
        let id = SessionId::new();
        debug!(session = %id, "rsvp session opened");
        Arc::new(Self {
            id,
            config,
            notifier,
            inner: Mutex::new(SessionState {
                form: RsvpForm::new(),
                status: SubmissionStatus::Idle,
                open: true,
                epoch: 0,
                auto_close: None,
            }),
            events,
        })
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub async fn draft(&self) -> RsvpDraft {
        self.inner.lock().await.form.draft().clone()
    }

    pub async fn status(&self) -> SubmissionStatus {
        self.inner.lock().await.status.clone()
    }

    pub async fn is_open(&self) -> bool {
        self.inner.lock().await.open
    }

    pub async fn field_list(&self) -> Vec<FieldSpec> {
        self.inner.lock().await.form.field_list()
    }

    pub async fn is_submittable(&self) -> bool {
        validator::is_submittable(self.inner.lock().await.form.draft())
    }

    pub async fn set_field(&self, field: FormField, value: &str) -> Result<(), FieldError> {
        self.inner.lock().await.form.set_field(field, value)
    }

    pub async fn set_field_by_key(&self, key: &str, value: &str) -> Result<(), FieldError> {
        self.inner.lock().await.form.set_field_by_key(key, value)
    }

    /// Sends the guest confirmation and the host alert for the current draft.
    ///
    /// At most one submission runs per session; calls made while one is in flight
    /// return [`SubmissionResult::InFlight`] without contacting the notifier.
    pub async fn submit(self: &Arc<Self>) -> SubmissionResult {
        let (draft, epoch) = {
            let mut state = self.inner.lock().await;
            if !state.open {
                return SubmissionResult::Closed;
            }
            match state.status {
                SubmissionStatus::Submitting => {
                    debug!(session = %self.id, "submit ignored: already in flight");
                    return SubmissionResult::InFlight;
                }
                SubmissionStatus::Succeeded => return SubmissionResult::AwaitingClose,
                SubmissionStatus::Idle | SubmissionStatus::Failed(_) => {}
            }
            if let Err(failure) = validator::validate(state.form.draft()) {
                debug!(session = %self.id, %failure, "submit blocked by validation");
                return SubmissionResult::Invalid(failure);
            }
            self.set_status(&mut state, SubmissionStatus::Submitting);
            (state.form.draft().clone(), state.epoch)
        };

        info!(
            session = %self.id,
            attendance = %draft.attendance,
            "submitting rsvp"
        );
        let outcome = self.dispatch(&draft).await;

        let mut state = self.inner.lock().await;
        if state.epoch != epoch {
            warn!(
                session = %self.id,
                "session closed while submission was in flight; result discarded"
            );
            return match outcome {
                Ok(()) => SubmissionResult::Sent,
                Err(failure) => SubmissionResult::Failed(failure),
            };
        }

        match outcome {
            Ok(()) => {
                self.set_status(&mut state, SubmissionStatus::Succeeded);
                self.schedule_auto_close(&mut state);
                SubmissionResult::Sent
            }
            Err(failure) => {
                self.set_status(&mut state, SubmissionStatus::Failed(failure.clone()));
                SubmissionResult::Failed(failure)
            }
        }
    }

    /// Clears a failure so the form is editable again. The draft is kept.
    pub async fn dismiss_error(&self) -> bool {
        let mut state = self.inner.lock().await;
        if !matches!(state.status, SubmissionStatus::Failed(_)) {
            return false;
        }
        self.set_status(&mut state, SubmissionStatus::Idle);
        true
    }

    pub async fn close(&self) {
        let mut state = self.inner.lock().await;
        if !state.open {
            return;
        }
        self.close_locked(&mut state, CloseReason::Dismissed);
    }

    pub async fn open(&self) {
        let mut state = self.inner.lock().await;
        if state.open {
            return;
        }
        state.open = true;
        state.form.reset();
        debug!(session = %self.id, "rsvp session reopened");
    }

    async fn dispatch(&self, draft: &RsvpDraft) -> Result<(), NotificationFailure> {
        let ctx = TemplateContext {
            host_email: &self.config.host_email,
            party: &self.config.party,
            received_at: Utc::now(),
        };
        let plan = build_notifications(draft, &ctx)
            .map_err(|e| NotificationFailure::new(e.audience(), e.to_string()))?;

        // both sends are always attempted, even if one of them fails
        let results = join_all(plan.iter().map(|(audience, message)| async move {
            (audience, self.notifier.send(message).await)
        }))
        .await;

        let mut delivered = Vec::new();
        let mut failure = None;
        for (audience, result) in results {
            match result {
                Ok(()) => delivered.push(audience),
                Err(err) => {
                    let reason = format!("{err:#}");
                    warn!(session = %self.id, %audience, error = %reason, "notification failed");
                    failure.get_or_insert_with(|| NotificationFailure::new(audience, reason));
                }
            }
        }

        match failure {
            None => {
                info!(session = %self.id, "guest and host notified");
                Ok(())
            }
            Some(failure) => {
                if !delivered.is_empty() {
                    warn!(
                        session = %self.id,
                        ?delivered,
                        "partial delivery; a retry resends every notification"
                    );
                }
                Err(failure)
            }
        }
    }

    fn schedule_auto_close(self: &Arc<Self>, state: &mut SessionState) {
        if let Some(previous) = state.auto_close.take() {
            previous.abort();
        }
        let session: Weak<Self> = Arc::downgrade(self);
        let epoch = state.epoch;
        let delay = self.config.auto_close_delay;
        state.auto_close = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(session) = session.upgrade() {
                session.finish_auto_close(epoch).await;
            }
        }));
    }

    async fn finish_auto_close(&self, epoch: u64) {
        let mut state = self.inner.lock().await;
        if state.epoch != epoch || state.status != SubmissionStatus::Succeeded {
            return;
        }
        state.auto_close = None;
        self.close_locked(&mut state, CloseReason::AutoAfterSuccess);
    }

    fn close_locked(&self, state: &mut SessionState, reason: CloseReason) {
        if let Some(pending) = state.auto_close.take() {
            pending.abort();
        }
        state.epoch += 1;
        state.open = false;
        state.form.reset();
        self.set_status(state, SubmissionStatus::Idle);
        let _ = self.events.send(SessionEvent::DraftReset);
        let _ = self.events.send(SessionEvent::Closed(reason));
        info!(session = %self.id, ?reason, "rsvp session closed");
    }

    fn set_status(&self, state: &mut SessionState, status: SubmissionStatus) {
        if state.status == status {
            return;
        }
        state.status = status.clone();
        let _ = self.events.send(SessionEvent::StatusChanged(status));
    }
}

impl Drop for RsvpSession {
    fn drop(&mut self) {
        if let Some(pending) = self.inner.get_mut().auto_close.take() {
            pending.abort();
        }
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
