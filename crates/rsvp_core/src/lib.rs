//! RSVP flow: form state, validation, notification payloads, and the submission lifecycle.

pub mod form;
mod session;
pub mod templates;
pub mod validator;

pub use form::RsvpForm;
pub use session::{
    CloseReason, RsvpSession, SessionConfig, SessionEvent, SubmissionResult, SubmissionStatus,
    DEFAULT_AUTO_CLOSE_DELAY, SUCCESS_MESSAGE, SUCCESS_TITLE,
};
pub use validator::{is_submittable, validate};
