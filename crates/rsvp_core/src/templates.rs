//! Guest confirmation and host alert payloads built from a draft.

use chrono::{DateTime, Utc};
use horrorshow::{html, Template};
use shared::{
    domain::{guest_count_label, PartyDetails, RsvpDraft},
    error::Audience,
    protocol::{EmailMessage, NotificationPlan},
};
use thiserror::Error;

const GUEST_CLOSING: &str = "We can't wait to celebrate with you!";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to render {audience} html: {message}")]
    Html { audience: Audience, message: String },
}

impl RenderError {
    pub fn audience(&self) -> Audience {
        match self {
            Self::Html { audience, .. } => *audience,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TemplateContext<'a> {
    pub host_email: &'a str,
    pub party: &'a PartyDetails,
    pub received_at: DateTime<Utc>,
}

type Line = (&'static str, String);

pub fn build_notifications(
    draft: &RsvpDraft,
    ctx: &TemplateContext<'_>,
) -> Result<NotificationPlan, RenderError> {
    Ok(NotificationPlan {
        guest: guest_confirmation(draft, ctx.party)?,
        host: host_alert(draft, ctx)?,
    })
}

pub fn guest_confirmation(
    draft: &RsvpDraft,
    party: &PartyDetails,
) -> Result<EmailMessage, RenderError> {
    let name = draft.name.trim();
    let greeting = format!("Hi {name},");
    let intro = format!(
        "Thanks for your RSVP to {}'s birthday party!",
        party.honoree
    );

    let mut lines: Vec<Line> = vec![("Your response", draft.attendance.phrase().to_string())];
    lines.extend(attending_lines(draft));
    if let Some(message) = non_empty(&draft.message) {
        lines.push(("Your message", message.to_string()));
    }

    let party_lines: [Line; 3] = [
        ("Date", party.date.clone()),
        ("Time", party.time.clone()),
        ("Location", party.location.clone()),
    ];

    let mut text = format!("{greeting}\n\n{intro}\n\n");
    push_lines(&mut text, &lines);
    text.push_str("\nParty details\n");
    push_lines(&mut text, &party_lines);
    text.push('\n');
    text.push_str(GUEST_CLOSING);
    text.push('\n');

    let html = html! {
        div(style = "font-family: sans-serif") {
            h2 : "RSVP Received! 🎉";
            p : greeting.as_str();
            p : intro.as_str();
            table {
                @ for (label, value) in lines.iter() {
                    tr {
                        td { strong : format!("{label}:"); }
                        td : value.as_str();
                    }
                }
            }
            h3 : "Party details";
            ul {
                @ for (label, value) in party_lines.iter() {
                    li : format!("{label}: {value}");
                }
            }
            p : GUEST_CLOSING;
        }
    }
    .into_string()
    .map_err(|e| RenderError::Html {
        audience: Audience::Guest,
        message: e.to_string(),
    })?;

    Ok(EmailMessage {
        to: draft.email.trim().to_string(),
        subject: format!("RSVP received: {}'s birthday party", party.honoree),
        html,
        text,
    })
}

pub fn host_alert(draft: &RsvpDraft, ctx: &TemplateContext<'_>) -> Result<EmailMessage, RenderError> {
    let name = draft.name.trim();
    let email = draft.email.trim();
    let heading = format!("New RSVP from {name}");

    let mut lines: Vec<Line> = vec![
        ("Name", name.to_string()),
        ("Email", email.to_string()),
        ("Response", draft.attendance.phrase().to_string()),
    ];
    lines.extend(attending_lines(draft));
    if let Some(message) = non_empty(&draft.message) {
        lines.push(("Message", message.to_string()));
    }
    lines.push((
        "Received",
        ctx.received_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    ));

    let mut text = format!("{heading}\n\n");
    push_lines(&mut text, &lines);

    let html = html! {
        div(style = "font-family: sans-serif") {
            h2 : heading.as_str();
            table {
                @ for (label, value) in lines.iter() {
                    tr {
                        td { strong : format!("{label}:"); }
                        td : value.as_str();
                    }
                }
            }
        }
    }
    .into_string()
    .map_err(|e| RenderError::Html {
        audience: Audience::Host,
        message: e.to_string(),
    })?;

    Ok(EmailMessage {
        to: ctx.host_email.to_string(),
        subject: format!("New RSVP from {name} ({})", draft.attendance),
        html,
        text,
    })
}

/// Party size and dietary notes only mean something for guests who are coming.
fn attending_lines(draft: &RsvpDraft) -> Vec<Line> {
    if !draft.is_attending() {
        return Vec::new();
    }
    let mut lines = vec![("Party size", guest_count_label(draft.guest_count))];
    if let Some(notes) = non_empty(&draft.dietary_notes) {
        lines.push(("Dietary notes", notes.to_string()));
    }
    lines
}

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

fn push_lines(out: &mut String, lines: &[Line]) {
    for (label, value) in lines {
        out.push_str(label);
        out.push_str(": ");
        out.push_str(value);
        out.push('\n');
    }
}

#[cfg(test)]
#[path = "tests/templates_tests.rs"]
mod tests;
