use std::{path::PathBuf, time::Duration};

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use rsvp_core::{RsvpSession, SessionEvent, SubmissionResult, SUCCESS_MESSAGE, SUCCESS_TITLE};
use shared::domain::FormField;
use tokio::sync::broadcast;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;

use config::load_settings;

/// Send an RSVP for the birthday party.
#[derive(Parser, Debug)]
struct Args {
    #[arg(long, default_value = "rsvp.toml")]
    config: PathBuf,
    #[arg(long, default_value = "")]
    name: String,
    #[arg(long, default_value = "")]
    email: String,
    /// yes, no or maybe
    #[arg(long, default_value = "yes")]
    attendance: String,
    #[arg(long, default_value = "1")]
    guests: String,
    #[arg(long, default_value = "")]
    dietary: String,
    #[arg(long, default_value = "")]
    message: String,
    /// Log the emails instead of sending them.
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();
    let args = Args::parse();

    let settings = load_settings(&args.config)?;
    let notifier = settings.notifier(args.dry_run)?;
    let session = RsvpSession::new(notifier, settings.session_config());
    let mut events = session.subscribe_events();

    for (field, value) in [
        (FormField::Name, &args.name),
        (FormField::Email, &args.email),
        (FormField::Attendance, &args.attendance),
        (FormField::GuestCount, &args.guests),
        (FormField::DietaryNotes, &args.dietary),
        (FormField::Message, &args.message),
    ] {
        session
            .set_field(field, value)
            .await
            .with_context(|| format!("invalid value for {}", field.key()))?;
    }

    let party = &settings.party;
    println!("RSVP to {}'s party", party.honoree);
    println!("  {} | {} | {}", party.date, party.time, party.location);
    let draft = session.draft().await;
    for spec in session.field_list().await {
        let value = match spec.field {
            FormField::Name => draft.name.clone(),
            FormField::Email => draft.email.clone(),
            FormField::Attendance => draft.attendance.phrase().to_string(),
            FormField::GuestCount => shared::domain::guest_count_label(draft.guest_count),
            FormField::DietaryNotes => draft.dietary_notes.clone(),
            FormField::Message => draft.message.clone(),
        };
        println!("  {:<24} {value}", spec.label);
    }

    match session.submit().await {
        SubmissionResult::Sent => {
            println!("{SUCCESS_TITLE}");
            println!("{SUCCESS_MESSAGE}");
            wait_for_close(&mut events, settings.auto_close).await;
            Ok(())
        }
        SubmissionResult::Failed(failure) => {
            warn!(reason = %failure.reason, audience = %failure.audience, "rsvp not sent");
            Err(anyhow!("{} ({failure})", failure.user_message()))
        }
        SubmissionResult::Invalid(failure) => bail!("cannot send RSVP: {failure}"),
        other => bail!("submission did not run: {other:?}"),
    }
}

async fn wait_for_close(events: &mut broadcast::Receiver<SessionEvent>, delay: Duration) {
    let closed = tokio::time::timeout(delay + Duration::from_secs(1), async {
        loop {
            match events.recv().await {
                Ok(SessionEvent::Closed(reason)) => return Some(reason),
                Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    })
    .await;

    match closed {
        Ok(Some(reason)) => info!(?reason, "rsvp modal closed"),
        Ok(None) | Err(_) => warn!("rsvp modal did not close on its own"),
    }
}
