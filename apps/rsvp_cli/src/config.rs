use std::{fs, io, path::Path, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use notifier::{HttpNotifier, HttpNotifierConfig, LogNotifier, Notifier, DEFAULT_ENDPOINT};
use rsvp_core::{SessionConfig, DEFAULT_AUTO_CLOSE_DELAY};
use serde::Deserialize;
use shared::domain::PartyDetails;
use tracing::warn;
use url::Url;

pub struct Settings {
    pub host_email: String,
    pub from_address: String,
    pub notify_endpoint: String,
    pub notify_api_key: Option<String>,
    pub auto_close: Duration,
    pub party: PartyDetails,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host_email: "host@example.com".into(),
            from_address: "Birthday Party <party@example.com>".into(),
            notify_endpoint: DEFAULT_ENDPOINT.into(),
            notify_api_key: None,
            auto_close: DEFAULT_AUTO_CLOSE_DELAY,
            party: PartyDetails::default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileSettings {
    host_email: Option<String>,
    from_address: Option<String>,
    notify_endpoint: Option<String>,
    notify_api_key: Option<String>,
    auto_close_ms: Option<u64>,
    party: Option<PartyDetails>,
}

pub fn load_settings(path: &Path) -> Result<Settings> {
    load_settings_with(path, |key| std::env::var(key).ok())
}

/// File values override defaults; `RSVP_*` and then `APP__*` variables override the file.
pub fn load_settings_with(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> Result<Settings> {
    let mut settings = Settings::default();

    match fs::read_to_string(path) {
        Ok(raw) => {
            let file_cfg: FileSettings = toml::from_str(&raw)
                .with_context(|| format!("failed to parse settings file '{}'", path.display()))?;
            apply_file(&mut settings, file_cfg);
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read settings file '{}'", path.display()))
        }
    }

    let lookup = |name: &str| {
        env(&format!("APP__{name}")).or_else(|| env(&format!("RSVP_{name}")))
    };

    if let Some(v) = lookup("HOST_EMAIL") {
        settings.host_email = v;
    }
    if let Some(v) = lookup("FROM_ADDRESS") {
        settings.from_address = v;
    }
    if let Some(v) = lookup("NOTIFY_ENDPOINT") {
        settings.notify_endpoint = v;
    }
    if let Some(v) = lookup("NOTIFY_API_KEY") {
        settings.notify_api_key = Some(v);
    }
    if let Some(v) = lookup("AUTO_CLOSE_MS") {
        match v.parse::<u64>() {
            Ok(ms) => settings.auto_close = Duration::from_millis(ms),
            Err(_) => warn!(value = %v, "ignoring unparseable AUTO_CLOSE_MS"),
        }
    }
    if let Some(v) = lookup("HONOREE") {
        settings.party.honoree = v;
    }

    settings.notify_api_key = settings
        .notify_api_key
        .filter(|key| !key.trim().is_empty());

    Ok(settings)
}

fn apply_file(settings: &mut Settings, file_cfg: FileSettings) {
    if let Some(v) = file_cfg.host_email {
        settings.host_email = v;
    }
    if let Some(v) = file_cfg.from_address {
        settings.from_address = v;
    }
    if let Some(v) = file_cfg.notify_endpoint {
        settings.notify_endpoint = v;
    }
    if let Some(v) = file_cfg.notify_api_key {
        settings.notify_api_key = Some(v);
    }
    if let Some(ms) = file_cfg.auto_close_ms {
        settings.auto_close = Duration::from_millis(ms);
    }
    if let Some(party) = file_cfg.party {
        settings.party = party;
    }
}

impl Settings {
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            host_email: self.host_email.clone(),
            party: self.party.clone(),
            auto_close_delay: self.auto_close,
        }
    }

    pub fn notifier(&self, dry_run: bool) -> Result<Arc<dyn Notifier>> {
        let api_key = match (&self.notify_api_key, dry_run) {
            (Some(key), false) => key.clone(),
            (None, false) => {
                warn!("no notification api key configured; running as a dry run");
                return Ok(Arc::new(LogNotifier));
            }
            (_, true) => return Ok(Arc::new(LogNotifier)),
        };

        let endpoint = Url::parse(&self.notify_endpoint).with_context(|| {
            format!("invalid notification endpoint '{}'", self.notify_endpoint)
        })?;

        Ok(Arc::new(HttpNotifier::new(HttpNotifierConfig {
            endpoint,
            api_key,
            from: self.from_address.clone(),
        })))
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
