use serde::{Deserialize, Serialize};

use crate::error::Audience;

/// The message shape accepted by the notification collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationPlan {
    pub guest: EmailMessage,
    pub host: EmailMessage,
}

impl NotificationPlan {
    pub fn iter(&self) -> impl Iterator<Item = (Audience, &EmailMessage)> {
        [(Audience::Guest, &self.guest), (Audience::Host, &self.host)].into_iter()
    }
}
