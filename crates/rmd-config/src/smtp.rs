//! SMTP transport configuration.

use serde::{Deserialize, Serialize};

/// Default SMTP submission port.
const fn default_port() -> u16 {
    587
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SmtpConfig {
    /// SMTP relay host. Empty means "unconfigured": reminders are logged
    /// instead of sent.
    #[serde(default)]
    pub host: String,

    /// SMTP submission port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// SMTP username for authentication.
    #[serde(default)]
    pub username: String,

    /// SMTP password for authentication.
    #[serde(default)]
    pub password: String,

    /// From address on outgoing reminders. Falls back to `username` when
    /// empty.
    #[serde(default)]
    pub from: String,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: default_port(),
            username: String::new(),
            password: String::new(),
            from: String::new(),
        }
    }
}

impl SmtpConfig {
    /// Check whether the config has the minimum fields for real delivery.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.host.is_empty() && !self.username.is_empty()
    }

    /// The effective From address for outgoing mail.
    #[must_use]
    pub fn from_address(&self) -> &str {
        if self.from.is_empty() {
            &self.username
        } else {
            &self.from
        }
    }
}
