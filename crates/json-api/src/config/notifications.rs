//! Notifications Config

use std::time::Duration;

use clap::Args;

/// Order notification settings.
#[derive(Debug, Args)]
pub struct NotificationsConfig {
    /// Webhook receiving order confirmations and status updates. Notifications are only
    /// logged when unset.
    #[arg(long, env = "NOTIFICATIONS_WEBHOOK_URL")]
    pub webhook_url: Option<String>,

    /// Upper bound on a single notification delivery.
    #[arg(long, env = "NOTIFICATIONS_TIMEOUT_MS", default_value_t = 5_000_u64)]
    pub timeout_ms: u64,
}

impl NotificationsConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
