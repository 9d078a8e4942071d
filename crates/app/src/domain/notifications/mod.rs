//! Notifications
//!
//! Order confirmations and status updates. Delivery is best-effort: the
//! [`NotificationDispatcher`] runs every send off the request path and only logs failures.

mod dispatcher;
mod errors;
mod models;
mod notifier;
mod webhook;

pub use dispatcher::{DEFAULT_NOTIFICATION_TIMEOUT, NotificationDispatcher};
pub use errors::NotificationError;
pub use models::{OrderSummary, OrderSummaryLine};
pub use notifier::{LogNotifier, MockNotifier, Notifier};
pub use webhook::{WebhookConfig, WebhookNotifier};
