//! Best-effort notification dispatch.

use std::{sync::Arc, time::Duration};

use tokio::{task::JoinHandle, time::timeout};
use tracing::{Instrument as _, warn};

use crate::domain::{
    notifications::{LogNotifier, NotificationError, Notifier, OrderSummary},
    orders::status::OrderStatus,
};

/// Default upper bound on a single notification.
pub const DEFAULT_NOTIFICATION_TIMEOUT: Duration = Duration::from_secs(5);

/// Spawns notifications onto the runtime so callers never wait on, or fail because of, them.
#[derive(Clone)]
pub struct NotificationDispatcher {
    notifier: Arc<dyn Notifier>,
    timeout: Duration,
}

impl std::fmt::Debug for NotificationDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationDispatcher")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl Default for NotificationDispatcher {
    fn default() -> Self {
        Self::new(Arc::new(LogNotifier), DEFAULT_NOTIFICATION_TIMEOUT)
    }
}

impl NotificationDispatcher {
    #[must_use]
    pub fn new(notifier: Arc<dyn Notifier>, timeout: Duration) -> Self {
        Self { notifier, timeout }
    }

    /// Confirm a new order by email, and by SMS when the customer has a phone number.
    pub fn order_placed(
        &self,
        email: String,
        phone: Option<String>,
        summary: OrderSummary,
    ) -> JoinHandle<()> {
        let notifier = Arc::clone(&self.notifier);
        let limit = self.timeout;
        let span = tracing::info_span!("notifications.order_placed", order_number = %summary.order_number);

        tokio::spawn(
            async move {
                log_failure(
                    "order confirmation",
                    bounded(limit, notifier.send_order_confirmation(&email, &summary)).await,
                );

                if let Some(phone) = phone {
                    log_failure(
                        "order status sms",
                        bounded(
                            limit,
                            notifier.send_status_update(
                                &phone,
                                &summary.order_number,
                                OrderStatus::Pending,
                            ),
                        )
                        .await,
                    );
                }
            }
            .instrument(span),
        )
    }

    /// Tell the customer their order moved to `status`.
    pub fn status_changed(
        &self,
        phone: Option<String>,
        order_number: String,
        status: OrderStatus,
    ) -> JoinHandle<()> {
        let notifier = Arc::clone(&self.notifier);
        let limit = self.timeout;
        let span = tracing::info_span!(
            "notifications.status_changed",
            order_number = %order_number,
            status = %status
        );

        tokio::spawn(
            async move {
                let Some(phone) = phone else {
                    return;
                };

                log_failure(
                    "order status sms",
                    bounded(limit, notifier.send_status_update(&phone, &order_number, status))
                        .await,
                );
            }
            .instrument(span),
        )
    }
}

async fn bounded<F>(limit: Duration, send: F) -> Result<(), NotificationError>
where
    F: Future<Output = Result<(), NotificationError>>,
{
    timeout(limit, send)
        .await
        .unwrap_or(Err(NotificationError::Timeout))
}

fn log_failure(kind: &str, result: Result<(), NotificationError>) {
    if let Err(error) = result {
        warn!(kind, "failed to send notification: {error}");
    }
}
