//! Notifier seam.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::domain::{
    notifications::{NotificationError, OrderSummary},
    orders::status::OrderStatus,
};

#[automock]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Email the customer a summary of the order they placed.
    async fn send_order_confirmation(
        &self,
        email: &str,
        summary: &OrderSummary,
    ) -> Result<(), NotificationError>;

    /// Text the customer the new status of one of their orders.
    async fn send_status_update(
        &self,
        phone: &str,
        order_number: &str,
        status: OrderStatus,
    ) -> Result<(), NotificationError>;
}

/// Writes notifications to the log instead of delivering them.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send_order_confirmation(
        &self,
        email: &str,
        summary: &OrderSummary,
    ) -> Result<(), NotificationError> {
        info!(
            email,
            order_number = %summary.order_number,
            total = summary.total,
            lines = summary.lines.len(),
            "order confirmation"
        );

        Ok(())
    }

    async fn send_status_update(
        &self,
        phone: &str,
        order_number: &str,
        status: OrderStatus,
    ) -> Result<(), NotificationError> {
        info!(phone, order_number, status = %status, "order status update");

        Ok(())
    }
}
