//! Webhook notifier.
//!
//! Hands every notification to an HTTP endpoint that fronts the actual email/SMS providers.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::domain::{
    notifications::{NotificationError, Notifier, OrderSummary},
    orders::status::OrderStatus,
};

/// Configuration for the notification webhook.
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    /// Endpoint receiving `POST`ed JSON messages, e.g. `"http://notifier:8080/messages"`.
    pub url: String,
}

/// HTTP client posting notifications to a webhook.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    config: WebhookConfig,
    http: Client,
}

#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum WebhookMessage<'a> {
    OrderConfirmation {
        email: &'a str,
        order: &'a OrderSummary,
    },
    StatusUpdate {
        phone: &'a str,
        order_number: &'a str,
        status: &'static str,
    },
}

impl WebhookNotifier {
    #[must_use]
    pub fn new(config: WebhookConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    async fn post(&self, message: &WebhookMessage<'_>) -> Result<(), NotificationError> {
        let response = self.http.post(&self.config.url).json(message).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(NotificationError::Rejected(format!(
                "webhook responded with status {status}: {text}"
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn send_order_confirmation(
        &self,
        email: &str,
        summary: &OrderSummary,
    ) -> Result<(), NotificationError> {
        self.post(&WebhookMessage::OrderConfirmation {
            email,
            order: summary,
        })
        .await
    }

    async fn send_status_update(
        &self,
        phone: &str,
        order_number: &str,
        status: OrderStatus,
    ) -> Result<(), NotificationError> {
        self.post(&WebhookMessage::StatusUpdate {
            phone,
            order_number,
            status: status.as_str(),
        })
        .await
    }
}
