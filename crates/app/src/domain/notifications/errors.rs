//! Notification errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("notification request failed")]
    Http(#[from] reqwest::Error),

    #[error("notification endpoint rejected the message: {0}")]
    Rejected(String),

    #[error("notification timed out")]
    Timeout,
}
