//! Order and payment status transitions.

use std::{fmt, str::FromStr};

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    Refunded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
    Refunded,
}

#[derive(Debug, Error)]
#[error("unknown status: {0}")]
pub struct UnknownStatus(pub String);

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("order cannot move from {from} to {to}")]
    Status { from: OrderStatus, to: OrderStatus },

    #[error("payment cannot move from {from} to {to}")]
    Payment {
        from: PaymentStatus,
        to: PaymentStatus,
    },

    #[error("order can only be refunded once its payment is refunded")]
    RefundWithoutRefundedPayment,

    #[error("orders are cancelled through the cancel operation")]
    CancelThroughUpdate,

    #[error("order in status {0} cannot be cancelled")]
    NotCancellable(OrderStatus),
}

impl OrderStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
            Self::Refunded => "refunded",
        }
    }

    /// Position along the fulfilment path, `None` for cancelled and refunded.
    const fn fulfilment_rank(self) -> Option<u8> {
        match self {
            Self::Pending => Some(0),
            Self::Processing => Some(1),
            Self::Shipped => Some(2),
            Self::Delivered => Some(3),
            Self::Cancelled | Self::Refunded => None,
        }
    }

    #[must_use]
    pub const fn is_cancellable(self) -> bool {
        matches!(self, Self::Pending | Self::Processing)
    }
}

impl PaymentStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Failed => "failed",
            Self::Refunded => "refunded",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "shipped" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            "refunded" => Ok(Self::Refunded),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "failed" => Ok(Self::Failed),
            "refunded" => Ok(Self::Refunded),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// Check an administrative status change. `payment` is the payment status the order will
/// have once the update is applied.
///
/// # Errors
///
/// Returns a [`TransitionError`] describing the rejected move.
pub fn validate_status_transition(
    from: OrderStatus,
    to: OrderStatus,
    payment: PaymentStatus,
) -> Result<(), TransitionError> {
    if from == to {
        return Ok(());
    }

    if to == OrderStatus::Cancelled {
        return Err(TransitionError::CancelThroughUpdate);
    }

    let Some(from_rank) = from.fulfilment_rank() else {
        return Err(TransitionError::Status { from, to });
    };

    match to.fulfilment_rank() {
        Some(to_rank) if to_rank > from_rank => Ok(()),
        Some(_) => Err(TransitionError::Status { from, to }),
        None if payment == PaymentStatus::Refunded => Ok(()),
        None => Err(TransitionError::RefundWithoutRefundedPayment),
    }
}

/// Check a payment status change.
///
/// # Errors
///
/// Returns [`TransitionError::Payment`] for anything other than `pending → paid | failed`
/// and `paid → refunded`.
pub fn validate_payment_transition(
    from: PaymentStatus,
    to: PaymentStatus,
) -> Result<(), TransitionError> {
    use PaymentStatus::{Failed, Paid, Pending, Refunded};

    match (from, to) {
        (a, b) if a == b => Ok(()),
        (Pending, Paid | Failed) | (Paid, Refunded) => Ok(()),
        _ => Err(TransitionError::Payment { from, to }),
    }
}
