//! Coupon errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

/// Reasons a coupon cannot be applied to an order.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CouponError {
    #[error("coupon {code} is not active")]
    Inactive { code: String },

    #[error("coupon {code} has reached its usage limit")]
    Exhausted { code: String },

    #[error("coupon {code} has reached its usage limit for this user")]
    UserLimitReached { code: String },

    #[error("coupon {code} requires a subtotal of at least {minimum}, got {subtotal}")]
    MinimumNotMet {
        code: String,
        minimum: u64,
        subtotal: u64,
    },

    #[error("coupon {code} discount could not be calculated")]
    Calculation { code: String },
}

#[derive(Debug, Error)]
pub enum CouponsServiceError {
    #[error("coupon already exists")]
    AlreadyExists,

    #[error("coupon not found")]
    NotFound,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("percentage must be between 0 and 100")]
    InvalidPercentage,

    #[error("coupon must start before it ends")]
    InvalidWindow,

    #[error("administrator access required")]
    Forbidden,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for CouponsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation | ErrorKind::ForeignKeyViolation) => Self::InvalidData,
            _ => Self::Sql(error),
        }
    }
}
