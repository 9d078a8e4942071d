//! Orders service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::domain::{
    addresses::records::AddressUuid,
    coupons::CouponError,
    inventory::InventoryError,
    orders::status::TransitionError,
    payment_methods::records::PaymentMethodUuid,
    pricing::PricingError,
    products::records::ProductUuid,
};

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("order must contain at least one item")]
    EmptyOrder,

    #[error("{0}")]
    Validation(String),

    #[error("product {0} not found")]
    ProductNotFound(ProductUuid),

    #[error("insufficient stock for product {product}: requested {requested}, available {available}")]
    InsufficientStock {
        product: ProductUuid,
        available: u32,
        requested: u32,
    },

    #[error("address {0} not found")]
    AddressNotFound(AddressUuid),

    #[error("payment method {0} not found")]
    PaymentMethodNotFound(PaymentMethodUuid),

    #[error("coupon {0} not found")]
    CouponNotFound(String),

    #[error("coupon {0} is not active")]
    CouponInactive(String),

    #[error("{0}")]
    CouponExhausted(CouponError),

    #[error("coupon {code} requires a subtotal of at least {minimum}, got {subtotal}")]
    CouponMinimumNotMet {
        code: String,
        minimum: u64,
        subtotal: u64,
    },

    #[error("not allowed to act on this order")]
    Forbidden,

    #[error(transparent)]
    InvalidState(#[from] TransitionError),

    #[error("could not allocate a unique order number")]
    Conflict,

    #[error("order not found")]
    NotFound,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("pricing error")]
    Pricing(#[from] PricingError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for OrdersServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::Conflict,
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            _ => Self::Sql(error),
        }
    }
}

impl From<InventoryError> for OrdersServiceError {
    fn from(error: InventoryError) -> Self {
        match error {
            InventoryError::ProductNotFound(product) => Self::ProductNotFound(product),
            InventoryError::InsufficientStock {
                product,
                available,
                requested,
            } => Self::InsufficientStock {
                product,
                available,
                requested,
            },
            InventoryError::Sql(source) => Self::from(source),
        }
    }
}

impl From<CouponError> for OrdersServiceError {
    fn from(error: CouponError) -> Self {
        match error {
            CouponError::Inactive { code } => Self::CouponInactive(code),
            CouponError::Exhausted { .. } | CouponError::UserLimitReached { .. } => {
                Self::CouponExhausted(error)
            }
            CouponError::MinimumNotMet {
                code,
                minimum,
                subtotal,
            } => Self::CouponMinimumNotMet {
                code,
                minimum,
                subtotal,
            },
            CouponError::Calculation { .. } => Self::Pricing(PricingError::Overflow),
        }
    }
}
