//! Coupons

pub mod data;
pub mod errors;
pub mod evaluator;
pub mod records;
mod repository;
pub mod service;

pub use errors::{CouponError, CouponsServiceError};
pub use evaluator::EvaluatedCoupon;
pub(crate) use repository::PgCouponsRepository;
pub use service::*;
