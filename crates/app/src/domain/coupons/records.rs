//! Coupon Records

use jiff::Timestamp;
use rust_decimal::Decimal;

use crate::uuids::TypedUuid;

/// Coupon UUID
pub type CouponUuid = TypedUuid<CouponRecord>;

/// Coupon Record
#[derive(Debug, Clone)]
pub struct CouponRecord {
    pub uuid: CouponUuid,
    pub code: String,
    pub description: Option<String>,
    pub discount: CouponDiscount,
    pub minimum_order_amount: Option<u64>,
    pub maximum_discount_amount: Option<u64>,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
    pub active: bool,

    /// Redemptions allowed per user, `0` for unlimited.
    pub usage_limit_per_user: u32,

    /// Redemptions allowed overall, `0` for unlimited.
    pub total_usage_limit: u32,

    pub usage_count: u32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// How a coupon reduces the price of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CouponDiscount {
    /// Percentage of the subtotal, `0..=100`.
    Percentage(Decimal),

    /// Fixed amount in minor units.
    Fixed(u64),

    /// Waives the shipping cost.
    FreeShipping,
}

impl CouponDiscount {
    #[must_use]
    pub const fn type_as_str(&self) -> &'static str {
        match self {
            Self::Percentage(_) => "percentage",
            Self::Fixed(_) => "fixed",
            Self::FreeShipping => "free_shipping",
        }
    }
}
