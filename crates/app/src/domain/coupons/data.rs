//! Coupons Data

use jiff::Timestamp;

use crate::domain::coupons::records::{CouponDiscount, CouponUuid};

/// New Coupon Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewCoupon {
    pub uuid: CouponUuid,
    pub code: String,
    pub description: Option<String>,
    pub discount: CouponDiscount,
    pub minimum_order_amount: Option<u64>,
    pub maximum_discount_amount: Option<u64>,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
    pub active: bool,
    pub usage_limit_per_user: u32,
    pub total_usage_limit: u32,
}
