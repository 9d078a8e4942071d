//! Coupon Models

use rust_decimal::Decimal;
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use souk_app::domain::coupons::records::{CouponDiscount, CouponRecord};

/// How a coupon reduces the price of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub(crate) enum DiscountType {
    /// `percentage` of the subtotal
    Percentage,

    /// Fixed `amount` in minor currency units
    Fixed,

    /// Waives the shipping cost
    FreeShipping,
}

impl From<CouponDiscount> for DiscountType {
    fn from(discount: CouponDiscount) -> Self {
        match discount {
            CouponDiscount::Percentage(_) => Self::Percentage,
            CouponDiscount::Fixed(_) => Self::Fixed,
            CouponDiscount::FreeShipping => Self::FreeShipping,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CouponResponse {
    pub uuid: Uuid,
    pub code: String,
    pub description: Option<String>,
    pub discount_type: DiscountType,

    /// Set for percentage coupons
    #[salvo(schema(value_type = Option<String>))]
    pub percentage: Option<Decimal>,

    /// Set for fixed coupons, in minor currency units
    pub amount: Option<u64>,

    pub minimum_order_amount: Option<u64>,
    pub maximum_discount_amount: Option<u64>,
    pub starts_at: String,
    pub ends_at: String,
    pub active: bool,

    /// `0` for unlimited
    pub usage_limit_per_user: u32,

    /// `0` for unlimited
    pub total_usage_limit: u32,

    pub usage_count: u32,
    pub created_at: String,
    pub updated_at: String,
}

impl From<CouponRecord> for CouponResponse {
    fn from(coupon: CouponRecord) -> Self {
        let (percentage, amount) = match coupon.discount {
            CouponDiscount::Percentage(percentage) => (Some(percentage), None),
            CouponDiscount::Fixed(amount) => (None, Some(amount)),
            CouponDiscount::FreeShipping => (None, None),
        };

        CouponResponse {
            uuid: coupon.uuid.into_uuid(),
            code: coupon.code,
            description: coupon.description,
            discount_type: coupon.discount.into(),
            percentage,
            amount,
            minimum_order_amount: coupon.minimum_order_amount,
            maximum_discount_amount: coupon.maximum_discount_amount,
            starts_at: coupon.starts_at.to_string(),
            ends_at: coupon.ends_at.to_string(),
            active: coupon.active,
            usage_limit_per_user: coupon.usage_limit_per_user,
            total_usage_limit: coupon.total_usage_limit,
            usage_count: coupon.usage_count,
            created_at: coupon.created_at.to_string(),
            updated_at: coupon.updated_at.to_string(),
        }
    }
}
