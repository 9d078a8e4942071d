//! Coupon Evaluator
//!
//! Pure checks and arithmetic; nothing here touches storage.

use jiff::Timestamp;
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};

use crate::domain::coupons::{
    CouponError,
    records::{CouponDiscount, CouponRecord},
};

/// The effect of an applicable coupon on an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EvaluatedCoupon {
    /// Amount taken off the subtotal, in minor units.
    pub discount: u64,

    /// Whether shipping is waived.
    pub free_shipping: bool,
}

/// Check that `coupon` may be applied to an order of `subtotal` by a user who has
/// already redeemed it `user_usage` times.
///
/// # Errors
///
/// Returns the first rule the coupon fails, checked in the order: active window, total
/// usage limit, per-user usage limit, minimum order amount.
pub fn validate(
    coupon: &CouponRecord,
    subtotal: u64,
    user_usage: u32,
    now: Timestamp,
) -> Result<(), CouponError> {
    if !coupon.active || now < coupon.starts_at || now > coupon.ends_at {
        return Err(CouponError::Inactive {
            code: coupon.code.clone(),
        });
    }

    if coupon.total_usage_limit > 0 && coupon.usage_count >= coupon.total_usage_limit {
        return Err(CouponError::Exhausted {
            code: coupon.code.clone(),
        });
    }

    if coupon.usage_limit_per_user > 0 && user_usage >= coupon.usage_limit_per_user {
        return Err(CouponError::UserLimitReached {
            code: coupon.code.clone(),
        });
    }

    if let Some(minimum) = coupon.minimum_order_amount
        && subtotal < minimum
    {
        return Err(CouponError::MinimumNotMet {
            code: coupon.code.clone(),
            minimum,
            subtotal,
        });
    }

    Ok(())
}

/// Compute the discount `coupon` grants on `subtotal`.
///
/// The result never exceeds the subtotal, nor the coupon's maximum discount when set.
///
/// # Errors
///
/// Returns [`CouponError::Calculation`] when the percentage arithmetic overflows.
pub fn compute_discount(
    coupon: &CouponRecord,
    subtotal: u64,
) -> Result<EvaluatedCoupon, CouponError> {
    let (discount, free_shipping) = match coupon.discount {
        CouponDiscount::Percentage(percentage) => {
            let discount = percent_of_minor(percentage, subtotal).ok_or_else(|| {
                CouponError::Calculation {
                    code: coupon.code.clone(),
                }
            })?;

            (discount, false)
        }
        CouponDiscount::Fixed(amount) => (amount, false),
        CouponDiscount::FreeShipping => (0, true),
    };

    let discount = coupon
        .maximum_discount_amount
        .map_or(discount, |cap| discount.min(cap))
        .min(subtotal);

    Ok(EvaluatedCoupon {
        discount,
        free_shipping,
    })
}

/// Validate and compute in one step.
///
/// # Errors
///
/// Returns an error when validation fails or the discount cannot be computed.
pub fn evaluate(
    coupon: &CouponRecord,
    subtotal: u64,
    user_usage: u32,
    now: Timestamp,
) -> Result<EvaluatedCoupon, CouponError> {
    validate(coupon, subtotal, user_usage, now)?;

    compute_discount(coupon, subtotal)
}

fn percent_of_minor(percentage: Decimal, minor: u64) -> Option<u64> {
    Decimal::from(minor)
        .checked_mul(percentage)?
        .checked_div(Decimal::ONE_HUNDRED)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u64()
}
