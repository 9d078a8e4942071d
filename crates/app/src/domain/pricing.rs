//! Order pricing.
//!
//! Everything is computed in minor units with checked arithmetic. Tax is rounded half
//! away from zero to the minor unit.

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use thiserror::Error;

use crate::domain::coupons::EvaluatedCoupon;

/// Default tax rate applied to the subtotal.
pub const DEFAULT_TAX_RATE: Decimal = Decimal::from_parts(10, 0, 0, false, 2);

/// Default flat shipping cost in minor units.
pub const DEFAULT_FLAT_SHIPPING_AMOUNT: u64 = 1000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    #[error("order amount overflowed")]
    Overflow,

    #[error("tax rate must not be negative")]
    NegativeTaxRate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingConfig {
    pub tax_rate: Decimal,
    pub flat_shipping_amount: u64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            tax_rate: DEFAULT_TAX_RATE,
            flat_shipping_amount: DEFAULT_FLAT_SHIPPING_AMOUNT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingLine {
    pub unit_price: u64,
    pub quantity: u32,
}

/// Priced order totals.
///
/// `total == subtotal + tax + shipping_cost - discount` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PriceBreakdown {
    pub subtotal: u64,
    pub tax: u64,
    pub shipping_cost: u64,
    pub discount: u64,
    pub total: u64,
}

/// Subtotal of a single line.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the product does not fit in a `u64`.
pub fn line_subtotal(line: PricingLine) -> Result<u64, PricingError> {
    line.unit_price
        .checked_mul(u64::from(line.quantity))
        .ok_or(PricingError::Overflow)
}

/// Sum of every line subtotal.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] on overflow.
pub fn subtotal(lines: &[PricingLine]) -> Result<u64, PricingError> {
    lines.iter().try_fold(0_u64, |acc, line| {
        acc.checked_add(line_subtotal(*line)?)
            .ok_or(PricingError::Overflow)
    })
}

/// Price an order.
///
/// # Errors
///
/// Returns an error when any amount overflows or the tax rate is negative.
pub fn price_order(
    lines: &[PricingLine],
    coupon: Option<EvaluatedCoupon>,
    config: &PricingConfig,
) -> Result<PriceBreakdown, PricingError> {
    let subtotal = subtotal(lines)?;
    let tax = tax_on(subtotal, config.tax_rate)?;

    let coupon = coupon.unwrap_or_default();

    let shipping_cost = if coupon.free_shipping {
        0
    } else {
        config.flat_shipping_amount
    };

    let gross = subtotal
        .checked_add(tax)
        .and_then(|amount| amount.checked_add(shipping_cost))
        .ok_or(PricingError::Overflow)?;

    let discount = coupon.discount.min(gross);

    Ok(PriceBreakdown {
        subtotal,
        tax,
        shipping_cost,
        discount,
        total: gross - discount,
    })
}

fn tax_on(subtotal: u64, rate: Decimal) -> Result<u64, PricingError> {
    if rate.is_sign_negative() {
        return Err(PricingError::NegativeTaxRate);
    }

    Decimal::from(subtotal)
        .checked_mul(rate)
        .ok_or(PricingError::Overflow)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u64()
        .ok_or(PricingError::Overflow)
}
