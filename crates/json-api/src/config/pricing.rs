//! Pricing Config

use clap::Args;
use rust_decimal::Decimal;

use souk_app::domain::pricing::{DEFAULT_FLAT_SHIPPING_AMOUNT, PricingConfig};

/// Tax and shipping settings applied to every new order.
#[derive(Debug, Args)]
pub struct PricingSettings {
    /// Tax rate applied to the order subtotal, e.g. `0.10` for 10%
    #[arg(long, env = "TAX_RATE", default_value = "0.10")]
    pub tax_rate: Decimal,

    /// Flat shipping cost in minor currency units
    #[arg(long, env = "FLAT_SHIPPING_AMOUNT", default_value_t = DEFAULT_FLAT_SHIPPING_AMOUNT)]
    pub flat_shipping_amount: u64,
}

impl PricingSettings {
    #[must_use]
    pub fn to_pricing_config(&self) -> PricingConfig {
        PricingConfig {
            tax_rate: self.tax_rate,
            flat_shipping_amount: self.flat_shipping_amount,
        }
    }
}
