//! Server configuration module

use clap::Parser;

use crate::config::{
    db::DatabaseConfig, notifications::NotificationsConfig, observability::LoggingConfig,
    pricing::PricingSettings, server::ServerRuntimeConfig,
};

pub(crate) mod db;
pub(crate) mod notifications;
pub(crate) mod observability;
pub(crate) mod pricing;
pub(crate) mod server;

/// Souk JSON API Server configuration
#[derive(Debug, Parser)]
#[command(name = "souk-json", about = "Souk JSON API Server", long_about = None)]
pub struct ServerConfig {
    /// Server network settings.
    #[command(flatten)]
    pub server: ServerRuntimeConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Application database settings.
    #[command(flatten)]
    pub database: DatabaseConfig,

    /// Tax and shipping settings.
    #[command(flatten)]
    pub pricing: PricingSettings,

    /// Order notification settings.
    #[command(flatten)]
    pub notifications: NotificationsConfig,
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Get the socket address for binding
    #[must_use]
    pub fn socket_addr(&self) -> String {
        self.server.socket_addr()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn defaults_apply_when_only_database_url_is_given() -> TestResult {
        let config =
            ServerConfig::try_parse_from(["souk-json", "--database-url", "postgres://localhost"])?;

        assert_eq!(config.socket_addr(), "0.0.0.0:8698");
        assert_eq!(config.pricing.tax_rate, dec!(0.10));
        assert_eq!(config.pricing.flat_shipping_amount, 1000);
        assert_eq!(config.notifications.webhook_url, None);
        assert_eq!(config.logging.slow_request_threshold_ms, 1_000);

        Ok(())
    }

    #[test]
    fn pricing_flags_override_defaults() -> TestResult {
        let config = ServerConfig::try_parse_from([
            "souk-json",
            "--database-url",
            "postgres://localhost",
            "--tax-rate",
            "0.0825",
            "--flat-shipping-amount",
            "499",
        ])?;

        let pricing = config.pricing.to_pricing_config();

        assert_eq!(pricing.tax_rate, dec!(0.0825));
        assert_eq!(pricing.flat_shipping_amount, 499);

        Ok(())
    }
}
