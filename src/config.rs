//! Configuration
//!
//! Command line and environment settings for the `coffee-cart` binary.

use std::{path::PathBuf, time::Duration};

use clap::{Args, Parser};
use rust_decimal::Decimal;

use crate::{
    loader::{CartSource, FixtureSource, SimulatedSource},
    pricing::{PricingError, currency_from_code, money_from_decimal},
    session::SessionOptions,
};

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Cart pricing and loading settings.
#[derive(Debug, Args)]
pub struct CartConfig {
    /// Load the cart from a YAML fixture instead of the built-in menu
    #[arg(short, long, env = "CART_FIXTURE")]
    pub fixture: Option<PathBuf>,

    /// Currency the cart is priced in (BRL, GBP, USD, EUR)
    #[arg(long, env = "CART_CURRENCY", default_value = "BRL")]
    pub currency: String,

    /// Delivery fee charged per distinct tag
    #[arg(long, env = "DELIVERY_FEE", default_value = "3.75")]
    pub delivery_fee: Decimal,

    /// Simulated load delay in milliseconds
    #[arg(long, env = "LOAD_DELAY_MS", default_value_t = 1_500_u64)]
    pub load_delay_ms: u64,
}

impl CartConfig {
    /// Session options described by this configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] for an unknown currency or a negative fee.
    pub fn session_options(&self) -> Result<SessionOptions, PricingError> {
        let currency = currency_from_code(&self.currency)?;

        Ok(SessionOptions {
            delivery_rate: money_from_decimal(self.delivery_fee, currency)?,
            load_delay: Duration::from_millis(self.load_delay_ms),
        })
    }

    /// The source the cart is loaded from.
    pub fn source(&self) -> Box<dyn CartSource> {
        match &self.fixture {
            Some(path) => Box::new(FixtureSource::new(path.clone())),
            None => Box::new(SimulatedSource),
        }
    }
}

/// Changes applied to the cart once it has loaded.
#[derive(Debug, Default, Args)]
pub struct ActionsConfig {
    /// Add one unit to the line with this id (repeatable)
    #[arg(long = "increment", value_name = "ID")]
    pub increments: Vec<String>,

    /// Take one unit away from the line with this id (repeatable)
    #[arg(long = "decrement", value_name = "ID")]
    pub decrements: Vec<String>,

    /// Remove the line with this id (repeatable)
    #[arg(long = "remove", value_name = "ID")]
    pub removals: Vec<String>,
}

/// Coffee cart configuration
#[derive(Debug, Parser)]
#[command(name = "coffee-cart", about = "Coffee delivery cart", long_about = None)]
pub struct Config {
    /// Cart settings.
    #[command(flatten)]
    pub cart: CartConfig,

    /// Scripted cart changes.
    #[command(flatten)]
    pub actions: ActionsConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,
}

impl Config {
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
}

#[cfg(test)]
mod tests {
    use rusty_money::{
        Money,
        iso::{BRL, GBP},
    };
    use testresult::TestResult;

    use super::*;

    #[test]
    fn defaults_describe_the_storefront() -> TestResult {
        let config = Config::try_parse_from(["coffee-cart"])?;
        let options = config.cart.session_options()?;

        assert_eq!(options.delivery_rate, Money::from_minor(375, BRL));
        assert_eq!(options.load_delay, Duration::from_millis(1500));
        assert!(config.cart.fixture.is_none());
        assert_eq!(config.logging.log_format, LogFormat::Compact);

        Ok(())
    }

    #[test]
    fn flags_override_defaults() -> TestResult {
        let config = Config::try_parse_from([
            "coffee-cart",
            "--currency",
            "gbp",
            "--delivery-fee",
            "2.50",
            "--load-delay-ms",
            "0",
            "--increment",
            "1",
            "--increment",
            "2",
            "--remove",
            "0",
            "--log-format",
            "json",
        ])?;

        let options = config.cart.session_options()?;

        assert_eq!(options.delivery_rate, Money::from_minor(250, GBP));
        assert_eq!(options.load_delay, Duration::ZERO);
        assert_eq!(config.actions.increments, ["1", "2"]);
        assert_eq!(config.actions.removals, ["0"]);
        assert_eq!(config.logging.log_format, LogFormat::Json);

        Ok(())
    }

    #[test]
    fn unknown_currency_is_rejected() -> TestResult {
        let config = Config::try_parse_from(["coffee-cart", "--currency", "XYZ"])?;

        assert!(matches!(
            config.cart.session_options(),
            Err(PricingError::UnknownCurrency(_))
        ));

        Ok(())
    }

    #[test]
    fn invalid_fee_fails_to_parse() {
        let result = Config::try_parse_from(["coffee-cart", "--delivery-fee", "cheap"]);

        assert!(result.is_err());
    }
}
