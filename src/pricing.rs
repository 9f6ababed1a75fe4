//! Pricing
//!
//! Money arithmetic for carts. All amounts are handled in minor units and every
//! operation is checked, so an overflow surfaces as an error instead of wrapping.

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{
    Money, MoneyError,
    iso::{BRL, Currency, EUR, GBP, USD},
};
use thiserror::Error;

use crate::{items::Quantity, tags::collection::TagCollection};

/// Errors that can occur while pricing a cart.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// An amount did not fit in the minor unit range.
    #[error("amount overflowed while pricing the cart")]
    Overflow,

    /// A price or fee was negative.
    #[error("amount must not be negative, got {0}")]
    NegativeAmount(Decimal),

    /// Unknown or unsupported currency code.
    #[error("unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Resolve an ISO currency code to one of the currencies carts can be priced in.
///
/// # Errors
///
/// Returns [`PricingError::UnknownCurrency`] for any other code.
pub fn currency_from_code(code: &str) -> Result<&'static Currency, PricingError> {
    match code.trim().to_ascii_uppercase().as_str() {
        "BRL" => Ok(BRL),
        "GBP" => Ok(GBP),
        "USD" => Ok(USD),
        "EUR" => Ok(EUR),
        other => Err(PricingError::UnknownCurrency(other.to_string())),
    }
}

/// Convert a non-negative decimal amount (e.g. `6.90`) into money.
///
/// Amounts are rounded half away from zero to two decimal places, which covers
/// every supported currency.
///
/// # Errors
///
/// Returns [`PricingError::NegativeAmount`] for negative input and
/// [`PricingError::Overflow`] if the amount does not fit in minor units.
pub fn money_from_decimal(
    amount: Decimal,
    currency: &'static Currency,
) -> Result<Money<'static, Currency>, PricingError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(PricingError::NegativeAmount(amount));
    }

    let minor_units = amount
        .checked_mul(Decimal::new(100, 0))
        .and_then(|value| {
            value
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                .to_i64()
        })
        .ok_or(PricingError::Overflow)?;

    Ok(Money::from_minor(minor_units, currency))
}

/// Subtotal of a line: `quantity × price`.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the product does not fit in minor units.
pub fn line_subtotal<'a>(
    price: &Money<'a, Currency>,
    quantity: Quantity,
) -> Result<Money<'a, Currency>, PricingError> {
    let minor_units = price
        .to_minor_units()
        .checked_mul(i64::from(quantity.get()))
        .ok_or(PricingError::Overflow)?;

    Ok(Money::from_minor(minor_units, price.currency()))
}

/// Sum a sequence of amounts, starting from zero in `currency`.
///
/// # Errors
///
/// Returns [`PricingError::Money`] if any amount is in a different currency.
pub fn sum<'a, I>(amounts: I, currency: &'a Currency) -> Result<Money<'a, Currency>, PricingError>
where
    I: IntoIterator<Item = Money<'a, Currency>>,
{
    let total = amounts
        .into_iter()
        .try_fold(Money::from_minor(0, currency), |acc, amount| acc.add(amount))?;

    Ok(total)
}

/// Delivery fee: the flat `rate` charged once per distinct tag in the cart.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the fee does not fit in minor units.
pub fn delivery_fee<'a, T: TagCollection>(
    rate: &Money<'a, Currency>,
    distinct_tags: &T,
) -> Result<Money<'a, Currency>, PricingError> {
    let count = i64::try_from(distinct_tags.len()).map_err(|_err| PricingError::Overflow)?;

    let minor_units = rate
        .to_minor_units()
        .checked_mul(count)
        .ok_or(PricingError::Overflow)?;

    Ok(Money::from_minor(minor_units, rate.currency()))
}
