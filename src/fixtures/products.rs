//! Product Fixtures

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use serde::Deserialize;

use crate::{
    fixtures::FixtureError,
    pricing::{currency_from_code, money_from_decimal},
    products::Product,
    tags::string::StringTagCollection,
};

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Product title
    pub title: String,

    /// Product description
    #[serde(default)]
    pub description: String,

    /// Product tags
    #[serde(default)]
    pub tags: Vec<String>,

    /// Product price (e.g., "6.90 BRL")
    pub price: String,

    /// Image reference
    #[serde(default)]
    pub image: String,
}

impl TryFrom<ProductFixture> for Product<'static> {
    type Error = FixtureError;

    fn try_from(fixture: ProductFixture) -> Result<Self, Self::Error> {
        let price = parse_price(&fixture.price)?;

        Ok(Product {
            title: fixture.title,
            description: fixture.description,
            tags: fixture.tags.into_iter().collect::<StringTagCollection>(),
            price,
            image: fixture.image,
        })
    }
}

/// Parse price string (e.g., "6.90 BRL") into money.
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount is not a non-negative decimal, or if the currency code
/// is not recognized.
pub fn parse_price(s: &str) -> Result<Money<'static, Currency>, FixtureError> {
    let mut parts = s.split_whitespace();

    let (Some(amount), Some(currency_code), None) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    let currency = currency_from_code(currency_code)?;

    Ok(money_from_decimal(amount, currency)?)
}
