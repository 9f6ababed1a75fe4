//! Cart Sources
//!
//! Where a session's lines come from. The storefront has no backend yet, so the
//! default source is a fixed menu; fixture files allow other carts to be tried.

use std::path::PathBuf;

use async_trait::async_trait;
use rusty_money::{Money, iso::BRL};
use thiserror::Error;

#[cfg(test)]
use mockall::automock;

use crate::{
    fixtures::{CartFixture, FixtureError},
    items::{LineItem, Quantity},
    pricing::PricingError,
    products::Product,
    tags::string::StringTagCollection,
};

/// Errors raised while fetching cart lines.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The fixture could not be read or parsed.
    #[error(transparent)]
    Fixture(#[from] FixtureError),

    /// A line could not be priced.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// A quantity of zero was requested.
    #[error("item {0} has a quantity of zero")]
    ZeroQuantity(String),
}

/// Provides the lines a cart is populated with.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CartSource: Send + Sync {
    /// Fetch the cart lines, in display order.
    async fn fetch(&self) -> Result<Vec<LineItem<'static>>, SourceError>;
}

#[async_trait]
impl<S: CartSource + ?Sized> CartSource for Box<S> {
    async fn fetch(&self) -> Result<Vec<LineItem<'static>>, SourceError> {
        (**self).fetch().await
    }
}

/// The storefront's built-in cart: three espresso drinks.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedSource;

#[async_trait]
impl CartSource for SimulatedSource {
    async fn fetch(&self) -> Result<Vec<LineItem<'static>>, SourceError> {
        Ok(vec![
            coffee(
                "0",
                "Expresso Tradicional",
                "O tradicional café feito com água quente e grãos moídos",
                &["tradicional", "gelado"],
                690,
                "/images/coffees/expresso.png",
                1,
            )?,
            coffee(
                "1",
                "Expresso Americano",
                "Expresso diluído, menos intenso que o tradicional",
                &["tradicional", "com leite"],
                995,
                "/images/coffees/americano.png",
                2,
            )?,
            coffee(
                "2",
                "Expresso Cremoso",
                "Café expresso tradicional com espuma cremosa",
                &["especial"],
                1650,
                "/images/coffees/expresso-cremoso.png",
                3,
            )?,
        ])
    }
}

fn coffee(
    id: &str,
    title: &str,
    description: &str,
    tags: &[&str],
    price_minor: i64,
    image: &str,
    quantity: u32,
) -> Result<LineItem<'static>, SourceError> {
    let product = Product {
        title: title.to_string(),
        description: description.to_string(),
        tags: StringTagCollection::from_strs(tags),
        price: Money::from_minor(price_minor, BRL),
        image: image.to_string(),
    };

    let quantity =
        Quantity::new(quantity).ok_or_else(|| SourceError::ZeroQuantity(id.to_string()))?;

    Ok(LineItem::new(id, product, quantity)?)
}

/// Reads the cart from a YAML fixture file on every fetch.
#[derive(Debug, Clone)]
pub struct FixtureSource {
    path: PathBuf,
}

impl FixtureSource {
    /// Create a source backed by the fixture at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CartSource for FixtureSource {
    async fn fetch(&self) -> Result<Vec<LineItem<'static>>, SourceError> {
        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(FixtureError::from)?;

        Ok(CartFixture::from_yaml(&contents)?.into_items())
    }
}
