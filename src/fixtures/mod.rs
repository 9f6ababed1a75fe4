//! Fixtures
//!
//! YAML cart definitions: a `products` table keyed by name and an ordered list of
//! `items` that reference those products with a line id and a quantity.

use std::{fs, path::Path};

use rustc_hash::FxHashMap;
use serde::Deserialize;
use thiserror::Error;

use crate::{
    fixtures::{items::ItemFixture, products::ProductFixture},
    items::{LineItem, Quantity},
    pricing::PricingError,
    products::Product,
};

pub mod items;
pub mod products;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Product not found
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// A line asked for zero units
    #[error("Item {0} has a quantity of zero")]
    ZeroQuantity(String),

    /// Wrapped pricing error
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// Wrapper for a cart in YAML
#[derive(Debug, Deserialize)]
struct CartFile {
    products: FxHashMap<String, ProductFixture>,

    #[serde(default)]
    items: Vec<ItemFixture>,
}

/// A cart loaded from a fixture file.
#[derive(Debug, Clone)]
pub struct CartFixture {
    products: FxHashMap<String, Product<'static>>,
    items: Vec<LineItem<'static>>,
}

impl CartFixture {
    /// Load a cart fixture from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, if a price is malformed,
    /// or if a line references an unknown product or asks for zero units.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml(&contents)
    }

    /// Parse a cart fixture from YAML text.
    ///
    /// # Errors
    ///
    /// See [`CartFixture::from_path`].
    pub fn from_yaml(contents: &str) -> Result<Self, FixtureError> {
        let file: CartFile = serde_norway::from_str(contents)?;

        let products = file
            .products
            .into_iter()
            .map(|(key, fixture)| -> Result<_, FixtureError> {
                let product: Product<'static> = fixture.try_into()?;

                Ok((key, product))
            })
            .collect::<Result<FxHashMap<_, _>, FixtureError>>()?;

        let items = file
            .items
            .into_iter()
            .map(|item| -> Result<_, FixtureError> {
                let product = products
                    .get(&item.product)
                    .ok_or_else(|| FixtureError::ProductNotFound(item.product.clone()))?;

                let quantity = Quantity::new(item.quantity)
                    .ok_or_else(|| FixtureError::ZeroQuantity(item.id.clone()))?;

                Ok(LineItem::new(item.id, product.clone(), quantity)?)
            })
            .collect::<Result<Vec<_>, FixtureError>>()?;

        Ok(Self { products, items })
    }

    /// Look up a product by its fixture key.
    pub fn product(&self, key: &str) -> Option<&Product<'static>> {
        self.products.get(key)
    }

    /// Lines in file order
    pub fn items(&self) -> &[LineItem<'static>] {
        &self.items
    }

    /// Take the lines out of the fixture.
    pub fn into_items(self) -> Vec<LineItem<'static>> {
        self.items
    }
}
