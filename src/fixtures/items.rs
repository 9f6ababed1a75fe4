//! Line Item Fixtures

use serde::Deserialize;

/// A cart line referencing a product by its fixture key.
#[derive(Debug, Deserialize)]
pub struct ItemFixture {
    /// Line id, unique within the cart
    pub id: String,

    /// Key into the fixture's `products` map
    pub product: String,

    /// Number of units, defaults to one
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}
