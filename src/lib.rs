//! Coffee Cart
//!
//! Cart state and pricing for the coffee delivery storefront: line items with
//! quantities, an items total, a delivery fee charged per distinct tag, and a
//! session that loads the cart in the background and publishes every change.

pub mod cart;
pub mod config;
pub mod fixtures;
pub mod items;
pub mod loader;
pub mod observability;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod receipt;
pub mod session;
pub mod tags;
