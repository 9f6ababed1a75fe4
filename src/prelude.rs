//! Coffee Cart prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{CartError, CartState, CartStore, CartTotals, CheckoutSummary, Mutation},
    fixtures::{CartFixture, FixtureError},
    items::{LineItem, LineItemId, Quantity},
    loader::{CartSource, FixtureSource, SimulatedSource, SourceError},
    pricing::PricingError,
    products::Product,
    receipt::{Receipt, ReceiptError},
    session::{CartSession, CartSnapshot, SessionError, SessionOptions},
    tags::{collection::TagCollection, string::StringTagCollection},
};
