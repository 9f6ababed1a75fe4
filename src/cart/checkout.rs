//! Checkout Summary

use crate::{
    cart::totals::CartTotals,
    items::{LineItemId, Quantity},
};

/// What the order form submits when the customer confirms the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutSummary<'a> {
    /// Ordered line ids with their quantities
    pub lines: Vec<(LineItemId, Quantity)>,

    /// Totals at the time of confirmation
    pub totals: CartTotals<'a>,
}
