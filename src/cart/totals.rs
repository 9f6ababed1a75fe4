//! Cart Totals

use rusty_money::{Money, iso::Currency};

/// Totals derived from the current cart contents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CartTotals<'a> {
    items_total: Money<'a, Currency>,
    distinct_tags: usize,
    delivery_fee: Money<'a, Currency>,
    grand_total: Money<'a, Currency>,
}

impl<'a> CartTotals<'a> {
    /// Create totals from their parts.
    pub fn new(
        items_total: Money<'a, Currency>,
        distinct_tags: usize,
        delivery_fee: Money<'a, Currency>,
        grand_total: Money<'a, Currency>,
    ) -> Self {
        Self {
            items_total,
            distinct_tags,
            delivery_fee,
            grand_total,
        }
    }

    /// Sum of every line subtotal
    pub fn items_total(&self) -> Money<'a, Currency> {
        self.items_total
    }

    /// Number of unique tags across all lines
    pub fn distinct_tags(&self) -> usize {
        self.distinct_tags
    }

    /// Delivery rate multiplied by the distinct tag count
    pub fn delivery_fee(&self) -> Money<'a, Currency> {
        self.delivery_fee
    }

    /// Items total plus delivery fee
    pub fn grand_total(&self) -> Money<'a, Currency> {
        self.grand_total
    }
}
