//! Line Items

use std::{fmt, num::NonZeroU32};

use rusty_money::{Money, iso::Currency};

use crate::{
    pricing::{PricingError, line_subtotal},
    products::Product,
    tags::{collection::TagCollection, string::StringTagCollection},
};

/// Identifier of a line item, unique within a cart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineItemId(String);

impl LineItemId {
    /// Creates a new line item ID from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LineItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LineItemId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for LineItemId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for LineItemId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Number of units of a line item. Never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quantity(NonZeroU32);

impl Quantity {
    /// A single unit.
    pub const ONE: Self = Self(NonZeroU32::MIN);

    /// Creates a quantity, or `None` for zero.
    #[must_use]
    pub fn new(value: u32) -> Option<Self> {
        NonZeroU32::new(value).map(Self)
    }

    /// Returns the quantity as a plain integer.
    #[must_use]
    pub fn get(self) -> u32 {
        self.0.get()
    }

    /// One more unit, or `None` on overflow.
    #[must_use]
    pub fn incremented(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }

    /// One less unit, or `None` when already at a single unit.
    #[must_use]
    pub fn decremented(self) -> Option<Self> {
        Self::new(self.get() - 1)
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::ONE
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A product in the cart together with how many units were picked.
///
/// The subtotal is derived from the price and quantity when the line is built and
/// recomputed on every quantity change, so the two can never disagree.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem<'a, T: TagCollection = StringTagCollection> {
    id: LineItemId,
    product: Product<'a, T>,
    quantity: Quantity,
    subtotal: Money<'a, Currency>,
}

impl<'a, T: TagCollection> LineItem<'a, T> {
    /// Creates a new line item.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] if the subtotal does not fit in minor units.
    pub fn new(
        id: impl Into<LineItemId>,
        product: Product<'a, T>,
        quantity: Quantity,
    ) -> Result<Self, PricingError> {
        let subtotal = line_subtotal(&product.price, quantity)?;

        Ok(Self {
            id: id.into(),
            product,
            quantity,
            subtotal,
        })
    }

    /// Returns the line item's identifier
    pub fn id(&self) -> &LineItemId {
        &self.id
    }

    /// Returns the product on this line
    pub fn product(&self) -> &Product<'a, T> {
        &self.product
    }

    /// Returns the product title
    pub fn title(&self) -> &str {
        &self.product.title
    }

    /// Returns the product description
    pub fn description(&self) -> &str {
        &self.product.description
    }

    /// Returns the product tags
    pub fn tags(&self) -> &T {
        &self.product.tags
    }

    /// Returns the unit price
    pub fn price(&self) -> &Money<'a, Currency> {
        &self.product.price
    }

    /// Returns the product image reference
    pub fn image(&self) -> &str {
        &self.product.image
    }

    /// Returns the number of units
    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    /// Returns `quantity × price`
    pub fn subtotal(&self) -> &Money<'a, Currency> {
        &self.subtotal
    }

    /// Changes the quantity and recomputes the subtotal.
    ///
    /// The line is left untouched if the new subtotal cannot be computed.
    pub(crate) fn set_quantity(&mut self, quantity: Quantity) -> Result<(), PricingError> {
        let subtotal = line_subtotal(&self.product.price, quantity)?;

        self.quantity = quantity;
        self.subtotal = subtotal;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::BRL;
    use testresult::TestResult;

    use super::*;

    fn americano<'a>() -> Product<'a> {
        Product {
            title: "Expresso Americano".to_string(),
            description: "Expresso diluído, menos intenso que o tradicional".to_string(),
            tags: StringTagCollection::from_strs(&["tradicional", "com leite"]),
            price: Money::from_minor(995, BRL),
            image: "/images/coffees/americano.png".to_string(),
        }
    }

    #[test]
    fn quantity_rejects_zero() {
        assert_eq!(Quantity::new(0), None);
        assert_eq!(Quantity::new(1), Some(Quantity::ONE));
    }

    #[test]
    fn quantity_decrement_stops_at_one() -> TestResult {
        let two = Quantity::new(2).ok_or("two is non-zero")?;

        assert_eq!(two.decremented(), Some(Quantity::ONE));
        assert_eq!(Quantity::ONE.decremented(), None);

        Ok(())
    }

    #[test]
    fn quantity_increment_overflows_to_none() -> TestResult {
        let max = Quantity::new(u32::MAX).ok_or("max is non-zero")?;

        assert_eq!(max.incremented(), None);
        assert_eq!(Quantity::ONE.incremented().map(Quantity::get), Some(2));

        Ok(())
    }

    #[test]
    fn new_line_item_derives_subtotal() -> TestResult {
        let quantity = Quantity::new(2).ok_or("two is non-zero")?;
        let item = LineItem::new("1", americano(), quantity)?;

        assert_eq!(item.id().as_str(), "1");
        assert_eq!(item.subtotal(), &Money::from_minor(1990, BRL));
        assert_eq!(item.title(), "Expresso Americano");
        assert!(item.tags().contains("com leite"));

        Ok(())
    }

    #[test]
    fn set_quantity_recomputes_subtotal() -> TestResult {
        let mut item = LineItem::new("1", americano(), Quantity::ONE)?;
        let three = Quantity::new(3).ok_or("three is non-zero")?;

        item.set_quantity(three)?;

        assert_eq!(item.quantity(), three);
        assert_eq!(item.subtotal(), &Money::from_minor(2985, BRL));

        Ok(())
    }

    #[test]
    fn set_quantity_overflow_leaves_line_untouched() -> TestResult {
        let mut product = americano();
        product.price = Money::from_minor(i64::MAX, BRL);

        let mut item = LineItem::new("1", product, Quantity::ONE)?;
        let two = Quantity::new(2).ok_or("two is non-zero")?;

        assert_eq!(item.set_quantity(two), Err(PricingError::Overflow));
        assert_eq!(item.quantity(), Quantity::ONE);

        Ok(())
    }
}
