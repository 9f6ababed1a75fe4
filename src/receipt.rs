//! Receipt
//!
//! Terminal rendering of a cart: one row per line followed by the items total,
//! the delivery fee and the grand total.

use std::io;

use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};
use thiserror::Error;

use crate::{
    cart::{CartStore, CartTotals},
    items::LineItem,
    pricing::PricingError,
    session::CartSnapshot,
    tags::string::StringTagCollection,
};

/// Errors that can occur when rendering a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Totals could not be computed.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Writing to the output failed.
    #[error("failed to write receipt: {0}")]
    Io(#[from] io::Error),
}

/// A printable view of a cart.
#[derive(Debug, Clone, Copy)]
pub struct Receipt<'s, 'a> {
    items: &'s [LineItem<'a, StringTagCollection>],
    loading: bool,
    totals: CartTotals<'a>,
}

impl<'s, 'a> Receipt<'s, 'a> {
    /// Build a receipt from a store, computing its totals.
    ///
    /// # Errors
    ///
    /// Returns a [`ReceiptError::Pricing`] if the totals cannot be computed.
    pub fn from_store(store: &'s CartStore<'a>) -> Result<Self, ReceiptError> {
        Ok(Self {
            items: store.items(),
            loading: store.is_loading(),
            totals: store.totals()?,
        })
    }

    /// Totals shown at the bottom of the receipt
    pub fn totals(&self) -> CartTotals<'a> {
        self.totals
    }

    /// Writes the receipt to `out`.
    ///
    /// # Errors
    ///
    /// Returns an error if the receipt cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        if self.loading {
            writeln!(out, "Loading cart...")?;
            return Ok(());
        }

        if self.items.is_empty() {
            writeln!(out, "Your cart is empty.")?;
        } else {
            writeln!(out, "\n{}", self.table())?;
        }

        write_summary(&mut out, &self.totals)?;

        Ok(())
    }

    fn table(&self) -> String {
        let mut builder = Builder::default();

        builder.push_record(["", "Coffee", "Tags", "Qty", "Unit Price", "Subtotal"]);

        for (idx, item) in self.items.iter().enumerate() {
            builder.push_record([
                format!("#{:<3}", idx + 1),
                item.title().to_string(),
                item.tags().iter().collect::<Vec<_>>().join(", "),
                item.quantity().to_string(),
                item.price().to_string(),
                item.subtotal().to_string(),
            ]);
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Columns::new(3..6), Alignment::right());

        table.to_string()
    }
}

impl<'s> From<&'s CartSnapshot> for Receipt<'s, 'static> {
    fn from(snapshot: &'s CartSnapshot) -> Self {
        Self {
            items: &snapshot.items,
            loading: snapshot.loading,
            totals: snapshot.totals,
        }
    }
}

fn write_summary(out: &mut impl io::Write, totals: &CartTotals<'_>) -> Result<(), ReceiptError> {
    let delivery_label = format!("Delivery ({} tags):", totals.distinct_tags());

    let rows = [
        ("Items:".to_string(), totals.items_total().to_string()),
        (delivery_label, totals.delivery_fee().to_string()),
        ("Total:".to_string(), totals.grand_total().to_string()),
    ];

    let label_width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    let value_width = rows.iter().map(|(_, value)| value.len()).max().unwrap_or(0);

    for (label, value) in rows {
        writeln!(out, " {label:<label_width$} {value:>value_width$}")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::BRL};
    use testresult::TestResult;

    use crate::{items::Quantity, products::Product};

    use super::*;

    fn render(store: &CartStore<'_>) -> TestResult<String> {
        let mut out = Vec::new();

        Receipt::from_store(store)?.write_to(&mut out)?;

        Ok(String::from_utf8(out)?)
    }

    fn store_with_americano<'a>() -> TestResult<CartStore<'a>> {
        let product = Product {
            title: "Expresso Americano".to_string(),
            description: String::new(),
            tags: StringTagCollection::from_strs(&["tradicional", "com leite"]),
            price: Money::from_minor(995, BRL),
            image: String::new(),
        };

        let quantity = Quantity::new(2).ok_or("two is non-zero")?;
        let mut store = CartStore::new(BRL);

        store.populate([LineItem::new("1", product, quantity)?])?;

        Ok(store)
    }

    #[test]
    fn loading_store_renders_placeholder() -> TestResult {
        let store = CartStore::<'_, StringTagCollection>::new(BRL);

        let rendered = render(&store)?;

        assert_eq!(rendered, "Loading cart...\n");

        Ok(())
    }

    #[test]
    fn renders_lines_and_totals() -> TestResult {
        let store = store_with_americano()?;

        let rendered = render(&store)?;

        assert!(rendered.contains("Expresso Americano"));
        assert!(rendered.contains("com leite, tradicional"));
        assert!(rendered.contains(&Money::from_minor(1990, BRL).to_string()));
        assert!(rendered.contains("Delivery (2 tags):"));
        assert!(rendered.contains(&Money::from_minor(750, BRL).to_string()));
        assert!(rendered.contains(&Money::from_minor(2740, BRL).to_string()));

        Ok(())
    }

    #[test]
    fn empty_cart_renders_zero_totals() -> TestResult {
        let mut store = store_with_americano()?;
        store.remove("1");

        let rendered = render(&store)?;

        assert!(rendered.contains("Your cart is empty."));
        assert!(rendered.contains("Delivery (0 tags):"));

        Ok(())
    }

    #[test]
    fn receipt_from_snapshot_uses_snapshot_totals() -> TestResult {
        let store = store_with_americano()?;
        let snapshot = CartSnapshot {
            items: store.items().to_vec(),
            loading: false,
            totals: store.totals()?,
        };

        let receipt = Receipt::from(&snapshot);

        assert_eq!(receipt.totals().grand_total(), Money::from_minor(2740, BRL));

        Ok(())
    }
}
