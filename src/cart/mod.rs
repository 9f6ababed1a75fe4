//! Cart
//!
//! The cart store holds the ordered line items of a single cart and derives its
//! totals. It starts out loading, is populated exactly once, and afterwards only
//! changes through [`CartStore::increment`], [`CartStore::decrement`] and
//! [`CartStore::remove`]. Operations on ids that are not in the cart leave the
//! cart untouched and report why through [`Mutation`].

use rustc_hash::FxHashSet;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    items::{LineItem, LineItemId},
    pricing::{self, PricingError},
    tags::{
        collection::{TagCollection, distinct},
        string::StringTagCollection,
    },
};

pub mod checkout;
pub mod totals;

pub use checkout::CheckoutSummary;
pub use totals::CartTotals;

/// Delivery rate charged per distinct tag, in minor units (3.75).
pub const DEFAULT_DELIVERY_RATE_MINOR: i64 = 375;

/// Errors related to loading or changing a cart.
#[derive(Debug, Error, PartialEq)]
pub enum CartError {
    /// The cart was populated before.
    #[error("cart has already been loaded")]
    AlreadyLoaded,

    /// The cart has not finished loading.
    #[error("cart is still loading")]
    StillLoading,

    /// There is nothing in the cart to check out.
    #[error("cart is empty")]
    Empty,

    /// Two lines share an id.
    #[error("item {0} appears more than once")]
    DuplicateItem(LineItemId),

    /// An item's currency differs from the cart currency (item, item currency, cart currency).
    #[error("item {0} has currency {1}, but cart has currency {2}")]
    CurrencyMismatch(LineItemId, &'static str, &'static str),

    /// Incrementing would overflow the quantity.
    #[error("quantity of item {0} cannot grow any further")]
    QuantityOverflow(LineItemId),

    /// Wrapped pricing error.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// Outcome of a mutation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    /// The cart changed.
    Applied,

    /// No line has the requested id; nothing changed.
    UnknownItem,

    /// The line is already at a single unit; nothing changed.
    QuantityFloor,
}

impl Mutation {
    /// Whether the cart changed.
    #[must_use]
    pub fn is_applied(self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Lines of a cart plus whether they have been loaded yet.
#[derive(Debug, Clone, PartialEq)]
pub struct CartState<'a, T: TagCollection = StringTagCollection> {
    items: Vec<LineItem<'a, T>>,
    loading: bool,
}

impl<'a, T: TagCollection> CartState<'a, T> {
    /// An empty cart that is still loading.
    #[must_use]
    pub fn loading() -> Self {
        Self {
            items: Vec::new(),
            loading: true,
        }
    }

    /// Lines in load order
    pub fn items(&self) -> &[LineItem<'a, T>] {
        &self.items
    }

    /// Whether the cart is still waiting for its lines
    pub fn is_loading(&self) -> bool {
        self.loading
    }
}

impl<T: TagCollection> Default for CartState<'_, T> {
    fn default() -> Self {
        Self::loading()
    }
}

/// Cart store
#[derive(Debug, Clone)]
pub struct CartStore<'a, T: TagCollection = StringTagCollection> {
    state: CartState<'a, T>,
    delivery_rate: Money<'a, Currency>,
}

impl<'a, T: TagCollection> CartStore<'a, T> {
    /// Create an empty, loading cart priced in `currency` with the default delivery rate.
    #[must_use]
    pub fn new(currency: &'a Currency) -> Self {
        Self::with_delivery_rate(Money::from_minor(DEFAULT_DELIVERY_RATE_MINOR, currency))
    }

    /// Create an empty, loading cart. The rate's currency becomes the cart currency.
    #[must_use]
    pub fn with_delivery_rate(delivery_rate: Money<'a, Currency>) -> Self {
        Self {
            state: CartState::loading(),
            delivery_rate,
        }
    }

    /// Fill the cart with its lines and mark it loaded.
    ///
    /// # Errors
    ///
    /// - [`CartError::AlreadyLoaded`]: the cart was populated before.
    /// - [`CartError::DuplicateItem`]: two lines share an id.
    /// - [`CartError::CurrencyMismatch`]: a line is priced in another currency.
    pub fn populate(&mut self, items: impl Into<Vec<LineItem<'a, T>>>) -> Result<(), CartError> {
        if !self.state.loading {
            return Err(CartError::AlreadyLoaded);
        }

        let items = items.into();

        validate_lines(&items, self.currency())?;

        info!(items = items.len(), "cart loaded");

        self.state.items = items;
        self.state.loading = false;

        Ok(())
    }

    /// Add one unit to the line with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::QuantityOverflow`] or a wrapped [`PricingError`] if the
    /// new quantity or subtotal cannot be represented; the line is left unchanged.
    pub fn increment(&mut self, id: impl AsRef<str>) -> Result<Mutation, CartError> {
        let id = id.as_ref();

        let Some(item) = self.find_mut(id) else {
            debug!(item = id, "increment ignored: unknown item");
            return Ok(Mutation::UnknownItem);
        };

        let quantity = item
            .quantity()
            .incremented()
            .ok_or_else(|| CartError::QuantityOverflow(item.id().clone()))?;

        item.set_quantity(quantity)?;

        Ok(Mutation::Applied)
    }

    /// Take one unit away from the line with the given id, never going below one.
    ///
    /// # Errors
    ///
    /// Returns a wrapped [`PricingError`] if the new subtotal cannot be computed.
    pub fn decrement(&mut self, id: impl AsRef<str>) -> Result<Mutation, CartError> {
        let id = id.as_ref();

        let Some(item) = self.find_mut(id) else {
            debug!(item = id, "decrement ignored: unknown item");
            return Ok(Mutation::UnknownItem);
        };

        let Some(quantity) = item.quantity().decremented() else {
            debug!(item = id, "decrement ignored: quantity already at one");
            return Ok(Mutation::QuantityFloor);
        };

        item.set_quantity(quantity)?;

        Ok(Mutation::Applied)
    }

    /// Remove the line with the given id.
    pub fn remove(&mut self, id: impl AsRef<str>) -> Mutation {
        let id = id.as_ref();
        let before = self.state.items.len();

        self.state.items.retain(|item| item.id().as_str() != id);

        if self.state.items.len() == before {
            debug!(item = id, "remove ignored: unknown item");
            Mutation::UnknownItem
        } else {
            Mutation::Applied
        }
    }

    /// Derive the totals from the current lines.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if any amount overflows.
    pub fn totals(&self) -> Result<CartTotals<'a>, PricingError> {
        let items_total = pricing::sum(
            self.state.items.iter().map(|item| *item.subtotal()),
            self.currency(),
        )?;

        let tags = self.distinct_tags();
        let delivery_fee = pricing::delivery_fee(&self.delivery_rate, &tags)?;
        let grand_total = items_total.add(delivery_fee)?;

        Ok(CartTotals::new(
            items_total,
            tags.len(),
            delivery_fee,
            grand_total,
        ))
    }

    /// Every tag used by at least one line, once.
    pub fn distinct_tags(&self) -> T {
        distinct(self.state.items.iter().map(LineItem::tags))
    }

    /// Snapshot of what the customer is about to order.
    ///
    /// # Errors
    ///
    /// - [`CartError::StillLoading`]: the cart has not been loaded.
    /// - [`CartError::Empty`]: there are no lines.
    /// - [`CartError::Pricing`]: totals could not be computed.
    pub fn checkout(&self) -> Result<CheckoutSummary<'a>, CartError> {
        if self.state.loading {
            return Err(CartError::StillLoading);
        }

        if self.state.items.is_empty() {
            return Err(CartError::Empty);
        }

        let lines = self
            .state
            .items
            .iter()
            .map(|item| (item.id().clone(), item.quantity()))
            .collect();

        Ok(CheckoutSummary {
            lines,
            totals: self.totals()?,
        })
    }

    /// Find a line by id.
    pub fn get(&self, id: impl AsRef<str>) -> Option<&LineItem<'a, T>> {
        let id = id.as_ref();

        self.state.items.iter().find(|item| item.id().as_str() == id)
    }

    /// Lines in load order
    pub fn items(&self) -> &[LineItem<'a, T>] {
        self.state.items()
    }

    /// Current state
    pub fn state(&self) -> &CartState<'a, T> {
        &self.state
    }

    /// Whether the cart is still waiting for its lines
    pub fn is_loading(&self) -> bool {
        self.state.loading
    }

    /// Number of lines in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.items.len()
    }

    /// Check if the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.items.is_empty()
    }

    /// Currency every line is priced in
    pub fn currency(&self) -> &'a Currency {
        self.delivery_rate.currency()
    }

    /// Fee charged per distinct tag
    pub fn delivery_rate(&self) -> Money<'a, Currency> {
        self.delivery_rate
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut LineItem<'a, T>> {
        self.state
            .items
            .iter_mut()
            .find(|item| item.id().as_str() == id)
    }
}

fn validate_lines<T: TagCollection>(
    items: &[LineItem<'_, T>],
    currency: &Currency,
) -> Result<(), CartError> {
    let mut seen = FxHashSet::default();

    for item in items {
        let item_currency = item.price().currency();

        if item_currency != currency {
            return Err(CartError::CurrencyMismatch(
                item.id().clone(),
                item_currency.iso_alpha_code,
                currency.iso_alpha_code,
            ));
        }

        if !seen.insert(item.id().as_str()) {
            return Err(CartError::DuplicateItem(item.id().clone()));
        }
    }

    Ok(())
}
