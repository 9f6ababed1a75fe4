//! Cart Session
//!
//! A mounted cart page. Mounting starts a deferred load that sleeps for the
//! configured delay and then asks the [`CartSource`] for the lines. The load task
//! only produces lines; the session applies them in [`CartSession::loaded`], and
//! tearing the session down aborts the task, so a cancelled load can never touch
//! the store.
//!
//! Every change to the store is published to subscribers as a [`CartSnapshot`].

use std::time::Duration;

use rusty_money::{
    Money,
    iso::{BRL, Currency},
};
use thiserror::Error;
use tokio::{sync::watch, task::JoinHandle, time};
use tracing::{debug, info, warn};

use crate::{
    cart::{CartError, CartStore, CartTotals, DEFAULT_DELIVERY_RATE_MINOR, Mutation},
    items::LineItem,
    loader::{CartSource, SourceError},
    pricing::PricingError,
};

/// Delay before the simulated fetch completes.
pub const DEFAULT_LOAD_DELAY: Duration = Duration::from_millis(1500);

type PendingLoad = JoinHandle<Result<Vec<LineItem<'static>>, SourceError>>;

/// Errors raised by a cart session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The load task panicked or was cancelled.
    #[error("cart load task failed: {0}")]
    LoadTask(#[from] tokio::task::JoinError),

    /// An earlier load failed; the cart will not be loaded.
    #[error("cart load failed earlier")]
    LoadFailed,

    /// The source could not provide the lines.
    #[error("failed to fetch cart: {0}")]
    Source(#[from] SourceError),

    /// The store rejected the lines or a change.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// Totals could not be computed.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// How a session prices its cart and how long the load takes.
#[derive(Debug, Clone, Copy)]
pub struct SessionOptions {
    /// Fee charged per distinct tag; its currency is the cart currency.
    pub delivery_rate: Money<'static, Currency>,

    /// Delay before the source is asked for the lines.
    pub load_delay: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            delivery_rate: Money::from_minor(DEFAULT_DELIVERY_RATE_MINOR, BRL),
            load_delay: DEFAULT_LOAD_DELAY,
        }
    }
}

/// What the presentation layer renders.
#[derive(Debug, Clone, PartialEq)]
pub struct CartSnapshot {
    /// Lines in load order
    pub items: Vec<LineItem<'static>>,

    /// Whether the cart is still loading
    pub loading: bool,

    /// Totals for `items`
    pub totals: CartTotals<'static>,
}

impl CartSnapshot {
    fn of(store: &CartStore<'static>) -> Result<Self, PricingError> {
        Ok(Self {
            items: store.items().to_vec(),
            loading: store.is_loading(),
            totals: store.totals()?,
        })
    }
}

/// A mounted cart page.
#[derive(Debug)]
pub struct CartSession {
    store: CartStore<'static>,
    pending: Option<PendingLoad>,
    snapshots: watch::Sender<CartSnapshot>,
}

impl CartSession {
    /// Mount a cart page and start loading its lines in the background.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError`] if the initial (empty) totals cannot be computed.
    pub fn mount<S>(source: S, options: SessionOptions) -> Result<Self, PricingError>
    where
        S: CartSource + 'static,
    {
        let store = CartStore::with_delivery_rate(options.delivery_rate);
        let (snapshots, _) = watch::channel(CartSnapshot::of(&store)?);
        let delay = options.load_delay;

        let pending = tokio::spawn(async move {
            time::sleep(delay).await;
            source.fetch().await
        });

        debug!(?delay, "cart load scheduled");

        Ok(Self {
            store,
            pending: Some(pending),
            snapshots,
        })
    }

    /// Wait for the pending load and populate the cart. Does nothing once loaded.
    ///
    /// Dropping the returned future before it completes leaves the load pending,
    /// so a later call picks it up again.
    ///
    /// # Errors
    ///
    /// Returns an error if the load task failed, the source could not provide the
    /// lines, or the store rejected them. The cart stays loading in that case and
    /// every later call returns [`SessionError::LoadFailed`].
    pub async fn loaded(&mut self) -> Result<(), SessionError> {
        let Some(pending) = self.pending.as_mut() else {
            return if self.store.is_loading() {
                Err(SessionError::LoadFailed)
            } else {
                Ok(())
            };
        };

        let result = pending.await;
        self.pending = None;

        self.store.populate(result??)?;
        self.publish()?;

        info!(items = self.store.len(), "cart session ready");

        Ok(())
    }

    /// Add one unit to a line.
    ///
    /// # Errors
    ///
    /// See [`CartStore::increment`].
    pub fn increment(&mut self, id: impl AsRef<str>) -> Result<Mutation, SessionError> {
        let mutation = self.store.increment(id)?;

        self.publish_if(mutation)
    }

    /// Take one unit away from a line, never going below one.
    ///
    /// # Errors
    ///
    /// See [`CartStore::decrement`].
    pub fn decrement(&mut self, id: impl AsRef<str>) -> Result<Mutation, SessionError> {
        let mutation = self.store.decrement(id)?;

        self.publish_if(mutation)
    }

    /// Remove a line.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Pricing`] if the new totals cannot be computed.
    pub fn remove(&mut self, id: impl AsRef<str>) -> Result<Mutation, SessionError> {
        let mutation = self.store.remove(id);

        self.publish_if(mutation)
    }

    /// Receive a snapshot after every change.
    pub fn subscribe(&self) -> watch::Receiver<CartSnapshot> {
        self.snapshots.subscribe()
    }

    /// The latest published snapshot.
    pub fn snapshot(&self) -> CartSnapshot {
        self.snapshots.borrow().clone()
    }

    /// The underlying store.
    pub fn store(&self) -> &CartStore<'static> {
        &self.store
    }

    /// Whether the lines are still being loaded
    pub fn is_loading(&self) -> bool {
        self.store.is_loading()
    }

    /// Tear the page down, cancelling a load that has not completed.
    pub fn unmount(self) {
        drop(self);
    }

    fn publish_if(&self, mutation: Mutation) -> Result<Mutation, SessionError> {
        if mutation.is_applied() {
            self.publish()?;
        }

        Ok(mutation)
    }

    fn publish(&self) -> Result<(), PricingError> {
        self.snapshots.send_replace(CartSnapshot::of(&self.store)?);

        Ok(())
    }
}

impl Drop for CartSession {
    fn drop(&mut self) {
        let Some(pending) = self.pending.take() else {
            return;
        };

        if pending.is_finished() {
            debug!("loaded cart discarded");
        } else {
            pending.abort();
            warn!("pending cart load cancelled");
        }
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::USD;
    use testresult::TestResult;

    use crate::loader::{MockCartSource, SimulatedSource};

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn loads_after_delay() -> TestResult {
        let mut session = CartSession::mount(SimulatedSource, SessionOptions::default())?;

        assert!(session.is_loading());
        assert!(session.snapshot().loading);

        let started = time::Instant::now();
        session.loaded().await?;

        assert!(started.elapsed() >= DEFAULT_LOAD_DELAY);
        assert!(!session.is_loading());
        assert_eq!(session.store().len(), 3);

        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn loaded_twice_is_a_noop() -> TestResult {
        let mut source = MockCartSource::new();
        source.expect_fetch().times(1).returning(|| Ok(Vec::new()));

        let mut session = CartSession::mount(source, SessionOptions::default())?;

        session.loaded().await?;
        session.loaded().await?;

        assert!(!session.is_loading());
        assert!(session.store().is_empty());

        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn source_error_leaves_cart_loading() -> TestResult {
        let mut source = MockCartSource::new();
        source
            .expect_fetch()
            .times(1)
            .returning(|| Err(SourceError::ZeroQuantity("0".to_string())));

        let mut session = CartSession::mount(source, SessionOptions::default())?;

        let result = session.loaded().await;

        assert!(matches!(result, Err(SessionError::Source(_))));
        assert!(session.is_loading());
        assert!(matches!(
            session.loaded().await,
            Err(SessionError::LoadFailed)
        ));

        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn currency_mismatch_is_rejected() -> TestResult {
        let options = SessionOptions {
            delivery_rate: Money::from_minor(375, USD),
            ..SessionOptions::default()
        };

        let mut session = CartSession::mount(SimulatedSource, options)?;

        let result = session.loaded().await;

        assert!(matches!(
            result,
            Err(SessionError::Cart(CartError::CurrencyMismatch(..)))
        ));

        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn subscribers_see_load_and_applied_changes() -> TestResult {
        let mut session = CartSession::mount(SimulatedSource, SessionOptions::default())?;
        let mut updates = session.subscribe();

        session.loaded().await?;
        assert!(updates.has_changed()?);
        assert!(!updates.borrow_and_update().loading);

        session.increment("1")?;
        assert!(updates.has_changed()?);
        assert_eq!(
            updates.borrow_and_update().totals.items_total(),
            Money::from_minor(8625, BRL)
        );

        assert_eq!(session.decrement("0")?, Mutation::QuantityFloor);
        assert_eq!(session.remove("missing")?, Mutation::UnknownItem);
        assert!(!updates.has_changed()?);

        session.remove("0")?;
        assert_eq!(updates.borrow_and_update().items.len(), 2);

        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn mutations_while_loading_are_noops() -> TestResult {
        let mut session = CartSession::mount(SimulatedSource, SessionOptions::default())?;

        assert_eq!(session.increment("0")?, Mutation::UnknownItem);
        assert_eq!(session.remove("0")?, Mutation::UnknownItem);
        assert!(session.is_loading());

        Ok(())
    }
}
