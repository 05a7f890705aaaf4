// checkout/src/context.rs

//! Everything a checkout needs, gathered in one object that is handed to
//! [`CheckoutWizard::start`](crate::wizard::CheckoutWizard::start) instead
//! of being reached through globals.

use std::sync::Arc;

use tracing::info;

use crate::backend::{OrderBackend, SlotBackend};
use crate::cart::CartStore;
use crate::clock::Clock;
use crate::error::CheckoutResult;
use crate::flow::SharedState;
use crate::identity::{Identity, IdentityProvider};
use crate::pricing::DeliveryPricingTable;
use crate::slots::SlotAvailabilityResolver;
use crate::store::{KeyValueStore, OrderHistory};
use crate::submission::OrderSubmitter;

/// External collaborators a [`CheckoutContext`] is built from.
pub struct CheckoutDeps {
  pub identity: Arc<dyn IdentityProvider>,
  pub store: Arc<dyn KeyValueStore>,
  pub orders: Arc<dyn OrderBackend>,
  pub slots: Arc<dyn SlotBackend>,
  pub pricing: DeliveryPricingTable,
  pub clock: Arc<dyn Clock>,
}

pub struct CheckoutContext {
  identity: Arc<dyn IdentityProvider>,
  cart: SharedState<CartStore>,
  pricing: Arc<DeliveryPricingTable>,
  slots: SlotAvailabilityResolver,
  submitter: OrderSubmitter,
  history: OrderHistory,
  clock: Arc<dyn Clock>,
}

impl CheckoutContext {
  pub fn new(deps: CheckoutDeps) -> CheckoutResult<Self> {
    let CheckoutDeps {
      identity,
      store,
      orders,
      slots,
      pricing,
      clock,
    } = deps;

    let pricing = Arc::new(pricing);
    let history = OrderHistory::new(store.clone());
    let mut cart = CartStore::new(store);
    cart.switch_identity(identity.current().as_ref());
    let cart = SharedState::new(cart);

    let submitter = OrderSubmitter::new(orders, pricing.clone(), history.clone(), cart.clone(), clock.clone())?;
    let slots = SlotAvailabilityResolver::new(slots, clock.clone());

    Ok(Self {
      identity,
      cart,
      pricing,
      slots,
      submitter,
      history,
      clock,
    })
  }

  /// Re-reads the identity provider and swaps the cart over when the
  /// identity changed (sign-in or sign-out).
  pub fn sync_identity(&self) -> Option<Identity> {
    let current = self.identity.current();
    let mut cart = self.cart.write();
    let new_key = current.as_ref().map(|i| i.key.as_str());
    if cart.identity_key() != new_key {
      info!(from = ?cart.identity_key(), to = ?new_key, "Identity changed.");
      cart.switch_identity(current.as_ref());
    }
    current
  }

  pub fn current_identity(&self) -> Option<Identity> {
    self.identity.current()
  }

  pub fn cart(&self) -> &SharedState<CartStore> {
    &self.cart
  }

  pub fn pricing(&self) -> &DeliveryPricingTable {
    &self.pricing
  }

  pub fn slots(&self) -> &SlotAvailabilityResolver {
    &self.slots
  }

  pub fn submitter(&self) -> &OrderSubmitter {
    &self.submitter
  }

  pub fn history(&self) -> &OrderHistory {
    &self.history
  }

  pub fn clock(&self) -> &dyn Clock {
    self.clock.as_ref()
  }
}

impl std::fmt::Debug for CheckoutContext {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("CheckoutContext")
      .field("cart", &self.cart)
      .field("pricing", &self.pricing)
      .field("submitter", &self.submitter)
      .finish_non_exhaustive()
  }
}
