// checkout/src/cart.rs

//! The set of unique items the current identity has picked.
//!
//! Each item exists once, so `add` is idempotent and there is no quantity to
//! bump. Without an identity the store is inert: adds are ignored and logged.
//! Every mutation is written back to the [`KeyValueStore`] under the
//! identity's key; a failed write is logged and the in-memory set stays
//! authoritative for the session.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::identity::Identity;
use crate::models::{Amount, CartItem, OpaqueId, StoredCartEntry};
use crate::store::{cart_key, KeyValueStore};

pub struct CartStore {
  store: Arc<dyn KeyValueStore>,
  identity_key: Option<String>,
  items: Vec<CartItem>,
}

impl CartStore {
  /// An empty store with no identity attached.
  pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
    Self {
      store,
      identity_key: None,
      items: Vec::new(),
    }
  }

  pub fn identity_key(&self) -> Option<&str> {
    self.identity_key.as_deref()
  }

  /// Swaps to `identity`'s persisted set, or to an empty set for `None`.
  pub fn switch_identity(&mut self, identity: Option<&Identity>) {
    let next_key = identity.map(|i| i.key.clone());
    if next_key == self.identity_key {
      return;
    }
    self.items = match &next_key {
      Some(key) => self.load(key),
      None => Vec::new(),
    };
    info!(identity = ?next_key, items = self.items.len(), "Cart switched identity.");
    self.identity_key = next_key;
  }

  fn load(&self, identity_key: &str) -> Vec<CartItem> {
    let key = cart_key(identity_key);
    let entries: Vec<StoredCartEntry> = match self.store.load(&key) {
      Ok(Some(value)) => match serde_json::from_value(value) {
        Ok(entries) => entries,
        Err(e) => {
          warn!(%key, error = %e, "Stored cart is unreadable, starting empty.");
          Vec::new()
        }
      },
      Ok(None) => Vec::new(),
      Err(e) => {
        warn!(%key, error = %e, "Could not load stored cart, starting empty.");
        Vec::new()
      }
    };

    let mut items: Vec<CartItem> = Vec::with_capacity(entries.len());
    for entry in entries {
      if items.iter().any(|i| i.id == entry.id) {
        debug!(id = %entry.id, "Dropping duplicate stored cart entry.");
        continue;
      }
      items.push(entry.into());
    }
    items
  }

  fn persist(&self) {
    let Some(identity_key) = &self.identity_key else { return };
    let key = cart_key(identity_key);
    let entries: Vec<StoredCartEntry> = self.items.iter().map(StoredCartEntry::from).collect();
    let result = serde_json::to_value(&entries)
      .map_err(anyhow::Error::from)
      .and_then(|value: Value| self.store.save(&key, &value));
    if let Err(e) = result {
      warn!(%key, error = %e, "Could not persist cart.");
    }
  }

  /// Adds `item` unless it is already present. Returns whether the set changed.
  pub fn add(&mut self, item: CartItem) -> bool {
    if self.identity_key.is_none() {
      warn!(id = %item.id, "Ignoring add to cart: no identity.");
      return false;
    }
    if self.contains(&item.id) {
      debug!(id = %item.id, "Item already in cart.");
      return false;
    }
    debug!(id = %item.id, price = item.price, "Item added to cart.");
    self.items.push(item);
    self.persist();
    true
  }

  pub fn remove(&mut self, id: &OpaqueId) -> bool {
    let before = self.items.len();
    self.items.retain(|i| &i.id != id);
    let removed = self.items.len() != before;
    if removed {
      self.persist();
    }
    removed
  }

  pub fn clear(&mut self) {
    if self.items.is_empty() {
      return;
    }
    self.items.clear();
    self.persist();
  }

  pub fn contains(&self, id: &OpaqueId) -> bool {
    self.items.iter().any(|i| &i.id == id)
  }

  pub fn items(&self) -> &[CartItem] {
    &self.items
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }

  /// Distinct items, which is also the number of units.
  pub fn count(&self) -> usize {
    self.items.len()
  }

  pub fn subtotal(&self) -> Amount {
    self.items.iter().map(|i| i.price).sum()
  }
}

impl std::fmt::Debug for CartStore {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("CartStore")
      .field("identity_key", &self.identity_key)
      .field("items", &self.items)
      .finish_non_exhaustive()
  }
}
