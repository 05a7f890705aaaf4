// checkout/src/store.rs

//! Durable key-value collaborators: the per-identity cart set and the local
//! order-history mirror.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Context as _;
use parking_lot::Mutex;
use serde_json::Value;

use crate::models::LocalOrderRecord;

/// A local, durable key-value store holding JSON documents.
pub trait KeyValueStore: Send + Sync {
  fn load(&self, key: &str) -> anyhow::Result<Option<Value>>;
  fn save(&self, key: &str, value: &Value) -> anyhow::Result<()>;
}

/// Keeps everything in memory. Used by tests and the bundled demo.
#[derive(Debug, Default)]
pub struct MemoryStore {
  entries: Mutex<HashMap<String, Value>>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn keys(&self) -> Vec<String> {
    let mut keys: Vec<String> = self.entries.lock().keys().cloned().collect();
    keys.sort();
    keys
  }
}

impl KeyValueStore for MemoryStore {
  fn load(&self, key: &str) -> anyhow::Result<Option<Value>> {
    Ok(self.entries.lock().get(key).cloned())
  }

  fn save(&self, key: &str, value: &Value) -> anyhow::Result<()> {
    self.entries.lock().insert(key.to_string(), value.clone());
    Ok(())
  }
}

pub fn cart_key(identity_key: &str) -> String {
  format!("cart/{identity_key}")
}

pub fn orders_key(identity_key: &str) -> String {
  format!("orders/{identity_key}")
}

/// Append-only mirror of confirmed orders, one list per identity.
#[derive(Clone)]
pub struct OrderHistory {
  store: Arc<dyn KeyValueStore>,
}

impl OrderHistory {
  pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
    Self { store }
  }

  pub fn list(&self, identity_key: &str) -> anyhow::Result<Vec<LocalOrderRecord>> {
    let key = orders_key(identity_key);
    match self.store.load(&key)? {
      Some(value) => serde_json::from_value(value).with_context(|| format!("decoding order history at '{key}'")),
      None => Ok(Vec::new()),
    }
  }

  pub fn append(&self, identity_key: &str, record: LocalOrderRecord) -> anyhow::Result<()> {
    let mut records = self.list(identity_key)?;
    records.push(record);
    let value = serde_json::to_value(&records).context("encoding order history")?;
    self.store.save(&orders_key(identity_key), &value)
  }
}

impl std::fmt::Debug for OrderHistory {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("OrderHistory").finish_non_exhaustive()
  }
}
