// checkout/src/optimistic.rs

//! Apply a change locally first, confirm it with the server, undo it if the
//! server says no. One call per key may be in flight at a time.
//!
//! Checkout itself never uses this: orders are only recorded after the
//! server confirms them. It exists for toggles such as favorites.

use std::collections::HashSet;
use std::future::Future;
use std::hash::Hash;

use parking_lot::Mutex;
use thiserror::Error;
use tracing::{debug, warn};

use crate::flow::SharedState;

#[derive(Debug, Error)]
pub enum OptimisticError<E>
where
  E: std::error::Error + 'static,
{
  #[error("An update for this item is already in flight.")]
  InFlight,

  #[error("Update rejected, local change rolled back: {0}")]
  RolledBack(#[source] E),
}

pub struct OptimisticAction<K> {
  in_flight: Mutex<HashSet<K>>,
}

struct KeyGuard<'a, K: Eq + Hash> {
  set: &'a Mutex<HashSet<K>>,
  key: Option<K>,
}

impl<K: Eq + Hash> Drop for KeyGuard<'_, K> {
  fn drop(&mut self) {
    if let Some(key) = self.key.take() {
      self.set.lock().remove(&key);
    }
  }
}

impl<K> Default for OptimisticAction<K> {
  fn default() -> Self {
    Self {
      in_flight: Mutex::new(HashSet::new()),
    }
  }
}

impl<K> OptimisticAction<K>
where
  K: Eq + Hash + Clone + std::fmt::Debug,
{
  pub fn new() -> Self {
    Self::default()
  }

  pub fn is_in_flight(&self, key: &K) -> bool {
    self.in_flight.lock().contains(key)
  }

  /// Runs `apply` on `state` right away, then awaits `confirm`.
  ///
  /// `apply` returns whatever `rollback` needs to undo it. On rejection the
  /// rollback runs before the error is returned.
  pub async fn run<T, U, V, E, A, R, C, Fut>(
    &self,
    key: K,
    state: &SharedState<T>,
    apply: A,
    rollback: R,
    confirm: C,
  ) -> Result<V, OptimisticError<E>>
  where
    T: Send + Sync + 'static,
    E: std::error::Error + 'static,
    A: FnOnce(&mut T) -> U,
    R: FnOnce(&mut T, U),
    C: FnOnce() -> Fut,
    Fut: Future<Output = Result<V, E>>,
  {
    if !self.in_flight.lock().insert(key.clone()) {
      debug!(?key, "Optimistic update already in flight.");
      return Err(OptimisticError::InFlight);
    }
    let _guard = KeyGuard {
      set: &self.in_flight,
      key: Some(key.clone()),
    };

    let undo = apply(&mut *state.write());
    match confirm().await {
      Ok(value) => Ok(value),
      Err(e) => {
        warn!(?key, error = %e, "Optimistic update rejected, rolling back.");
        rollback(&mut *state.write(), undo);
        Err(OptimisticError::RolledBack(e))
      }
    }
  }
}

impl<K> std::fmt::Debug for OptimisticAction<K> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("OptimisticAction")
      .field("in_flight", &self.in_flight.lock().len())
      .finish()
  }
}
