// checkout/src/clock.rs

//! Wall-clock access behind a trait, so slot and date rules can be tested
//! at a fixed instant.

use chrono::{Local, NaiveDate, NaiveDateTime};
use parking_lot::RwLock;

pub trait Clock: Send + Sync {
  /// Local wall-clock time.
  fn now(&self) -> NaiveDateTime;

  fn today(&self) -> NaiveDate {
    self.now().date()
  }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn now(&self) -> NaiveDateTime {
    Local::now().naive_local()
  }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct FixedClock {
  now: RwLock<NaiveDateTime>,
}

impl FixedClock {
  pub fn new(now: NaiveDateTime) -> Self {
    Self { now: RwLock::new(now) }
  }

  pub fn set(&self, now: NaiveDateTime) {
    *self.now.write() = now;
  }

  pub fn advance(&self, by: chrono::Duration) {
    let mut now = self.now.write();
    *now += by;
  }
}

impl Clock for FixedClock {
  fn now(&self) -> NaiveDateTime {
    *self.now.read()
  }
}
