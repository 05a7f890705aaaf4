// checkout/src/slots.rs

//! Delivery time windows and their availability for a date.
//!
//! A slot's state is never stored; it is derived per query from the clock
//! and the backend's busy list. When the lookup fails every slot that has not
//! already elapsed is offered as open, so a backend outage never blocks
//! checkout. The server arbitrates real conflicts when the order is created.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::backend::SlotBackend;
use crate::clock::Clock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSlot {
  pub label: &'static str,
  pub start_hour: u32,
  pub end_hour: u32,
}

impl TimeSlot {
  const fn new(label: &'static str, start_hour: u32, end_hour: u32) -> Self {
    Self {
      label,
      start_hour,
      end_hour,
    }
  }

  pub fn end_time(&self) -> NaiveTime {
    NaiveTime::from_hms_opt(self.end_hour, 0, 0).unwrap_or(NaiveTime::MIN)
  }

  pub fn start_time(&self) -> NaiveTime {
    NaiveTime::from_hms_opt(self.start_hour, 0, 0).unwrap_or(NaiveTime::MIN)
  }

  /// Matches a backend label, ignoring whitespace ("09:00 - 11:00").
  pub fn matches(&self, label: &str) -> bool {
    let compact: String = label.chars().filter(|c| !c.is_whitespace()).collect();
    compact == self.label
  }
}

/// The fixed same-day delivery windows.
pub const SLOT_CATALOG: [TimeSlot; 5] = [
  TimeSlot::new("09:00-11:00", 9, 11),
  TimeSlot::new("11:00-13:00", 11, 13),
  TimeSlot::new("13:00-15:00", 13, 15),
  TimeSlot::new("15:00-17:00", 15, 17),
  TimeSlot::new("17:00-19:00", 17, 19),
];

pub fn find_slot(label: &str) -> Option<&'static TimeSlot> {
  SLOT_CATALOG.iter().find(|s| s.matches(label))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
  /// Already over. Only happens for today.
  Past,
  Busy,
  Open,
}

/// Body of the slot query endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotQueryResponse {
  #[serde(default)]
  pub available_slots: Vec<String>,
  #[serde(default)]
  pub busy_slots: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotAvailability {
  pub date: NaiveDate,
  pub open: Vec<&'static str>,
  pub busy: Vec<&'static str>,
  pub past: Vec<&'static str>,
  /// True when the busy list could not be fetched and everything was opened.
  pub degraded: bool,
}

impl SlotAvailability {
  pub fn is_open(&self, label: &str) -> bool {
    self.open.iter().any(|open| find_slot(label).is_some_and(|s| s.label == *open))
  }

  pub fn state_of(&self, label: &str) -> Option<SlotState> {
    let slot = find_slot(label)?;
    Some(if self.past.contains(&slot.label) {
      SlotState::Past
    } else if self.busy.contains(&slot.label) {
      SlotState::Busy
    } else {
      SlotState::Open
    })
  }
}

/// Splits the catalog for `date`. A past slot stays past whatever the busy list says.
pub fn partition(date: NaiveDate, busy_labels: &[String], now: chrono::NaiveDateTime, degraded: bool) -> SlotAvailability {
  let mut availability = SlotAvailability {
    date,
    open: Vec::new(),
    busy: Vec::new(),
    past: Vec::new(),
    degraded,
  };
  let is_today = date == now.date();
  for slot in &SLOT_CATALOG {
    if is_today && now.time() >= slot.end_time() {
      availability.past.push(slot.label);
    } else if busy_labels.iter().any(|b| slot.matches(b)) {
      availability.busy.push(slot.label);
    } else {
      availability.open.push(slot.label);
    }
  }
  availability
}

pub struct SlotAvailabilityResolver {
  backend: Arc<dyn SlotBackend>,
  clock: Arc<dyn Clock>,
  issued: AtomicU64,
  latest: Mutex<Option<(u64, SlotAvailability)>>,
}

impl SlotAvailabilityResolver {
  pub fn new(backend: Arc<dyn SlotBackend>, clock: Arc<dyn Clock>) -> Self {
    Self {
      backend,
      clock,
      issued: AtomicU64::new(0),
      latest: Mutex::new(None),
    }
  }

  /// Fetches and partitions the catalog for `date`. Never fails.
  #[instrument(name = "SlotAvailabilityResolver::available_slots", skip_all, fields(%date))]
  pub async fn available_slots(&self, date: NaiveDate) -> SlotAvailability {
    match self.backend.busy_slots(date).await {
      Ok(response) => partition(date, &response.busy_slots, self.clock.now(), false),
      Err(e) => {
        warn!(error = %e, "Slot lookup failed, offering every slot as open.");
        partition(date, &[], self.clock.now(), true)
      }
    }
  }

  /// Like [`available_slots`](Self::available_slots), but for a picker that
  /// may change its date while a lookup is still running. Only the most
  /// recently issued request is accepted; an older response arriving later
  /// returns `None` and leaves [`latest`](Self::latest) untouched.
  pub async fn select_date(&self, date: NaiveDate) -> Option<SlotAvailability> {
    let ticket = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
    let availability = self.available_slots(date).await;

    if self.issued.load(Ordering::SeqCst) != ticket {
      debug!(%date, ticket, "Discarding superseded slot response.");
      return None;
    }
    let mut latest = self.latest.lock();
    if latest.as_ref().is_some_and(|(seen, _)| *seen > ticket) {
      return None;
    }
    *latest = Some((ticket, availability.clone()));
    Some(availability)
  }

  pub fn latest(&self) -> Option<SlotAvailability> {
    self.latest.lock().as_ref().map(|(_, a)| a.clone())
  }
}

impl std::fmt::Debug for SlotAvailabilityResolver {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("SlotAvailabilityResolver")
      .field("issued", &self.issued.load(Ordering::SeqCst))
      .finish_non_exhaustive()
  }
}
