// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use async_trait::async_trait;
use checkout::backend::{OrderBackend, SlotBackend};
use checkout::submission::OrderCreated;
use checkout::{
  BackendError, CartItem, CheckoutContext, CheckoutDeps, CheckoutWizard, ContactDetails, DeliveryAddress,
  DeliveryPricingTable, FixedClock, Identity, KeyValueStore, MemoryStore, OpaqueId, OrderPayload, PaymentMethod,
  SessionIdentity, SlotQueryResponse,
};
use chrono::{NaiveDate, NaiveDateTime};
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};
use std::time::Duration;
use tracing::Level;

// --- Fixed dates (2026-10-14 is a Wednesday) ---
pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
  NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn at(day: NaiveDate, hour: u32, minute: u32) -> NaiveDateTime {
  day.and_hms_opt(hour, minute, 0).unwrap()
}

pub fn today() -> NaiveDate {
  date(2026, 10, 14)
}

pub fn tomorrow() -> NaiveDate {
  date(2026, 10, 15)
}

pub fn saturday() -> NaiveDate {
  date(2026, 10, 17)
}

pub fn lamp() -> CartItem {
  CartItem::new(1, "Brass desk lamp", 1000)
    .with_image("lamp.jpg")
    .with_condition("good")
    .with_category("lighting")
}

pub fn chair() -> CartItem {
  CartItem::new("chair-7", "Bentwood chair", 2500)
}

pub fn alice() -> Identity {
  Identity::new("alice", "token-alice")
}

pub fn bob() -> Identity {
  Identity::new("bob", "token-bob")
}

pub fn contact() -> ContactDetails {
  ContactDetails::new("Alice Moss", "+44 7700 900123", "alice@example.com")
}

pub fn address(district: &str) -> DeliveryAddress {
  DeliveryAddress {
    district: Some(district.to_string()),
    neighborhood: "Mill Quarter".into(),
    street: "Canal Street".into(),
    building: "14".into(),
    apartment: Some("3B".into()),
    notes: "Ring twice".into(),
  }
}

// --- Fake order backend ---
#[derive(Debug, Clone)]
pub enum OrderMode {
  Accept,
  Reject { status: u16, message: String },
  Unreachable,
}

pub struct FakeOrderBackend {
  pub mode: Mutex<OrderMode>,
  pub delay: Mutex<Duration>,
  pub received: Mutex<Vec<OrderPayload>>,
  pub credentials: Mutex<Vec<String>>,
  next_id: AtomicUsize,
}

impl FakeOrderBackend {
  pub fn new() -> Self {
    Self {
      mode: Mutex::new(OrderMode::Accept),
      delay: Mutex::new(Duration::ZERO),
      received: Mutex::new(Vec::new()),
      credentials: Mutex::new(Vec::new()),
      next_id: AtomicUsize::new(100),
    }
  }

  pub fn set_mode(&self, mode: OrderMode) {
    *self.mode.lock() = mode;
  }

  pub fn set_delay(&self, delay: Duration) {
    *self.delay.lock() = delay;
  }

  pub fn calls(&self) -> usize {
    self.received.lock().len()
  }

  pub fn last_payload(&self) -> Option<OrderPayload> {
    self.received.lock().last().cloned()
  }

  pub fn sent_credentials(&self) -> Vec<String> {
    self.credentials.lock().clone()
  }
}

#[async_trait]
impl OrderBackend for FakeOrderBackend {
  async fn create_order(&self, identity: &Identity, payload: &OrderPayload) -> Result<OrderCreated, BackendError> {
    self.received.lock().push(payload.clone());
    self.credentials.lock().push(identity.credential.clone());
    let delay = *self.delay.lock();
    if !delay.is_zero() {
      tokio::time::sleep(delay).await;
    }
    let mode = self.mode.lock().clone();
    match mode {
      OrderMode::Accept => {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let subtotal: u64 = payload.items.iter().map(|i| i.price).sum();
        Ok(OrderCreated {
          id: OpaqueId::Int(id as i64),
          order_number: OpaqueId::Text(format!("SH-{id}")),
          total: subtotal + payload.delivery.fee,
        })
      }
      OrderMode::Reject { status, message } => Err(BackendError::Rejected { status, message }),
      OrderMode::Unreachable => Err(BackendError::Transport {
        source: anyhow::anyhow!("connection refused"),
      }),
    }
  }
}

// --- Fake slot backend ---
pub struct FakeSlotBackend {
  pub busy: Mutex<HashMap<NaiveDate, Vec<String>>>,
  pub delays: Mutex<HashMap<NaiveDate, Duration>>,
  pub failing: Mutex<bool>,
  pub queries: Mutex<Vec<NaiveDate>>,
}

impl FakeSlotBackend {
  pub fn new() -> Self {
    Self {
      busy: Mutex::new(HashMap::new()),
      delays: Mutex::new(HashMap::new()),
      failing: Mutex::new(false),
      queries: Mutex::new(Vec::new()),
    }
  }

  pub fn set_busy(&self, date: NaiveDate, labels: &[&str]) {
    self.busy.lock().insert(date, labels.iter().map(|l| l.to_string()).collect());
  }

  pub fn set_delay(&self, date: NaiveDate, delay: Duration) {
    self.delays.lock().insert(date, delay);
  }

  pub fn set_failing(&self, failing: bool) {
    *self.failing.lock() = failing;
  }
}

#[async_trait]
impl SlotBackend for FakeSlotBackend {
  async fn busy_slots(&self, date: NaiveDate) -> Result<SlotQueryResponse, BackendError> {
    self.queries.lock().push(date);
    let delay = self.delays.lock().get(&date).copied();
    if let Some(delay) = delay {
      tokio::time::sleep(delay).await;
    }
    if *self.failing.lock() {
      return Err(BackendError::Rejected {
        status: 503,
        message: "Service Unavailable".into(),
      });
    }
    Ok(SlotQueryResponse {
      available_slots: Vec::new(),
      busy_slots: self.busy.lock().get(&date).cloned().unwrap_or_default(),
    })
  }
}

// --- A store whose writes can be made to fail ---
#[derive(Default)]
pub struct FlakyStore {
  pub inner: MemoryStore,
  pub fail_prefix: Mutex<Option<String>>,
}

impl FlakyStore {
  pub fn fail_writes_to(&self, prefix: &str) {
    *self.fail_prefix.lock() = Some(prefix.to_string());
  }
}

impl KeyValueStore for FlakyStore {
  fn load(&self, key: &str) -> anyhow::Result<Option<Value>> {
    self.inner.load(key)
  }

  fn save(&self, key: &str, value: &Value) -> anyhow::Result<()> {
    if let Some(prefix) = self.fail_prefix.lock().as_deref() {
      if key.starts_with(prefix) {
        anyhow::bail!("disk full");
      }
    }
    self.inner.save(key, value)
  }
}

// --- Harness wiring a context over the fakes ---
pub struct Harness {
  pub ctx: Arc<CheckoutContext>,
  pub store: Arc<FlakyStore>,
  pub orders: Arc<FakeOrderBackend>,
  pub slots: Arc<FakeSlotBackend>,
  pub clock: Arc<FixedClock>,
  pub session: Arc<SessionIdentity>,
}

impl Harness {
  pub fn new(identity: Option<Identity>) -> Self {
    Self::at(identity, at(today(), 10, 30))
  }

  pub fn at(identity: Option<Identity>, now: NaiveDateTime) -> Self {
    let store = Arc::new(FlakyStore::default());
    let orders = Arc::new(FakeOrderBackend::new());
    let slots = Arc::new(FakeSlotBackend::new());
    let clock = Arc::new(FixedClock::new(now));
    let session = Arc::new(SessionIdentity::new(identity));
    let ctx = CheckoutContext::new(CheckoutDeps {
      identity: session.clone(),
      store: store.clone(),
      orders: orders.clone(),
      slots: slots.clone(),
      pricing: DeliveryPricingTable::standard(),
      clock: clock.clone(),
    })
    .expect("context builds");
    Self {
      ctx: Arc::new(ctx),
      store,
      orders,
      slots,
      clock,
      session,
    }
  }

  pub fn signed_in() -> Self {
    Self::new(Some(alice()))
  }

  pub fn add_to_cart(&self, item: CartItem) -> bool {
    self.ctx.cart().write().add(item)
  }

  pub fn wizard(&self) -> CheckoutWizard {
    CheckoutWizard::start(self.ctx.clone()).expect("wizard starts")
  }

  /// Walks a wizard to Confirm with valid data for `district`.
  pub async fn wizard_at_confirm(&self, district: &str, payment: PaymentMethod) -> CheckoutWizard {
    let mut wizard = self.wizard();
    wizard.next().expect("cart admits");
    wizard.set_contact(contact()).unwrap();
    wizard.next().expect("contact admits");
    wizard.choose_date(tomorrow()).await.expect("date selectable");
    wizard.choose_slot("13:00-15:00").expect("slot open");
    wizard.next().expect("schedule admits");
    wizard.set_address(address(district)).unwrap();
    wizard.set_payment_method(payment).unwrap();
    wizard.next().expect("address admits");
    wizard
  }
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
