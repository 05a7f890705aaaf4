// checkout/examples/scripted_checkout.rs

use async_trait::async_trait;
use checkout::backend::{OrderBackend, SlotBackend};
use checkout::submission::OrderCreated;
use checkout::{
  BackendError, CartItem, CheckoutContext, CheckoutDeps, CheckoutWizard, ContactDetails,
  DeliveryAddress, DeliveryPricingTable, FixedClock, Identity, MemoryStore, OpaqueId, OrderPayload, PaymentMethod,
  SessionIdentity, SlotQueryResponse,
};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tracing::info;

// 1. A backend that accepts every order and reports two busy windows.
struct DemoBackend {
  next_order: AtomicI64,
}

#[async_trait]
impl OrderBackend for DemoBackend {
  async fn create_order(&self, _identity: &Identity, payload: &OrderPayload) -> Result<OrderCreated, BackendError> {
    let n = self.next_order.fetch_add(1, Ordering::SeqCst);
    let subtotal: u64 = payload.items.iter().map(|i| i.price).sum();
    Ok(OrderCreated {
      id: OpaqueId::Int(n),
      order_number: OpaqueId::Text(format!("DEMO-{n:04}")),
      total: subtotal + payload.delivery.fee,
    })
  }
}

#[async_trait]
impl SlotBackend for DemoBackend {
  async fn busy_slots(&self, _date: NaiveDate) -> Result<SlotQueryResponse, BackendError> {
    Ok(SlotQueryResponse {
      available_slots: Vec::new(),
      busy_slots: vec!["09:00-11:00".into(), "15:00-17:00".into()],
    })
  }
}

fn next_weekday(from: NaiveDate) -> NaiveDate {
  let mut day = from + Duration::days(1);
  while matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
    day += Duration::days(1);
  }
  day
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- Scripted Checkout Example ---");

  // 2. Wire a context over in-memory collaborators.
  let start = NaiveDate::from_ymd_opt(2026, 10, 14)
    .and_then(|d| d.and_hms_opt(9, 30, 0))
    .ok_or_else(|| anyhow::anyhow!("invalid demo clock"))?;
  let backend = Arc::new(DemoBackend {
    next_order: AtomicI64::new(1),
  });
  let ctx = Arc::new(CheckoutContext::new(CheckoutDeps {
    identity: Arc::new(SessionIdentity::signed_in(Identity::new("demo", "demo-token"))),
    store: Arc::new(MemoryStore::new()),
    orders: backend.clone(),
    slots: backend,
    pricing: DeliveryPricingTable::standard(),
    clock: Arc::new(FixedClock::new(start)),
  })?);

  // 3. Fill the cart. The second add of the same item is ignored.
  {
    let mut cart = ctx.cart().write();
    cart.add(CartItem::new(1, "Oak side table", 4200).with_condition("very good"));
    cart.add(CartItem::new(2, "Ceramic vase", 900));
    cart.add(CartItem::new(1, "Oak side table", 4200));
    info!(items = cart.count(), subtotal = cart.subtotal(), "Cart ready.");
  }

  // 4. Walk the wizard.
  let mut wizard = CheckoutWizard::start(ctx.clone())?;
  wizard.next()?;

  if let Err(e) = wizard.next() {
    info!("Contact step refused as expected: {e}");
  }
  wizard.set_contact(ContactDetails::new("Robin Ash", "+44 7700 900456", "robin@example.com"))?;
  wizard.next()?;

  let day = next_weekday(start.date());
  if let Some(availability) = wizard.choose_date(day).await? {
    info!(open = ?availability.open, busy = ?availability.busy, "Slots for {day}.");
  }
  wizard.choose_slot("11:00-13:00")?;
  wizard.next()?;

  wizard.set_address(DeliveryAddress {
    district: Some("Hillcrest".into()),
    neighborhood: "Upper Green".into(),
    street: "Orchard Lane".into(),
    building: "22".into(),
    apartment: None,
    notes: "Leave with the neighbour if out".into(),
  })?;
  info!(fee = ?wizard.fee_preview(), outside_home_zone = ?wizard.outside_home_zone(), "Delivery quote.");
  wizard.set_payment_method(PaymentMethod::CashOnDelivery)?;
  wizard.next()?;

  // 5. Place the order.
  let receipt = wizard.submit().await?;
  info!(
    order_number = %receipt.order_number,
    total = receipt.total,
    status = %receipt.status,
    "Order placed."
  );

  assert_eq!(receipt.total, 4200 + 900 + 700);
  assert!(ctx.cart().read().is_empty());
  assert_eq!(ctx.history().list("demo").map(|h| h.len()).unwrap_or(0), 1);

  Ok(())
}
