// checkout/src/submission/service.rs

//! The point of no return: sends the draft to the order-creation endpoint
//! and, only once the server confirms, mirrors the order locally and empties
//! the cart.
//!
//! Submission is one [`Flow`] run over a per-call [`SubmissionCtx`]:
//!
//! 1. `verify_draft`: items and district are present, the date is still
//!    selectable and the slot has not elapsed.
//! 2. `compose_payload`: fee from the pricing table, wire payload.
//! 3. `create_order`: POST with the submitter's credential; a rejection is
//!    surfaced verbatim. An `after` hook logs the new order number.
//! 4. `mirror_order`: append to the local history (failure only logged).
//! 5. `clear_cart`: remove every item from the cart store.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use tracing::{info, instrument, warn};

use crate::backend::OrderBackend;
use crate::calendar;
use crate::cart::CartStore;
use crate::clock::Clock;
use crate::error::{BackendError, CheckoutError, CheckoutResult, FlowError, ValidationError};
use crate::flow::{Flow, FlowOutcome, SharedState, StageControl};
use crate::identity::Identity;
use crate::models::{Amount, CheckoutDraft, LocalOrderRecord, OpaqueId, OrderStatus, PaymentMethod};
use crate::pricing::DeliveryPricingTable;
use crate::slots::partition;
use crate::store::OrderHistory;

use super::payload::{OrderCreated, OrderPayload};

/// What the receipt view shows after a confirmed order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
  pub order_id: OpaqueId,
  pub order_number: String,
  pub subtotal: Amount,
  pub delivery_fee: Amount,
  /// As reported by the server.
  pub total: Amount,
  pub status: OrderStatus,
  pub payment_method: PaymentMethod,
  pub delivery_date: NaiveDate,
  pub delivery_slot: String,
  pub item_count: usize,
  pub placed_at: NaiveDateTime,
  /// False when the local history write failed.
  pub mirrored: bool,
}

struct SubmissionCtx {
  identity: Identity,
  draft: CheckoutDraft,
  placed_at: NaiveDateTime,
  fee: Amount,
  payload: Option<OrderPayload>,
  created: Option<OrderCreated>,
  record: Option<LocalOrderRecord>,
  mirrored: bool,
}

const STAGES: [&str; 5] = ["verify_draft", "compose_payload", "create_order", "mirror_order", "clear_cart"];

/// Releases the in-flight flag when dropped, whatever the outcome.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
  fn acquire(flag: &'a AtomicBool) -> Option<Self> {
    flag
      .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
      .ok()
      .map(|_| InFlightGuard(flag))
  }
}

impl Drop for InFlightGuard<'_> {
  fn drop(&mut self) {
    self.0.store(false, Ordering::Release);
  }
}

pub struct OrderSubmitter {
  flow: Flow<SubmissionCtx, CheckoutError>,
  clock: Arc<dyn Clock>,
  in_flight: AtomicBool,
}

impl OrderSubmitter {
  pub fn new(
    backend: Arc<dyn OrderBackend>,
    pricing: Arc<DeliveryPricingTable>,
    history: OrderHistory,
    cart: SharedState<CartStore>,
    clock: Arc<dyn Clock>,
  ) -> CheckoutResult<Self> {
    let flow = build_flow(backend, pricing, history, cart)?;
    Ok(Self {
      flow,
      clock,
      in_flight: AtomicBool::new(false),
    })
  }

  pub fn is_in_flight(&self) -> bool {
    self.in_flight.load(Ordering::Acquire)
  }

  /// Submits `draft` on behalf of `identity`.
  ///
  /// A second call while one is running fails fast with
  /// [`CheckoutError::SubmissionInFlight`]. On any error the caller's draft
  /// is untouched and can be resubmitted as-is; nothing is retried here.
  #[instrument(
    name = "OrderSubmitter::submit",
    skip_all,
    fields(identity = %identity.key, items = draft.items.len(), payment = draft.payment_method.as_str()),
    err(Display)
  )]
  pub async fn submit(&self, identity: &Identity, draft: &CheckoutDraft) -> CheckoutResult<Receipt> {
    let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
      warn!("Submission already in flight, ignoring repeated submit.");
      return Err(CheckoutError::SubmissionInFlight);
    };

    let ctx = SharedState::new(SubmissionCtx {
      identity: identity.clone(),
      draft: draft.clone(),
      placed_at: self.clock.now(),
      fee: 0,
      payload: None,
      created: None,
      record: None,
      mirrored: false,
    });

    match self.flow.run(ctx.clone()).await? {
      FlowOutcome::Completed => {}
      FlowOutcome::Halted => {
        return Err(CheckoutError::from(FlowError::Internal(
          "order submission halted before completion".to_string(),
        )))
      }
    }

    let guard = ctx.read();
    let record = guard
      .record
      .as_ref()
      .ok_or_else(|| FlowError::Internal("order record missing after submission".to_string()))?;
    Ok(Receipt {
      order_id: record.id.clone(),
      order_number: record.order_number.clone(),
      subtotal: guard.draft.subtotal(),
      delivery_fee: record.delivery_fee,
      total: record.total,
      status: record.status,
      payment_method: record.payment_method,
      delivery_date: record.delivery_date,
      delivery_slot: record.delivery_slot.clone(),
      item_count: record.items.len(),
      placed_at: record.placed_at,
      mirrored: guard.mirrored,
    })
  }
}

impl std::fmt::Debug for OrderSubmitter {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("OrderSubmitter")
      .field("stages", &self.flow.stage_names().collect::<Vec<_>>())
      .field("in_flight", &self.is_in_flight())
      .finish_non_exhaustive()
  }
}

fn internal(message: &str) -> CheckoutError {
  CheckoutError::from(FlowError::Internal(message.to_string()))
}

fn build_flow(
  backend: Arc<dyn OrderBackend>,
  pricing: Arc<DeliveryPricingTable>,
  history: OrderHistory,
  cart: SharedState<CartStore>,
) -> Result<Flow<SubmissionCtx, CheckoutError>, FlowError> {
  let stage_defs: Vec<(&str, bool)> = STAGES.iter().map(|name| (*name, false)).collect();
  let mut flow = Flow::<SubmissionCtx, CheckoutError>::new(&stage_defs);

  // Submission must not depend on the wizard having run its checks.
  flow.on("verify_draft", |ctx: SharedState<SubmissionCtx>| async move {
    let guard = ctx.read();
    let draft = &guard.draft;
    if draft.items.is_empty() {
      return Err(CheckoutError::from(ValidationError::EmptyCart));
    }
    let date = draft.schedule.date.ok_or(ValidationError::DateNotChosen)?;
    calendar::check_selectable(date, guard.placed_at).map_err(ValidationError::DateNotSelectable)?;
    let slot = match draft.schedule.slot.as_deref() {
      Some(slot) if !slot.trim().is_empty() => slot,
      _ => return Err(ValidationError::SlotNotChosen.into()),
    };
    if !partition(date, &[], guard.placed_at, true).is_open(slot) {
      return Err(ValidationError::SlotUnavailable { slot: slot.to_string() }.into());
    }
    if draft.address.district.as_deref().map_or(true, |d| d.trim().is_empty()) {
      return Err(ValidationError::DistrictNotChosen.into());
    }
    Ok(StageControl::Proceed)
  })?;

  flow.on("compose_payload", move |ctx: SharedState<SubmissionCtx>| {
    let pricing = pricing.clone();
    async move {
      let mut guard = ctx.write();
      let district = guard.draft.address.district.clone().unwrap_or_default();
      let fee = pricing.fee_for(&district);
      let payload = OrderPayload::compose(&guard.draft, fee)?;
      guard.fee = fee;
      guard.payload = Some(payload);
      Ok::<_, CheckoutError>(StageControl::Proceed)
    }
  })?;

  flow.on("create_order", move |ctx: SharedState<SubmissionCtx>| {
    let backend = backend.clone();
    async move {
      let (identity, payload) = {
        let guard = ctx.read();
        (guard.identity.clone(), guard.payload.clone())
      };
      let payload = payload.ok_or_else(|| internal("payload missing before create_order"))?;

      let created = match backend.create_order(&identity, &payload).await {
        Ok(created) => created,
        Err(BackendError::Rejected { status, message }) => {
          warn!(status, %message, "Order rejected by the server.");
          return Err(CheckoutError::Rejected(message));
        }
        Err(e) => {
          warn!(error = %e, "Order creation failed.");
          return Err(CheckoutError::Backend(e));
        }
      };
      ctx.write().created = Some(created);
      Ok::<_, CheckoutError>(StageControl::Proceed)
    }
  })?;

  flow.after("create_order", |ctx: SharedState<SubmissionCtx>| async move {
    let guard = ctx.read();
    let created = guard.created.as_ref().ok_or_else(|| internal("order missing after create_order"))?;
    info!(
      order_number = %created.order_number,
      total = created.total,
      identity = %guard.identity.key,
      "Order created."
    );
    Ok::<_, CheckoutError>(StageControl::Proceed)
  })?;

  flow.on("mirror_order", move |ctx: SharedState<SubmissionCtx>| {
    let history = history.clone();
    async move {
      let (identity_key, record) = {
        let guard = ctx.read();
        let created = guard.created.as_ref().ok_or_else(|| internal("order missing before mirror_order"))?;
        let draft = &guard.draft;
        let record = LocalOrderRecord {
          id: created.id.clone(),
          order_number: created.order_number.to_string(),
          items: draft.items.clone(),
          delivery_date: draft.schedule.date.ok_or(ValidationError::DateNotChosen)?,
          delivery_slot: draft.schedule.slot.clone().unwrap_or_default(),
          district: draft.address.district.clone().unwrap_or_default(),
          delivery_fee: guard.fee,
          payment_method: draft.payment_method,
          total: created.total,
          status: draft.payment_method.initial_status(),
          placed_at: guard.placed_at,
        };
        (guard.identity.key.clone(), record)
      };

      let mirrored = match history.append(&identity_key, record.clone()) {
        Ok(()) => true,
        Err(e) => {
          warn!(order_number = %record.order_number, error = %e, "Could not mirror order locally.");
          false
        }
      };
      let mut guard = ctx.write();
      guard.record = Some(record);
      guard.mirrored = mirrored;
      Ok::<_, CheckoutError>(StageControl::Proceed)
    }
  })?;

  flow.on("clear_cart", move |ctx: SharedState<SubmissionCtx>| {
    let cart = cart.clone();
    async move {
      let identity_key = ctx.read().identity.key.clone();
      let mut cart = cart.write();
      if cart.identity_key() == Some(identity_key.as_str()) {
        cart.clear();
      } else {
        warn!(identity = %identity_key, "Cart changed identity during submission, leaving it untouched.");
      }
      Ok::<_, CheckoutError>(StageControl::Proceed)
    }
  })?;

  Ok(flow)
}
