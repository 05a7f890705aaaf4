// checkout/src/wizard/controller.rs

//! The checkout state machine over one [`CheckoutDraft`].
//!
//! `next` only moves when the current step admits, `back` always moves,
//! and `jump_to` moves forward only when every earlier step admits. Failed
//! moves leave the wizard exactly where it was.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info, instrument, warn};

use crate::calendar::{self, DateRejection};
use crate::context::CheckoutContext;
use crate::error::{CheckoutError, CheckoutResult, ValidationError};
use crate::identity::Identity;
use crate::models::{Amount, CheckoutDraft, ContactDetails, DeliveryAddress, OpaqueId, PaymentMethod};
use crate::slots::{self, SlotAvailability};
use crate::submission::Receipt;

use super::step::{first_blocking, CheckoutStep, StepState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardPhase {
  Editing(CheckoutStep),
  /// The order went through; the draft has been discarded.
  Completed(Receipt),
}

pub struct CheckoutWizard {
  ctx: Arc<CheckoutContext>,
  identity: Identity,
  phase: WizardPhase,
  draft: CheckoutDraft,
  slots: Option<SlotAvailability>,
}

impl CheckoutWizard {
  /// Opens checkout for the current identity. Without one there is no
  /// wizard at all.
  pub fn start(ctx: Arc<CheckoutContext>) -> CheckoutResult<Self> {
    let identity = ctx.sync_identity().ok_or(CheckoutError::IdentityRequired)?;
    let mut wizard = Self {
      ctx,
      identity,
      phase: WizardPhase::Editing(CheckoutStep::Cart),
      draft: CheckoutDraft::default(),
      slots: None,
    };
    wizard.snapshot_cart();
    info!(identity = %wizard.identity.key, items = wizard.draft.items.len(), "Checkout started.");
    Ok(wizard)
  }

  /// The step on screen. A completed wizard stays on Confirm.
  pub fn current(&self) -> CheckoutStep {
    match &self.phase {
      WizardPhase::Editing(step) => *step,
      WizardPhase::Completed(_) => CheckoutStep::Confirm,
    }
  }

  pub fn phase(&self) -> &WizardPhase {
    &self.phase
  }

  pub fn draft(&self) -> &CheckoutDraft {
    &self.draft
  }

  pub fn identity(&self) -> &Identity {
    &self.identity
  }

  pub fn receipt(&self) -> Option<&Receipt> {
    match &self.phase {
      WizardPhase::Completed(receipt) => Some(receipt),
      WizardPhase::Editing(_) => None,
    }
  }

  /// Slot availability for the chosen date, once fetched.
  pub fn slots(&self) -> Option<&SlotAvailability> {
    self.slots.as_ref()
  }

  fn editing_step(&self) -> CheckoutResult<CheckoutStep> {
    match self.phase {
      WizardPhase::Editing(step) => Ok(step),
      WizardPhase::Completed(_) => Err(CheckoutError::AlreadySubmitted),
    }
  }

  fn snapshot_cart(&mut self) {
    self.draft.items = self.ctx.cart().read().items().to_vec();
  }

  /// A date that stopped being selectable (the day rolled over, say) is
  /// dropped together with its slot.
  fn revalidate_date(&mut self) -> Option<DateRejection> {
    let date = self.draft.schedule.date?;
    let reason = calendar::check_selectable(date, self.ctx.clock().now()).err()?;
    info!(%date, %reason, "Previously chosen date is no longer selectable, clearing it.");
    self.draft.schedule.date = None;
    self.draft.schedule.slot = None;
    self.slots = None;
    Some(reason)
  }

  /// The schedule as it stands right now: the date must still be selectable
  /// and the slot must not have elapsed. A stale part is cleared.
  fn revalidate_schedule(&mut self) -> Option<ValidationError> {
    if let Some(reason) = self.revalidate_date() {
      return Some(ValidationError::DateNotSelectable(reason));
    }
    let (Some(date), Some(slot)) = (self.draft.schedule.date, self.draft.schedule.slot.clone()) else {
      return None;
    };
    if slots::partition(date, &[], self.ctx.clock().now(), true).is_open(&slot) {
      return None;
    }
    info!(%date, %slot, "Previously chosen slot has elapsed, clearing it.");
    self.draft.schedule.slot = None;
    Some(ValidationError::SlotUnavailable { slot })
  }

  fn apply_fee(&mut self) {
    self.draft.delivery_fee = self
      .draft
      .address
      .district
      .as_deref()
      .map(|district| self.ctx.pricing().fee_for(district));
  }

  fn enter(&mut self, target: CheckoutStep) {
    if target == CheckoutStep::Schedule {
      self.revalidate_date();
    }
    if target == CheckoutStep::Confirm {
      self.apply_fee();
    }
    debug!(step = %target, "Entered checkout step.");
    self.phase = WizardPhase::Editing(target);
  }

  /// Refreshes everything forward navigation is checked against.
  fn prepare_forward(&mut self, from: CheckoutStep) {
    if from == CheckoutStep::Cart {
      self.snapshot_cart();
    }
    self.revalidate_date();
  }

  pub fn next(&mut self) -> CheckoutResult<CheckoutStep> {
    let step = self.editing_step()?;
    self.prepare_forward(step);
    if let Err(e) = StepState::of(step, &self.draft).admit() {
      info!(step = %step, error = %e, "Cannot advance checkout.");
      return Err(e.into());
    }
    let target = step.next().ok_or(ValidationError::NoFurtherStep)?;
    self.enter(target);
    Ok(target)
  }

  /// Moves one step back. On the first step this stays put.
  pub fn back(&mut self) -> CheckoutResult<CheckoutStep> {
    let step = self.editing_step()?;
    match step.prev() {
      Some(target) => {
        self.enter(target);
        Ok(target)
      }
      None => Ok(step),
    }
  }

  /// Jumps straight to `target`. Going back is always allowed; going
  /// forward needs every step before `target` to admit.
  pub fn jump_to(&mut self, target: CheckoutStep) -> CheckoutResult<CheckoutStep> {
    let step = self.editing_step()?;
    if target <= step {
      if target != step {
        self.enter(target);
      }
      return Ok(target);
    }
    self.prepare_forward(step);
    if let Some(e) = first_blocking(&self.draft, target) {
      info!(from = %step, to = %target, error = %e, "Step is not reachable yet.");
      return Err(e.into());
    }
    self.enter(target);
    Ok(target)
  }

  /// Removes an item from the cart and from the draft's snapshot.
  pub fn remove_item(&mut self, id: &OpaqueId) -> CheckoutResult<bool> {
    self.editing_step()?;
    let removed = self.ctx.cart().write().remove(id);
    self.snapshot_cart();
    Ok(removed)
  }

  pub fn set_contact(&mut self, contact: ContactDetails) -> CheckoutResult<()> {
    self.editing_step()?;
    self.draft.contact = contact;
    Ok(())
  }

  /// Picks a delivery date and fetches its slots. The slot choice is reset.
  ///
  /// Returns `None` when a newer lookup overtook this one; the newer result
  /// is the one that sticks.
  #[instrument(name = "CheckoutWizard::choose_date", skip_all, fields(%date), err(Display))]
  pub async fn choose_date(&mut self, date: NaiveDate) -> CheckoutResult<Option<SlotAvailability>> {
    self.editing_step()?;
    calendar::check_selectable(date, self.ctx.clock().now()).map_err(ValidationError::DateNotSelectable)?;
    self.draft.schedule.date = Some(date);
    self.draft.schedule.slot = None;
    self.slots = None;
    self.refresh_slots().await
  }

  /// Re-queries availability for the chosen date.
  pub async fn refresh_slots(&mut self) -> CheckoutResult<Option<SlotAvailability>> {
    self.editing_step()?;
    let date = self.draft.schedule.date.ok_or(ValidationError::DateNotChosen)?;
    let fetched = self.ctx.slots().select_date(date).await;
    match fetched {
      Some(availability) if self.draft.schedule.date == Some(availability.date) => {
        self.slots = Some(availability.clone());
        Ok(Some(availability))
      }
      _ => Ok(None),
    }
  }

  /// Picks a slot on the chosen date. Past and busy slots are refused.
  pub fn choose_slot(&mut self, label: &str) -> CheckoutResult<()> {
    self.editing_step()?;
    let date = self.draft.schedule.date.ok_or(ValidationError::DateNotChosen)?;
    let slot = slots::find_slot(label).ok_or_else(|| ValidationError::UnknownSlot {
      slot: label.trim().to_string(),
    })?;

    let availability = match &self.slots {
      Some(availability) if availability.date == date => availability.clone(),
      // Not fetched yet: only the clock can rule a slot out.
      _ => slots::partition(date, &[], self.ctx.clock().now(), true),
    };
    if !availability.is_open(slot.label) {
      return Err(
        ValidationError::SlotUnavailable {
          slot: slot.label.to_string(),
        }
        .into(),
      );
    }
    self.draft.schedule.slot = Some(slot.label.to_string());
    Ok(())
  }

  pub fn set_address(&mut self, address: DeliveryAddress) -> CheckoutResult<()> {
    self.editing_step()?;
    self.draft.address = address;
    if self.draft.delivery_fee.is_some() {
      self.apply_fee();
    }
    Ok(())
  }

  pub fn set_payment_method(&mut self, method: PaymentMethod) -> CheckoutResult<()> {
    self.editing_step()?;
    self.draft.payment_method = method;
    Ok(())
  }

  /// Fee for the district entered so far.
  pub fn fee_preview(&self) -> Option<Amount> {
    let district = self.draft.address.district.as_deref()?;
    Some(self.ctx.pricing().fee_for(district))
  }

  pub fn outside_home_zone(&self) -> Option<bool> {
    let district = self.draft.address.district.as_deref()?;
    Some(self.ctx.pricing().is_outside_home_zone(district))
  }

  pub fn selectable_dates(&self) -> Vec<NaiveDate> {
    calendar::selectable_dates(self.ctx.clock().now())
  }

  /// Places the order. Only possible from Confirm, and only once, by the
  /// identity that started the checkout.
  ///
  /// A date or slot that went stale while the wizard sat on Confirm is
  /// cleared and the wizard returns to Schedule. Any other failure leaves
  /// the draft as it was so the same data can be sent again. On success the
  /// draft is discarded and the receipt is kept instead.
  pub async fn submit(&mut self) -> CheckoutResult<Receipt> {
    match self.phase {
      WizardPhase::Completed(_) => return Err(CheckoutError::AlreadySubmitted),
      WizardPhase::Editing(CheckoutStep::Confirm) => {}
      WizardPhase::Editing(_) => return Err(CheckoutError::NotAtConfirmation),
    }
    let current = self.ctx.sync_identity();
    if current.as_ref().map(|i| i.key.as_str()) != Some(self.identity.key.as_str()) {
      warn!(
        started_by = %self.identity.key,
        current = ?current.as_ref().map(|i| &i.key),
        "Identity changed since checkout started, refusing to submit."
      );
      return Err(CheckoutError::IdentityRequired);
    }
    if let Some(e) = self.revalidate_schedule() {
      self.phase = WizardPhase::Editing(CheckoutStep::Schedule);
      return Err(e.into());
    }
    if let Some(e) = first_blocking(&self.draft, CheckoutStep::Confirm) {
      return Err(e.into());
    }
    self.apply_fee();

    let receipt = self.ctx.submitter().submit(&self.identity, &self.draft).await?;
    self.draft = CheckoutDraft::default();
    self.slots = None;
    self.phase = WizardPhase::Completed(receipt.clone());
    Ok(receipt)
  }
}

impl std::fmt::Debug for CheckoutWizard {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("CheckoutWizard")
      .field("identity", &self.identity)
      .field("phase", &self.phase)
      .field("draft", &self.draft)
      .finish_non_exhaustive()
  }
}
