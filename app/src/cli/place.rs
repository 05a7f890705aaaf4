// storefront/src/cli/place.rs

//! `storefront checkout --plan plan.json`: fills every wizard step from a
//! file and places the order. A step that refuses its input stops the run
//! with that step's message.

use std::path::{Path, PathBuf};

use checkout::{CheckoutStep, CheckoutWizard, ContactDetails, DeliveryAddress, PaymentMethod};
use chrono::NaiveDate;
use clap::Args;
use serde::Deserialize;
use tracing::info;

use crate::errors::{AppError, Result};
use crate::state::AppState;

#[derive(Debug, Args)]
pub(crate) struct CheckoutArgs {
  /// JSON file with contact, date, slot, address and payment
  #[arg(long)]
  plan: PathBuf,

  /// Stop at the confirmation step and print the summary without ordering
  #[arg(long)]
  dry_run: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CheckoutPlan {
  pub contact: ContactDetails,
  pub date: NaiveDate,
  pub slot: String,
  pub address: DeliveryAddress,
  #[serde(default)]
  pub payment: PaymentMethod,
}

impl CheckoutPlan {
  pub fn load(path: &Path) -> Result<Self> {
    let raw = std::fs::read_to_string(path)
      .map_err(|e| AppError::Input(format!("Cannot read plan '{}': {e}", path.display())))?;
    serde_json::from_str(&raw).map_err(|e| AppError::Input(format!("Invalid plan '{}': {e}", path.display())))
  }
}

/// Drives `wizard` from the Cart step to Confirm.
pub(crate) async fn fill(wizard: &mut CheckoutWizard, plan: CheckoutPlan) -> Result<()> {
  wizard.next()?;

  wizard.set_contact(plan.contact)?;
  wizard.next()?;

  if wizard.choose_date(plan.date).await?.is_some_and(|a| a.degraded) {
    println!("(slot availability unknown, the server will confirm the window)");
  }
  wizard.choose_slot(&plan.slot)?;
  wizard.next()?;

  wizard.set_address(plan.address)?;
  wizard.set_payment_method(plan.payment)?;
  wizard.next()?;
  debug_assert_eq!(wizard.current(), CheckoutStep::Confirm);
  Ok(())
}

fn print_summary(wizard: &CheckoutWizard) {
  let draft = wizard.draft();
  for item in &draft.items {
    println!("  {:<40} {:>8}", item.title, item.price);
  }
  println!("subtotal: {}", draft.subtotal());
  println!("delivery: {}", draft.delivery_fee.unwrap_or(0));
  println!("total:    {}", draft.total());
  if let (Some(date), Some(slot)) = (draft.schedule.date, draft.schedule.slot.as_deref()) {
    println!("when:     {date} {slot}");
  }
  println!("payment:  {}", draft.payment_method.as_str());
}

pub(crate) async fn run(args: CheckoutArgs, state: &AppState) -> Result<()> {
  let plan = CheckoutPlan::load(&args.plan)?;
  let mut wizard = CheckoutWizard::start(state.ctx.clone())?;
  fill(&mut wizard, plan).await?;
  print_summary(&wizard);

  if args.dry_run {
    info!("Dry run, order not placed.");
    return Ok(());
  }

  let receipt = wizard.submit().await?;
  println!("order:    {}", receipt.order_number);
  println!("status:   {}", receipt.status);
  println!("charged:  {}", receipt.total);
  if !receipt.mirrored {
    println!("(the order was placed but could not be saved to local history)");
  }
  Ok(())
}
