// storefront/src/cli/orders.rs
use checkout::CheckoutError;
use clap::Args;

use crate::errors::{AppError, Result};
use crate::state::AppState;

#[derive(Debug, Args)]
pub(crate) struct OrdersArgs {
  /// Print the raw records as JSON
  #[arg(long)]
  json: bool,
}

pub(crate) fn run(args: OrdersArgs, state: &AppState) -> Result<()> {
  let identity = state.ctx.sync_identity().ok_or(CheckoutError::IdentityRequired)?;
  let records = state
    .ctx
    .history()
    .list(&identity.key)
    .map_err(|source| AppError::Checkout(CheckoutError::Persistence { source }))?;

  if args.json {
    println!("{}", serde_json::to_string_pretty(&records)?);
    return Ok(());
  }
  if records.is_empty() {
    println!("no orders yet");
  }
  for order in &records {
    println!(
      "{}  {} {}  {}  {} items  total {}  ({})",
      order.order_number,
      order.delivery_date,
      order.delivery_slot,
      order.district,
      order.items.len(),
      order.total,
      order.status
    );
  }
  Ok(())
}
