// storefront/src/cli/quote.rs
use checkout::calendar::check_selectable;
use checkout::{SlotState, ValidationError, SLOT_CATALOG};
use chrono::NaiveDate;
use clap::Args;

use crate::errors::Result;
use crate::state::AppState;

#[derive(Debug, Args)]
pub(crate) struct FeeArgs {
  /// District name; lists every known district when omitted
  district: Option<String>,
}

#[derive(Debug, Args)]
pub(crate) struct SlotsArgs {
  /// Delivery date, YYYY-MM-DD
  date: NaiveDate,
}

pub(crate) fn fee(args: FeeArgs, state: &AppState) -> Result<()> {
  let pricing = state.ctx.pricing();
  match args.district {
    Some(district) => {
      let fee = pricing.fee_for(&district);
      println!("{district}: {fee}");
      if pricing.is_outside_home_zone(&district) {
        println!("outside {}, delivery is charged", pricing.home_zone());
      }
    }
    None => {
      for name in pricing.district_names() {
        println!("{name:<20} {:>6}", pricing.fee_for(name));
      }
      println!("{:<20} {:>6}", "(other)", pricing.default_fee());
    }
  }
  Ok(())
}

pub(crate) async fn slots(args: SlotsArgs, state: &AppState) -> Result<()> {
  check_selectable(args.date, state.ctx.clock().now()).map_err(ValidationError::DateNotSelectable)?;

  let availability = state.ctx.slots().available_slots(args.date).await;
  if availability.degraded {
    println!("(availability unknown, showing every window)");
  }
  for slot in &SLOT_CATALOG {
    let label = match availability.state_of(slot.label) {
      Some(SlotState::Open) => "open",
      Some(SlotState::Busy) => "busy",
      Some(SlotState::Past) => "past",
      None => continue,
    };
    println!("{}  {label}", slot.label);
  }
  Ok(())
}
