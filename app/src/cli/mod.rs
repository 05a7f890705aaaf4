// storefront/src/cli/mod.rs
use clap::{Parser, Subcommand};

use crate::errors::Result;
use crate::state::AppState;

mod cart;
mod orders;
mod place;
mod quote;

#[derive(Debug, Parser)]
#[command(name = "storefront", about = "Second-hand storefront checkout", long_about = None)]
pub(crate) struct Cli {
  /// Emit logs as JSON lines instead of text
  #[arg(long, global = true)]
  pub json_logs: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
  /// Inspect or change the signed-in customer's cart
  Cart(cart::CartCommand),
  /// Delivery fee for a district
  Fee(quote::FeeArgs),
  /// Delivery windows for a date
  Slots(quote::SlotsArgs),
  /// Walk the checkout steps from a plan file and place the order
  Checkout(place::CheckoutArgs),
  /// Orders placed from this machine
  Orders(orders::OrdersArgs),
}

impl Cli {
  pub(crate) async fn run(self, state: AppState) -> Result<()> {
    tracing::debug!(api_url = %state.api_url, command = ?self.command, "Running command.");
    match self.command {
      Commands::Cart(command) => cart::run(command, &state),
      Commands::Fee(args) => quote::fee(args, &state),
      Commands::Slots(args) => quote::slots(args, &state).await,
      Commands::Checkout(args) => place::run(args, &state).await,
      Commands::Orders(args) => orders::run(args, &state),
    }
  }
}
