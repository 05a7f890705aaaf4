// storefront/src/cli/cart.rs
use checkout::{CartItem, CheckoutError, OpaqueId};
use clap::{Args, Subcommand};

use crate::errors::Result;
use crate::state::AppState;

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
  #[command(subcommand)]
  command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
  List,
  Add(AddArgs),
  Remove {
    /// Item id as listed by `cart list`
    id: OpaqueId,
  },
  Clear,
}

#[derive(Debug, Args)]
struct AddArgs {
  #[arg(long)]
  id: OpaqueId,
  #[arg(long)]
  title: String,
  /// Price in whole currency units
  #[arg(long)]
  price: u64,
  #[arg(long, default_value = "")]
  image: String,
  #[arg(long)]
  condition: Option<String>,
  #[arg(long)]
  category: Option<String>,
}

pub(crate) fn run(command: CartCommand, state: &AppState) -> Result<()> {
  state.ctx.sync_identity().ok_or(CheckoutError::IdentityRequired)?;
  let cart = state.ctx.cart();

  match command.command {
    CartSubcommand::List => {
      let cart = cart.read();
      for item in cart.items() {
        println!("{:>8}  {:<40} {:>8}", item.id, item.title, item.price);
      }
      println!("items: {}  subtotal: {}", cart.count(), cart.subtotal());
    }
    CartSubcommand::Add(args) => {
      let mut item = CartItem::new(args.id, args.title, args.price).with_image(args.image);
      item.condition = args.condition;
      item.category = args.category;
      let id = item.id.clone();
      if cart.write().add(item) {
        println!("added: {id}");
      } else {
        println!("already in cart: {id}");
      }
    }
    CartSubcommand::Remove { id } => {
      if cart.write().remove(&id) {
        println!("removed: {id}");
      } else {
        println!("not in cart: {id}");
      }
    }
    CartSubcommand::Clear => {
      cart.write().clear();
      println!("cart cleared");
    }
  }
  Ok(())
}
