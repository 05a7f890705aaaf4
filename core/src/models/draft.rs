// checkout/src/models/draft.rs

//! The order-in-progress, filled in one wizard step at a time.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Amount, CartItem, PaymentMethod};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDetails {
  pub name: String,
  pub phone: String,
  pub email: String,
}

impl ContactDetails {
  pub fn new(name: impl Into<String>, phone: impl Into<String>, email: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      phone: phone.into(),
      email: email.into(),
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSelection {
  pub date: Option<NaiveDate>,
  pub slot: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryAddress {
  pub district: Option<String>,
  pub neighborhood: String,
  pub street: String,
  pub building: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub apartment: Option<String>,
  #[serde(default)]
  pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutDraft {
  /// Snapshot of the cart taken when the Cart step is left.
  pub items: Vec<CartItem>,
  pub contact: ContactDetails,
  pub schedule: ScheduleSelection,
  pub address: DeliveryAddress,
  /// Set when the Address step completes.
  pub delivery_fee: Option<Amount>,
  pub payment_method: PaymentMethod,
}

impl CheckoutDraft {
  pub fn subtotal(&self) -> Amount {
    self.items.iter().map(|item| item.price).sum()
  }

  /// Subtotal plus the delivery fee, once the fee is known.
  pub fn total(&self) -> Amount {
    self.subtotal() + self.delivery_fee.unwrap_or(0)
  }
}
